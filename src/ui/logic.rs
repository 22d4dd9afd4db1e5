//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑，以及分支事件的冒泡

use super::actions::{Action, BRANCH_ACTION_EVENT, BranchAction, BranchActionEvent, NavControl};
use super::state::App;
use crate::storage::load_state;

impl App {
    /// 核心逻辑分发，返回是否退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Reload => self.reload(),

            Action::FocusNext => self.move_focus(1),
            Action::FocusPrev => self.move_focus(-1),
            Action::ActivateFocused => {
                if let Some(control) = self.interaction.focused {
                    self.activate(control, false);
                }
            }

            Action::Activate { control, alt } => self.activate(control, alt),
            Action::Hover(control) => {
                if control != self.interaction.hovered {
                    self.interaction.dismissed_detail = false;
                }
                self.interaction.hovered = control;
            }
        }
        false
    }

    // ============ 焦点 ============

    /// 在可见控件间循环移动焦点
    pub fn move_focus(&mut self, step: isize) {
        let controls = self.visible_controls();
        if controls.is_empty() {
            self.interaction.focused = None;
            return;
        }

        let len = controls.len() as isize;
        let next = match self
            .interaction
            .focused
            .and_then(|f| controls.iter().position(|c| *c == f))
        {
            Some(i) => (i as isize + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        self.interaction.focused = Some(controls[next as usize]);
        self.interaction.dismissed_detail = false;
    }

    // ============ 激活 ============

    /// 激活控件；不可见的控件忽略
    pub fn activate(&mut self, control: NavControl, alt: bool) {
        if !self.visible_controls().contains(&control) {
            return;
        }

        match control {
            NavControl::PullRequest => {
                // 按可见状态切换：已展开则收起，焦点和悬停不再把它顶回来
                let showing = self.interaction.detail_requested();
                self.interaction.pinned_detail = !showing;
                self.interaction.dismissed_detail = showing;
            }
            NavControl::Switch => self.emit(BranchAction::Switch, alt),
            NavControl::Fetch => self.emit(BranchAction::Fetch, alt),
        }
        self.interaction.focused = Some(control);
    }

    /// 向宿主发送一次分支事件
    fn emit(&mut self, action: BranchAction, alt: bool) {
        let event = BranchActionEvent { action, alt };
        tracing::debug!(kind = BRANCH_ACTION_EVENT, action = action.as_str(), alt, "emit");
        if let Err(e) = self.events.send(event) {
            tracing::warn!(error = %e, "branch action receiver dropped");
        }
    }

    // ============ 快照 ============

    /// 重新从磁盘加载快照，失败时保留旧快照
    pub fn reload(&mut self) {
        match load_state(&self.state_path) {
            Ok(state) => {
                self.replace_state(state);
                self.message = Some("已重新加载".to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %self.state_path.display(), "reload failed");
                self.message = Some(format!("加载失败: {}", e));
            }
        }
    }
}
