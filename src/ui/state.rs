//! App 状态定义 (Model)
//!
//! 持有最新快照、交互状态和向宿主冒泡事件的发送端

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use super::actions::{BranchActionEvent, NavControl};
use super::view::status_nav::{NavHitZones, NavInteraction, build_status_nav};
use crate::models::State;

/// 应用状态
pub struct App {
    pub state: State,
    pub state_path: PathBuf,
    pub interaction: NavInteraction,
    pub hit_zones: NavHitZones,
    pub message: Option<String>,
    pub events: Sender<BranchActionEvent>,
}

impl App {
    /// 创建新的应用实例
    pub fn new(state: State, state_path: PathBuf, events: Sender<BranchActionEvent>) -> Self {
        Self {
            state,
            state_path,
            interaction: NavInteraction::default(),
            hit_zones: NavHitZones::default(),
            message: None,
            events,
        }
    }

    /// 当前快照下可见的控件
    pub fn visible_controls(&self) -> Vec<NavControl> {
        build_status_nav(self.state.wip.as_ref())
            .map(|nav| nav.controls())
            .unwrap_or_default()
    }

    /// 替换快照，清理已经不存在的焦点
    pub fn replace_state(&mut self, state: State) {
        self.state = state;
        let nav = build_status_nav(self.state.wip.as_ref());
        if let Some(badge) = nav.as_ref().and_then(|nav| nav.pr_badge.as_ref()) {
            tracing::debug!(
                pr = %badge.label,
                state = badge.pull_request.state.as_str(),
                icon = badge.icon.name(),
                "pull request badge"
            );
        }

        let controls = nav.map(|nav| nav.controls()).unwrap_or_default();
        let keep = |c: Option<NavControl>| c.filter(|c| controls.contains(c));
        self.interaction.focused = keep(self.interaction.focused);
        self.interaction.hovered = keep(self.interaction.hovered);
        if !controls.contains(&NavControl::PullRequest) {
            self.interaction.pinned_detail = false;
            self.interaction.dismissed_detail = false;
        }
    }
}
