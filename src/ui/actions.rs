//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action，以及向宿主冒泡的分支事件

use serde::{Deserialize, Serialize};

/// 分支事件名称
pub const BRANCH_ACTION_EVENT: &str = "gl-branch-action";

/// 导航栏上的可交互控件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavControl {
    PullRequest,
    Switch,
    Fetch,
}

/// 分支操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchAction {
    Switch,
    Fetch,
}

impl BranchAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Fetch => "fetch",
        }
    }
}

/// 向上冒泡的事件载荷 `{ action, alt }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchActionEvent {
    pub action: BranchAction,
    pub alt: bool,
}

impl BranchActionEvent {
    /// 序列化为宿主消费的 JSON 载荷
    pub fn payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Reload,

    FocusNext,
    FocusPrev,
    ActivateFocused,

    // 激活控件，alt 仅在鼠标点击带 ALT 时为 true
    Activate { control: NavControl, alt: bool },
    Hover(Option<NavControl>),
}
