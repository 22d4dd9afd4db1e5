//! UI 模块
//!
//! 采用 MVI (Model-View-Intent) 架构：
//! - Model (state.rs): App 结构体，持有快照与交互状态
//! - View (view/): 纯函数，将快照映射为导航栏
//! - Intent (actions.rs): 用户交互转化为 Action，激活控件时向宿主冒泡分支事件

pub mod actions;
pub mod input;
pub mod logic;
pub mod state;
pub mod view;

// Re-export for convenience
pub use input::{handle_key_event, handle_mouse_event};
pub use state::App;
pub use view::render;
