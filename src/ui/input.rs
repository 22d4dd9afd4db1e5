//! 键盘与鼠标事件映射 (Input -> Action)

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::actions::{Action, NavControl};
use super::state::App;
use super::view::status_nav::NavHitZones;

/// 按键 -> Action；键盘激活不携带 alt
pub fn get_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Reload),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ActivateFocused),
        KeyCode::Char('s') => Some(Action::Activate {
            control: NavControl::Switch,
            alt: false,
        }),
        KeyCode::Char('f') => Some(Action::Activate {
            control: NavControl::Fetch,
            alt: false,
        }),
        _ => None,
    }
}

/// 鼠标 -> Action，按下左键时读取 ALT 修饰键
pub fn get_mouse_action(zones: &NavHitZones, mouse: MouseEvent) -> Option<Action> {
    let target = zones.hit(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => target.map(|control| Action::Activate {
            control,
            alt: mouse.modifiers.contains(KeyModifiers::ALT),
        }),
        MouseEventKind::Moved => Some(Action::Hover(target)),
        _ => None,
    }
}

/// 处理按键事件，返回是否退出
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    get_action(key).is_some_and(|action| app.dispatch(action))
}

/// 处理鼠标事件
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if let Some(action) = get_mouse_action(&app.hit_zones, mouse) {
        app.dispatch(action);
    }
}
