//! 视图层模块
//!
//! 包含主渲染入口和导航栏组件

pub mod components;
pub mod status_nav;

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::state::App;
use status_nav::{
    NavHitZones, build_status_nav, pr_detail, render_pr_detail, render_status_nav,
    should_show_detail,
};

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 导航栏
            Constraint::Min(3),    // 详情
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    let nav_block = Block::default().borders(Borders::ALL);
    let nav_area = nav_block.inner(chunks[0]);
    frame.render_widget(nav_block, chunks[0]);

    let nav = build_status_nav(app.state.wip.as_ref());
    app.hit_zones = match &nav {
        Some(nav) => render_status_nav(frame, nav_area, nav, &app.interaction),
        None => NavHitZones::default(),
    };

    render_details(frame, app, chunks[1]);
    render_help(frame, app, chunks[2]);

    // 弹出层最后绘制，覆盖在其他区域之上
    if let Some(nav) = &nav
        && should_show_detail(nav, &app.interaction)
        && let (Some(badge), Some(anchor)) = (&nav.pr_badge, app.hit_zones.pull_request)
    {
        let detail = pr_detail(
            &badge.pull_request,
            app.state.preferences.as_ref(),
            Local::now(),
        );
        render_pr_detail(frame, anchor, &detail);
    }
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let content = match &app.state.wip {
        Some(wip) => {
            let files = wip.changes.as_ref().map_or(0, |c| c.files.len());
            let upstream = wip
                .branch
                .as_ref()
                .and_then(|b| b.upstream.as_deref())
                .unwrap_or("(无)");
            format!("改动文件: {}\n上游: {}", files, upstream)
        }
        None => "暂无工作区信息，按 'r' 重新加载".to_string(),
    };

    let details = Paragraph::new(content)
        .block(Block::default().title("工作区").borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(details, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = "[Tab] 切换焦点  [Enter] 执行  [s] 切换分支  [f] 拉取  [r] 重新加载  [q] 退出";

    let tooltip = build_status_nav(app.state.wip.as_ref())
        .zip(app.interaction.hovered.or(app.interaction.focused))
        .and_then(|(nav, control)| nav.tooltip(control));

    let mut parts = vec![help_text.to_string()];
    parts.extend(tooltip.map(str::to_string));
    parts.extend(app.message.clone());

    let help = Paragraph::new(parts.join("  |  "))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}
