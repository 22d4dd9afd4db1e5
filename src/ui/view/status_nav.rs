//! 状态导航栏
//!
//! `build_status_nav` 是纯函数：快照 -> 渲染树；`render_status_nav` 负责把树画到一行终端上。
//! 两组控件：左侧为 PR 徽标 + 切换分支，右侧为 fetch。

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::components::render_popover_framework;
use crate::models::{Preferences, PullRequest, PullRequestState, Wip, format_date};
use crate::ui::actions::NavControl;

const ELLIPSIS: &str = "…";

/// 图标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    GitPullRequest,
    GitMerge,
    GitPullRequestClosed,
    GitBranch,
    ChevronDown,
    RepoFetch,
}

impl Icon {
    /// codicon 名称
    pub fn name(self) -> &'static str {
        match self {
            Self::GitPullRequest => "git-pull-request",
            Self::GitMerge => "git-merge",
            Self::GitPullRequestClosed => "git-pull-request-closed",
            Self::GitBranch => "git-branch",
            Self::ChevronDown => "chevron-down",
            Self::RepoFetch => "gl-repo-fetch",
        }
    }

    /// 终端中显示的字符
    pub fn glyph(self) -> &'static str {
        match self {
            Self::GitPullRequest => "⇄",
            Self::GitMerge => "⋈",
            Self::GitPullRequestClosed => "⊘",
            Self::GitBranch => "⎇",
            Self::ChevronDown => "▾",
            Self::RepoFetch => "⟳",
        }
    }
}

/// PR 状态 -> 图标
pub fn pr_icon(state: Option<&PullRequestState>) -> Icon {
    match state {
        Some(PullRequestState::Merged) => Icon::GitMerge,
        Some(PullRequestState::Closed) => Icon::GitPullRequestClosed,
        _ => Icon::GitPullRequest,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrBadge {
    pub icon: Icon,
    pub label: String,
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchControl {
    pub branch_icon: Option<Icon>,
    pub branch_name: String,
    pub chevron: Icon,
    pub tooltip: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchControl {
    pub icon: Icon,
    pub tooltip: &'static str,
}

/// 渲染树
#[derive(Debug, Clone, PartialEq)]
pub struct StatusNav {
    pub pr_badge: Option<PrBadge>,
    pub switch: SwitchControl,
    pub fetch: FetchControl,
}

impl StatusNav {
    /// 可见控件，按 Tab 顺序
    pub fn controls(&self) -> Vec<NavControl> {
        let mut controls = Vec::with_capacity(3);
        if self.pr_badge.is_some() {
            controls.push(NavControl::PullRequest);
        }
        controls.push(NavControl::Switch);
        controls.push(NavControl::Fetch);
        controls
    }

    pub fn tooltip(&self, control: NavControl) -> Option<&'static str> {
        match control {
            NavControl::PullRequest => None,
            NavControl::Switch => Some(self.switch.tooltip),
            NavControl::Fetch => Some(self.fetch.tooltip),
        }
    }
}

/// 构建渲染树；缺少 wip / changes / branch 时不渲染
pub fn build_status_nav(wip: Option<&Wip>) -> Option<StatusNav> {
    let wip = wip?;
    wip.changes.as_ref()?;
    let branch = wip.branch.as_ref()?;

    let pr_badge = wip.pull_request.as_ref().map(|pr| PrBadge {
        icon: pr_icon(Some(&pr.state)),
        label: format!("#{}", pr.id),
        pull_request: pr.clone(),
    });

    let switch = SwitchControl {
        // 已有 PR 徽标时不再重复显示分支图标
        branch_icon: pr_badge.is_none().then_some(Icon::GitBranch),
        branch_name: branch.name.clone(),
        chevron: Icon::ChevronDown,
        tooltip: "Switch to...",
    };

    Some(StatusNav {
        pr_badge,
        switch,
        fetch: FetchControl {
            icon: Icon::RepoFetch,
            tooltip: "Fetch",
        },
    })
}

/// 交互状态，由宿主持有
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavInteraction {
    pub focused: Option<NavControl>,
    pub hovered: Option<NavControl>,
    pub pinned_detail: bool,
    // 点击徽标收起后，直到悬停或焦点移开前不再因它们展开
    pub dismissed_detail: bool,
}

impl NavInteraction {
    /// 不考虑徽标是否存在时，详情是否应展开
    pub fn detail_requested(&self) -> bool {
        !self.dismissed_detail
            && (self.pinned_detail
                || self.hovered == Some(NavControl::PullRequest)
                || self.focused == Some(NavControl::PullRequest))
    }
}

/// 是否展开 PR 详情
pub fn should_show_detail(nav: &StatusNav, interaction: &NavInteraction) -> bool {
    nav.pr_badge.is_some() && interaction.detail_requested()
}

/// PR 详情内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrDetail {
    pub name: String,
    pub url: String,
    pub key: String,
    pub status: String,
    pub date: String,
}

pub fn pr_detail(
    pr: &PullRequest,
    preferences: Option<&Preferences>,
    now: DateTime<Local>,
) -> PrDetail {
    PrDetail {
        name: pr.title.clone(),
        url: pr.url.clone(),
        key: format!("#{}", pr.id),
        status: pr.state.as_str().to_string(),
        date: format_date(&pr.updated_date, preferences, now),
    }
}

/// 各控件所在区域，用于鼠标命中
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavHitZones {
    pub pull_request: Option<Rect>,
    pub switch: Option<Rect>,
    pub fetch: Option<Rect>,
}

impl NavHitZones {
    pub fn hit(&self, column: u16, row: u16) -> Option<NavControl> {
        let pos = Position::new(column, row);
        let inside = |r: Option<Rect>| r.is_some_and(|r| r.contains(pos));
        if inside(self.pull_request) {
            Some(NavControl::PullRequest)
        } else if inside(self.switch) {
            Some(NavControl::Switch)
        } else if inside(self.fetch) {
            Some(NavControl::Fetch)
        } else {
            None
        }
    }
}

/// 按显示宽度截断，溢出时以省略号结尾
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width();
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

fn pr_color(state: &PullRequestState) -> Color {
    match state {
        PullRequestState::Open => Color::Green,
        PullRequestState::Merged => Color::Magenta,
        PullRequestState::Closed => Color::Red,
        PullRequestState::Other(_) => Color::Gray,
    }
}

fn control_style(control: NavControl, interaction: &NavInteraction) -> Style {
    let mut style = Style::default();
    if interaction.hovered == Some(control) {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if interaction.focused == Some(control) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn line_width(line: &Line) -> u16 {
    u16::try_from(line.width()).unwrap_or(u16::MAX)
}

/// 把导航栏画到 `area` 的第一行，返回命中区域
pub fn render_status_nav(
    frame: &mut Frame,
    area: Rect,
    nav: &StatusNav,
    interaction: &NavInteraction,
) -> NavHitZones {
    let mut zones = NavHitZones::default();
    if area.width == 0 || area.height == 0 {
        return zones;
    }
    let row = Rect { height: 1, ..area };

    // 右侧组: fetch
    let fetch_line = Line::from(vec![Span::styled(
        format!(" {} ", nav.fetch.icon.glyph()),
        control_style(NavControl::Fetch, interaction),
    )]);
    let fetch_width = line_width(&fetch_line).min(row.width);
    let fetch_rect = Rect {
        x: row.right() - fetch_width,
        width: fetch_width,
        ..row
    };
    frame.render_widget(Paragraph::new(fetch_line), fetch_rect);
    zones.fetch = Some(fetch_rect);

    // 左侧组可用宽度，两组之间留一格
    let mut x = row.x;
    let left_limit = fetch_rect.x.saturating_sub(1);

    if let Some(badge) = &nav.pr_badge {
        let state = &badge.pull_request.state;
        let style = control_style(NavControl::PullRequest, interaction);
        let line = Line::from(vec![
            Span::styled(" ", style),
            Span::styled(badge.icon.glyph(), style.fg(pr_color(state))),
            Span::styled(format!(" {} ", badge.label), style),
        ]);
        let width = line_width(&line).min(left_limit.saturating_sub(x));
        let rect = Rect { x, width, ..row };
        frame.render_widget(Paragraph::new(line), rect);
        zones.pull_request = Some(rect);
        x += width;
    }

    let style = control_style(NavControl::Switch, interaction);
    let prefix = match nav.switch.branch_icon {
        Some(icon) => format!(" {} ", icon.glyph()),
        None => " ".to_string(),
    };
    let suffix = format!(" {} ", nav.switch.chevron.glyph());
    let available = usize::from(left_limit.saturating_sub(x));
    let name_width = available.saturating_sub(prefix.width() + suffix.width());
    let line = Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(
            truncate_with_ellipsis(&nav.switch.branch_name, name_width),
            style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(suffix, style),
    ]);
    let width = line_width(&line).min(left_limit.saturating_sub(x));
    let rect = Rect { x, width, ..row };
    frame.render_widget(Paragraph::new(line), rect);
    zones.switch = Some(rect);

    zones
}

/// 在徽标下方弹出 PR 详情
pub fn render_pr_detail(frame: &mut Frame, anchor: Rect, detail: &PrDetail) {
    let lines = vec![
        Line::from(Span::styled(
            detail.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            detail.url.clone(),
            Style::default().fg(Color::Blue),
        )),
        Line::from(format!("{}  {}", detail.key, detail.status)),
        Line::from(Span::styled(
            detail.date.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let bounds = frame.area();
    let content_width = lines.iter().map(line_width).max().unwrap_or(0);
    let width = content_width.saturating_add(2).min(bounds.width);
    let y = anchor.bottom();
    let height = 6u16.min(bounds.bottom().saturating_sub(y));
    if width == 0 || height == 0 {
        return;
    }
    let x = anchor.x.min(bounds.right().saturating_sub(width));

    let inner = render_popover_framework(frame, Rect::new(x, y, width, height), "Pull Request");
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, Changes};
    use chrono::TimeZone;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn pull_request(state: &str) -> PullRequest {
        PullRequest {
            id: 42,
            title: "T".to_string(),
            url: "u".to_string(),
            state: PullRequestState::from(state.to_string()),
            updated_date: Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap(),
        }
    }

    fn wip(branch: &str, pr: Option<PullRequest>) -> Wip {
        Wip {
            changes: Some(Changes::default()),
            branch: Some(Branch::new(branch)),
            pull_request: pr,
        }
    }

    fn draw(nav: &StatusNav, interaction: &NavInteraction, width: u16) -> (Buffer, NavHitZones) {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        let mut zones = NavHitZones::default();
        terminal
            .draw(|f| {
                let area = f.area();
                zones = render_status_nav(f, area, nav, interaction);
            })
            .unwrap();
        (terminal.backend().buffer().clone(), zones)
    }

    fn row_text(buffer: &Buffer) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol())
            .collect()
    }

    #[test]
    fn test_nothing_without_wip() {
        assert_eq!(build_status_nav(None), None);
    }

    #[test]
    fn test_nothing_without_changes_or_branch() {
        let mut no_changes = wip("main", None);
        no_changes.changes = None;
        assert_eq!(build_status_nav(Some(&no_changes)), None);

        let mut no_branch = wip("main", Some(pull_request("open")));
        no_branch.branch = None;
        assert_eq!(build_status_nav(Some(&no_branch)), None);
    }

    #[test]
    fn test_pr_icon_mapping() {
        let icon = |s: &str| pr_icon(Some(&PullRequestState::from(s.to_string())));
        assert_eq!(icon("merged"), Icon::GitMerge);
        assert_eq!(icon("closed"), Icon::GitPullRequestClosed);
        assert_eq!(icon("open"), Icon::GitPullRequest);
        assert_eq!(icon("draft"), Icon::GitPullRequest);
        assert_eq!(icon(""), Icon::GitPullRequest);
        assert_eq!(pr_icon(None), Icon::GitPullRequest);

        assert_eq!(icon("merged").name(), "git-merge");
        assert_eq!(icon("closed").name(), "git-pull-request-closed");
        assert_eq!(icon("open").name(), "git-pull-request");
    }

    #[test]
    fn test_branch_icon_only_without_pr() {
        let plain = build_status_nav(Some(&wip("main", None))).unwrap();
        assert_eq!(plain.switch.branch_icon, Some(Icon::GitBranch));
        assert!(plain.pr_badge.is_none());

        let with_pr = build_status_nav(Some(&wip("main", Some(pull_request("open"))))).unwrap();
        assert_eq!(with_pr.switch.branch_icon, None);
        assert!(with_pr.pr_badge.is_some());
    }

    #[test]
    fn test_scenario_branch_without_pr() {
        let nav = build_status_nav(Some(&wip("feature/login", None))).unwrap();
        let (buffer, zones) = draw(&nav, &NavInteraction::default(), 40);
        let text = row_text(&buffer);

        assert!(text.starts_with(" ⎇ feature/login ▾ "));
        assert!(text.ends_with(" ⟳ "));
        assert_eq!(zones.pull_request, None);
        assert_eq!(nav.controls(), vec![NavControl::Switch, NavControl::Fetch]);
    }

    #[test]
    fn test_scenario_merged_pr() {
        let nav = build_status_nav(Some(&wip("main", Some(pull_request("merged"))))).unwrap();
        let badge = nav.pr_badge.as_ref().unwrap();
        assert_eq!(badge.icon, Icon::GitMerge);
        assert_eq!(badge.label, "#42");

        let (buffer, zones) = draw(&nav, &NavInteraction::default(), 40);
        let text = row_text(&buffer);
        assert!(text.starts_with(" ⋈ #42  main ▾ "));
        assert!(!text.contains(Icon::GitBranch.glyph()));
        assert_eq!(buffer[(1, 0)].fg, Color::Magenta);
        assert_eq!(zones.pull_request, Some(Rect::new(0, 0, 7, 1)));
    }

    #[test]
    fn test_branch_name_truncated() {
        let nav = build_status_nav(Some(&wip("feature/a-very-long-branch-name", None))).unwrap();
        let (buffer, zones) = draw(&nav, &NavInteraction::default(), 20);
        let text = row_text(&buffer);

        // 20 - fetch(3) - gap(1) = 16; 前缀 3 + 后缀 3 => 名称 10
        assert_eq!(text, " ⎇ feature/a… ▾   ⟳ ");
        assert_eq!(zones.switch, Some(Rect::new(0, 0, 16, 1)));
        assert_eq!(zones.fetch, Some(Rect::new(17, 0, 3, 1)));
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("main", 10), "main");
        assert_eq!(truncate_with_ellipsis("main", 4), "main");
        assert_eq!(truncate_with_ellipsis("feature", 4), "fea…");
        assert_eq!(truncate_with_ellipsis("feature", 1), "…");
        assert_eq!(truncate_with_ellipsis("feature", 0), "");
        assert_eq!(truncate_with_ellipsis("功能分支", 5), "功能…");
    }

    #[test]
    fn test_render_is_idempotent() {
        let w = wip("main", Some(pull_request("closed")));
        let first = build_status_nav(Some(&w)).unwrap();
        let second = build_status_nav(Some(&w)).unwrap();
        assert_eq!(first, second);

        let interaction = NavInteraction::default();
        assert_eq!(draw(&first, &interaction, 30), draw(&second, &interaction, 30));
    }

    #[test]
    fn test_hit_zones() {
        let nav = build_status_nav(Some(&wip("main", Some(pull_request("open"))))).unwrap();
        let (_, zones) = draw(&nav, &NavInteraction::default(), 30);

        assert_eq!(zones.hit(0, 0), Some(NavControl::PullRequest));
        assert_eq!(zones.hit(8, 0), Some(NavControl::Switch));
        assert_eq!(zones.hit(28, 0), Some(NavControl::Fetch));
        assert_eq!(zones.hit(20, 0), None);
        assert_eq!(zones.hit(0, 1), None);
    }

    #[test]
    fn test_should_show_detail() {
        let with_pr = build_status_nav(Some(&wip("main", Some(pull_request("open"))))).unwrap();
        let without = build_status_nav(Some(&wip("main", None))).unwrap();

        let hovered = NavInteraction {
            hovered: Some(NavControl::PullRequest),
            ..Default::default()
        };
        let focused = NavInteraction {
            focused: Some(NavControl::PullRequest),
            ..Default::default()
        };
        let elsewhere = NavInteraction {
            hovered: Some(NavControl::Fetch),
            focused: Some(NavControl::Switch),
            ..Default::default()
        };
        let dismissed = NavInteraction {
            hovered: Some(NavControl::PullRequest),
            focused: Some(NavControl::PullRequest),
            dismissed_detail: true,
            ..Default::default()
        };

        assert!(should_show_detail(&with_pr, &hovered));
        assert!(should_show_detail(&with_pr, &focused));
        assert!(!should_show_detail(&with_pr, &elsewhere));
        assert!(!should_show_detail(&with_pr, &dismissed));
        assert!(!should_show_detail(&without, &hovered));
    }

    #[test]
    fn test_pr_detail_content() {
        let pr = pull_request("merged");
        let prefs = Preferences {
            date_format: Some("%Y-%m-%d".to_string()),
            date_style: None,
        };
        let detail = pr_detail(&pr, Some(&prefs), pr.updated_date);

        assert_eq!(
            detail,
            PrDetail {
                name: "T".to_string(),
                url: "u".to_string(),
                key: "#42".to_string(),
                status: "merged".to_string(),
                date: "2024-03-05".to_string(),
            }
        );
    }

    #[test]
    fn test_focus_is_reversed() {
        let nav = build_status_nav(Some(&wip("main", None))).unwrap();
        let interaction = NavInteraction {
            focused: Some(NavControl::Fetch),
            ..Default::default()
        };
        let (buffer, _) = draw(&nav, &interaction, 20);
        assert!(buffer[(18, 0)].modifier.contains(Modifier::REVERSED));
        assert!(!buffer[(1, 0)].modifier.contains(Modifier::REVERSED));
    }
}
