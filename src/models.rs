use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// 默认的绝对日期格式
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y %-I:%M%P";

/// 宿主推送的状态快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub wip: Option<Wip>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

/// 工作区 (WIP) 信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wip {
    #[serde(default)]
    pub changes: Option<Changes>,
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

/// 未提交的改动，导航栏只关心它是否存在
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub upstream: Option<String>,
}

#[cfg(test)]
impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upstream: None,
        }
    }
}

/// 关联的拉取请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub state: PullRequestState,
    pub updated_date: DateTime<Local>,
}

/// PR 状态，未知值保留原文而不是报错
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PullRequestState {
    #[default]
    Open,
    Merged,
    Closed,
    Other(String),
}

impl PullRequestState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PullRequestState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => Self::Open,
            "merged" => Self::Merged,
            "closed" => Self::Closed,
            _ => Self::Other(value),
        }
    }
}

impl From<PullRequestState> for String {
    fn from(value: PullRequestState) -> Self {
        value.as_str().to_string()
    }
}

/// 显示偏好
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub date_style: Option<DateStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    Absolute,
    Relative,
}

/// 按偏好格式化日期，`now` 由调用方传入以保持纯函数
pub fn format_date(
    date: &DateTime<Local>,
    preferences: Option<&Preferences>,
    now: DateTime<Local>,
) -> String {
    let style = preferences.and_then(|p| p.date_style);
    if style == Some(DateStyle::Relative) {
        return format_relative(date, now);
    }

    let format = preferences
        .and_then(|p| p.date_format.as_deref())
        .unwrap_or(DEFAULT_DATE_FORMAT);

    // 非法格式串会让 Display 返回错误，此时回退默认格式
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        out = date.format(DEFAULT_DATE_FORMAT).to_string();
    }
    out
}

fn format_relative(date: &DateTime<Local>, now: DateTime<Local>) -> String {
    let delta = now.signed_duration_since(*date);
    let future = delta.num_seconds() < 0;
    let secs = delta.num_seconds().unsigned_abs();

    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if secs < 45 {
        return "just now".to_string();
    }

    let phrase = if secs < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes.max(2))
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours.max(2))
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days.max(2))
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", (days / 30).max(2))
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", (days / 365).max(2))
    };

    if future {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}
