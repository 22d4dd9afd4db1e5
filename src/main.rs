mod models;
mod storage;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use crate::storage::load_state;
use crate::ui::actions::{BRANCH_ACTION_EVENT, BranchActionEvent};
use crate::ui::{App, render};

/// 分支状态导航栏
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 状态快照文件 (默认 ~/.local/share/statusnav/state.toml)
    #[arg(long)]
    state: Option<PathBuf>,

    /// 日志文件 (默认 ~/.local/share/statusnav/statusnav.log)
    #[arg(long)]
    log: Option<PathBuf>,
}

/// 获取数据目录路径 (~/.local/share/statusnav/)
fn get_data_dir() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "无法获取用户数据目录"))?
        .join("statusnav");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// 日志写入文件，终端留给 TUI
fn init_tracing(log_path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = get_data_dir().context("failed to prepare data directory")?;
    let state_path = cli.state.unwrap_or_else(|| data_dir.join("state.toml"));
    let log_path = cli.log.unwrap_or_else(|| data_dir.join("statusnav.log"));

    init_tracing(&log_path)?;

    // 加载快照
    let state = load_state(&state_path)
        .with_context(|| format!("failed to load {}", state_path.display()))?;

    // 创建应用状态
    let (tx, rx) = mpsc::channel();
    let mut app = App::new(state, state_path, tx);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app, &rx);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("terminal loop failed")
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &Receiver<BranchActionEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if ui::handle_key_event(app, key.code) {
                    break;
                }
            }
            Event::Mouse(mouse) => ui::handle_mouse_event(app, mouse),
            _ => {}
        }

        // 宿主侧消费冒泡上来的分支事件
        for event in events.try_iter() {
            match event.payload() {
                Ok(payload) => {
                    tracing::info!(kind = BRANCH_ACTION_EVENT, %payload, "branch action");
                    app.message = Some(format!("{} {}", BRANCH_ACTION_EVENT, payload));
                }
                Err(e) => tracing::warn!(error = %e, "failed to encode branch action"),
            }
        }
    }
    Ok(())
}
