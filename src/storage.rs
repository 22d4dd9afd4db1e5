use std::fs;
use std::io;
use std::path::Path;

use crate::models::State;

/// 从TOML文件加载状态快照，文件不存在时返回空状态
pub fn load_state(path: &Path) -> io::Result<State> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "snapshot file missing, using empty state");
        return Ok(State::default());
    }

    let content = fs::read_to_string(path)?;
    let state: State =
        toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    tracing::info!(
        path = %path.display(),
        has_wip = state.wip.is_some(),
        "snapshot loaded"
    );
    Ok(state)
}
