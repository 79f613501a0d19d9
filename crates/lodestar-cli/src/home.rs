use lodestar_core::LodestarError;
use std::path::{Path, PathBuf};

/// Resolve the lodestar home directory.
///
/// Priority:
/// 1. `--home` flag / `LODESTAR_HOME` env var (passed in as `explicit`)
/// 2. `~/.lodestar`
pub fn resolve_home(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let home = home::home_dir().ok_or(LodestarError::HomeNotFound)?;
    Ok(home.join(".lodestar"))
}
