//! Command implementations for the cmdforge CLI.

pub mod check;
pub mod inspect;
pub mod shell;

use anyhow::Context;
use cmdforge_core::CmdforgeConfig;
use std::path::{Path, PathBuf};

/// Loads the configuration, resolving its relative paths against the
/// file's directory.
pub fn load_config(path: &Path) -> anyhow::Result<CmdforgeConfig> {
    let config = CmdforgeConfig::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    let base = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok(config.rebased(&base))
}

/// The directory given on the command line, else the configured one.
pub fn commands_dir(config: &CmdforgeConfig, dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| config.commands_dir.clone())
}
