//! Configuration file support.
//!
//! Provides the operator-facing settings and the user-facing message
//! templates. Every field has a default, so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmdforgeConfig {
    /// Directory holding one specification file per command.
    pub commands_dir: PathBuf,

    /// Cached roster consulted by identity resolution.
    pub usercache: PathBuf,

    /// How often the scheduler is pumped, in milliseconds.
    pub tick_interval_ms: u64,

    /// Permission required for the admin command and its completion.
    pub admin_permission: String,

    /// User-facing message templates.
    pub messages: Messages,
}

impl Default for CmdforgeConfig {
    fn default() -> Self {
        Self {
            commands_dir: PathBuf::from("commands"),
            usercache: PathBuf::from("usercache.json"),
            tick_interval_ms: 50,
            admin_permission: "cmdforge.admin".to_string(),
            messages: Messages::default(),
        }
    }
}

/// Message templates. `&` colour codes are translated when sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub cooldown: String,
    pub insufficient_funds: String,
    pub ledger_unavailable: String,
    pub no_permission: String,
    pub player_only: String,
    pub unknown_command: String,
    pub reloaded: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            cooldown: "&cYou are on cooldown for this command.".to_string(),
            insufficient_funds: "&cYou do not have enough money to use this command.".to_string(),
            ledger_unavailable: "&cCommands with a cost are currently disabled.".to_string(),
            no_permission: "&cI'm sorry, but you do not have permission to perform this command."
                .to_string(),
            player_only: "&cThis command action can only be run by a player.".to_string(),
            unknown_command: "Unknown command. Type \"/help\" for help.".to_string(),
            reloaded: "&aCustom command specifications have been reloaded!".to_string(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl CmdforgeConfig {
    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the runtime cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue("tick_interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Scheduler pump period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Resolves relative paths against `base` (usually the config file's directory).
    #[must_use]
    pub fn rebased(mut self, base: &Path) -> Self {
        if self.commands_dir.is_relative() {
            self.commands_dir = base.join(&self.commands_dir);
        }
        if self.usercache.is_relative() {
            self.usercache = base.join(&self.usercache);
        }
        self
    }
}
