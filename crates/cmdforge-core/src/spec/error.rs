//! Specification loading error types.

use std::io;
use std::path::PathBuf;

/// Errors raised while reading or building a specification unit.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// I/O error while reading a unit or its directory.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Structurally valid document with an unusable definition.
    #[error("invalid command definition: {0}")]
    InvalidDefinition(String),

    /// Two units resolve to the same command name.
    #[error("duplicate command '{name}' (already defined by {})", first.display())]
    DuplicateCommand {
        /// Command name shared by both units.
        name: String,
        /// Unit that claimed the name first.
        first: PathBuf,
    },
}

/// Result type for specification operations.
pub type Result<T> = std::result::Result<T, SpecError>;
