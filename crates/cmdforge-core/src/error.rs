//! Error types for cmdforge core.

use crate::config::ConfigError;
use crate::dispatcher::DispatchError;
use crate::spec::SpecError;
use thiserror::Error;

/// Core error type for cmdforge operations.
#[derive(Error, Debug)]
pub enum CmdforgeError {
    /// Specification loading errors
    #[error("Specification error: {0}")]
    Spec(#[from] SpecError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected invocations
    #[error("Invocation rejected: {0}")]
    Dispatch(#[from] DispatchError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cmdforge operations.
pub type Result<T> = std::result::Result<T, CmdforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_error_conversion() {
        let err: CmdforgeError = SpecError::InvalidDefinition("bad".to_string()).into();
        match err {
            CmdforgeError::Spec(SpecError::InvalidDefinition(msg)) => assert_eq!(msg, "bad"),
            other => panic!("Expected Spec error variant, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_error_display() {
        let err: CmdforgeError = DispatchError::OnCooldown("&cWait".to_string()).into();
        assert_eq!(err.to_string(), "Invocation rejected: &cWait");
    }
}
