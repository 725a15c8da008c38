//! Invocation failure types.

/// Why an invocation was rejected.
///
/// Every variant carries the raw (untranslated) message delivered to the
/// sender, so `Display` is exactly what the sender sees before colour
/// translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No command is registered under the label.
    #[error("{0}")]
    UnknownCommand(String),

    /// The path is incomplete or matches nothing; carries the usage message.
    #[error("{0}")]
    UsagePrefixIncomplete(String),

    /// The sender lacks the command's or a node's permission.
    #[error("{0}")]
    PermissionDenied(String),

    /// A segment failed the declared type of its placeholder.
    #[error("{0}")]
    InvalidArgument(String),

    /// The sender used this command too recently.
    #[error("{0}")]
    OnCooldown(String),

    /// The sender cannot pay the command's cost.
    #[error("{0}")]
    InsufficientFunds(String),

    /// The command has a cost but no ledger is attached.
    #[error("{0}")]
    LedgerUnavailable(String),
}

impl DispatchError {
    /// The message delivered to the sender.
    pub fn message(&self) -> &str {
        match self {
            Self::UnknownCommand(m)
            | Self::UsagePrefixIncomplete(m)
            | Self::PermissionDenied(m)
            | Self::InvalidArgument(m)
            | Self::OnCooldown(m)
            | Self::InsufficientFunds(m)
            | Self::LedgerUnavailable(m) => m,
        }
    }
}
