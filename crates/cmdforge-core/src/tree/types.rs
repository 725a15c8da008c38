//! Declared types of dynamic placeholders.

use crate::identity::IdentityResolver;
use std::fmt;

/// What a `[dynamic]` placeholder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    /// Name of a currently connected player.
    OnlinePlayer,
    /// Name of any player ever seen (live, historical or cached roster).
    Player,
    Integer,
    Double,
    /// Name of an existing world.
    World,
    /// Anything. Also used for missing or unrecognized declarations.
    Text,
}

impl ArgumentType {
    /// Parses a declared type case-insensitively; unknown names are `Text`.
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared.map(str::to_ascii_lowercase).as_deref() {
            Some("online_player") => Self::OnlinePlayer,
            Some("player") => Self::Player,
            Some("integer") => Self::Integer,
            Some("double") => Self::Double,
            Some("world") => Self::World,
            _ => Self::Text,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnlinePlayer => "online_player",
            Self::Player => "player",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::World => "world",
            Self::Text => "text",
        }
    }

    /// True if `input` is acceptable for this type.
    pub fn validate(self, input: &str, identity: &IdentityResolver) -> bool {
        match self {
            Self::OnlinePlayer => identity.platform().online_player(input).is_some(),
            Self::Player => identity.resolve(input).is_some(),
            Self::Integer => input.parse::<i32>().is_ok(),
            Self::Double => input.trim().parse::<f64>().is_ok(),
            Self::World => identity.platform().world_exists(input),
            Self::Text => true,
        }
    }

    /// Live completions for `partial` (already lowercased).
    ///
    /// Only connected players and worlds can be enumerated; other types
    /// offer nothing.
    pub fn suggestions(self, partial: &str, identity: &IdentityResolver) -> Vec<String> {
        let candidates = match self {
            Self::OnlinePlayer => identity.platform().online_player_names(),
            Self::World => identity.platform().world_names(),
            _ => return Vec::new(),
        };
        candidates.into_iter().filter(|name| name.to_lowercase().starts_with(partial)).collect()
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
