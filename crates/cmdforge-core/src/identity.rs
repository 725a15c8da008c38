//! Display name to identifier resolution.

use crate::host::Platform;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// One entry of the cached roster file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub expires_on: Option<String>,
}

/// Resolves names by live connection, then history, then the cached roster.
#[derive(Clone)]
pub struct IdentityResolver {
    platform: Arc<dyn Platform>,
    roster: Option<PathBuf>,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").field("roster", &self.roster).finish_non_exhaustive()
    }
}

impl IdentityResolver {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform, roster: None }
    }

    /// Sets the roster file (`usercache.json` shape).
    #[must_use]
    pub fn with_roster(mut self, path: impl AsRef<Path>) -> Self {
        self.roster = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// Resolves `name`, or `None` if every source misses.
    pub fn resolve(&self, name: &str) -> Option<Uuid> {
        self.platform
            .online_player(name)
            .or_else(|| self.platform.offline_player(name))
            .or_else(|| self.lookup_roster(name))
    }

    /// The roster is re-read on every lookup; it is only consulted after the
    /// live and historical sources miss.
    fn lookup_roster(&self, name: &str) -> Option<Uuid> {
        let path = self.roster.as_ref()?;
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read roster");
                return None;
            }
        };
        let entries: Vec<RosterEntry> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not parse roster");
                return None;
            }
        };

        let entry = entries.iter().find(|entry| entry.name.eq_ignore_ascii_case(name))?;
        match Uuid::parse_str(&entry.uuid) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(name = %entry.name, error = %e, "Roster entry has an invalid identifier");
                None
            }
        }
    }
}
