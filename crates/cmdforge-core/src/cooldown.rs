//! Per-command, per-actor cooldowns.

use crate::scheduler::{Scheduler, Task};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Longest cooldown actually applied; longer durations are clamped to it.
pub const MAX_COOLDOWN: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Scheduled removal of one cooldown entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownCleanup {
    pub command: String,
    pub actor: Uuid,
    /// Expiry the entry had when this cleanup was scheduled.
    pub expiry: Instant,
}

/// Expiry instants keyed by command, then actor.
///
/// Every entry has a cleanup queued for its expiry, and a command's map is
/// dropped once its last entry is cleaned up, so only live cooldowns are
/// held in memory.
#[derive(Debug, Default)]
pub struct CooldownRegistry {
    entries: HashMap<String, HashMap<Uuid, Instant>>,
}

impl CooldownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the stored expiry is strictly after `now`.
    pub fn is_active(&self, command: &str, actor: Uuid, now: Instant) -> bool {
        self.expiry(command, actor).is_some_and(|expiry| expiry > now)
    }

    /// Time left on the cooldown, zero when inactive.
    pub fn remaining(&self, command: &str, actor: Uuid, now: Instant) -> Duration {
        self.expiry(command, actor).map_or(Duration::ZERO, |expiry| expiry.saturating_duration_since(now))
    }

    fn expiry(&self, command: &str, actor: Uuid) -> Option<Instant> {
        self.entries.get(command)?.get(&actor).copied()
    }

    /// Starts (or restarts) a cooldown and queues its cleanup.
    ///
    /// A zero duration applies no cooldown at all. Durations beyond
    /// [`MAX_COOLDOWN`] are clamped to it.
    pub fn set(
        &mut self,
        command: &str,
        actor: Uuid,
        duration: Duration,
        now: Instant,
        scheduler: &mut Scheduler,
    ) {
        if duration.is_zero() {
            return;
        }

        let duration = duration.min(MAX_COOLDOWN);
        let Some(expiry) = now.checked_add(duration) else {
            warn!(command, %actor, secs = duration.as_secs(), "Cooldown expiry out of range, not applied");
            return;
        };
        self.entries.entry(command.to_string()).or_default().insert(actor, expiry);
        scheduler.schedule_at(
            expiry,
            Task::CooldownCleanup(CooldownCleanup { command: command.to_string(), actor, expiry }),
        );
        debug!(command, %actor, secs = duration.as_secs(), "Cooldown set");
    }

    /// Removes the entry only if it still has the cleanup's expiry.
    ///
    /// Returns true if an entry was removed.
    pub fn cleanup(&mut self, cleanup: &CooldownCleanup) -> bool {
        let Some(actors) = self.entries.get_mut(&cleanup.command) else {
            return false;
        };
        if actors.get(&cleanup.actor) != Some(&cleanup.expiry) {
            return false;
        }

        actors.remove(&cleanup.actor);
        if actors.is_empty() {
            self.entries.remove(&cleanup.command);
        }
        true
    }

    /// Live entries across all commands.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Commands that currently hold at least one entry.
    pub fn command_count(&self) -> usize {
        self.entries.len()
    }
}
