//! Capabilities the host provides to the core.
//!
//! The core never reaches into host internals. Everything it needs (who is
//! online, how to broadcast, where a player stands, how to charge money, how
//! to expose a command label) comes through these traits.

use std::sync::Arc;
use uuid::Uuid;

/// Whoever invoked a command: an interactive player or a console-like caller.
pub trait CommandSender: Send + Sync {
    /// Display name, bound to `{sender}`.
    fn name(&self) -> &str;

    /// Stable identifier; `None` for non-interactive callers.
    fn unique_id(&self) -> Option<Uuid>;

    fn has_permission(&self, permission: &str) -> bool;

    /// Delivers one line of feedback to the sender.
    fn send_message(&self, message: &str);

    /// Interactive senders are subject to cooldown and cost gates.
    fn is_interactive(&self) -> bool {
        self.unique_id().is_some()
    }
}

/// Shared handle to a sender; phased executions keep it alive until they finish.
pub type SenderRef = Arc<dyn CommandSender>;

/// Game mode of a player, as far as teleport safety cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    /// Creative and spectator players are never snapped to safe ground.
    pub fn ignores_terrain(self) -> bool {
        matches!(self, Self::Creative | Self::Spectator)
    }
}

/// A position in a named world.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self { world: world.into(), x, y, z }
    }
}

/// Banner timings in host ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTimings {
    pub fade_in: u32,
    pub stay: u32,
    pub fade_out: u32,
}

impl Default for TitleTimings {
    fn default() -> Self {
        Self { fade_in: 10, stay: 70, fade_out: 20 }
    }
}

/// Queries and effects of the hosting server.
pub trait Platform: Send + Sync {
    /// Identifier of the connected player with exactly this name.
    fn online_player(&self, name: &str) -> Option<Uuid>;

    /// Names of every connected player.
    fn online_player_names(&self) -> Vec<String>;

    /// Identifier of a player who has played before, connected or not.
    fn offline_player(&self, name: &str) -> Option<Uuid>;

    fn world_exists(&self, name: &str) -> bool;

    fn world_names(&self) -> Vec<String>;

    /// Runs a command line as the elevated console.
    fn dispatch_console(&self, command_line: &str);

    /// Sends a line to every connected player.
    fn broadcast(&self, message: &str);

    /// Makes a player say a line (or run it, if it starts with `/`).
    fn chat(&self, player: &str, message: &str);

    /// Plays a sound at the player's position. Returns false for unknown sounds.
    fn play_sound(&self, player: &str, sound: &str) -> bool;

    fn show_title(&self, player: &str, title: &str, subtitle: &str, timings: TitleTimings);

    /// Shows a transient status-line message.
    fn action_bar(&self, player: &str, message: &str);

    /// Current location of a connected player.
    fn location(&self, player: &str) -> Option<Location>;

    fn game_mode(&self, player: &str) -> Option<GameMode>;

    /// True if a player could stand at `location` without suffocating or falling.
    fn is_safe(&self, location: &Location) -> bool;

    /// Nearest safe standing position above the highest block at `location`.
    fn highest_standing(&self, location: &Location) -> Location;

    fn teleport(&self, player: &str, to: &Location);
}

/// External balance tracking.
pub trait Ledger: Send + Sync {
    fn has(&self, actor: Uuid, amount: f64) -> bool;

    /// Removes `amount`; false if the ledger refused.
    fn withdraw(&self, actor: Uuid, amount: f64) -> bool;
}

/// What the registrar needs to route input to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle {
    /// Primary command name; the dispatcher resolves labels back to it.
    pub command: String,
    pub permission: Option<String>,
    pub usage: String,
}

/// Host command router.
pub trait CommandRegistrar: Send + Sync {
    /// Exposes `label` (a command name or alias). False if the label is taken.
    fn register(&self, label: &str, handle: CommandHandle) -> bool;

    /// Removes `label`. False if it was not registered.
    fn unregister(&self, label: &str) -> bool;
}
