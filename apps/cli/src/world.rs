//! World files for the simulation shell.
//!
//! A world file is TOML describing the host the shell pretends to be:
//!
//! ```toml
//! economy = true
//! sounds = ["ENTITY_PLAYER_LEVELUP"]
//!
//! [[worlds]]
//! name = "world"
//! ground = 64.0
//!
//! [[players]]
//! name = "Alice"
//! balance = 100.0
//! permissions = ["warp.use"]
//! game_mode = "survival"
//! location = { world = "world", x = 0.0, y = 64.0, z = 0.0 }
//! ```

use anyhow::{Context, bail};
use cmdforge_core::memory::{MemoryLedger, MemoryPlatform, MemoryPlayer, MemorySender};
use cmdforge_core::{GameMode, Location, SenderRef};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_WORLD: &str = "world";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldFile {
    /// Attach a ledger; without one, commands with a cost are refused.
    #[serde(default = "default_true")]
    pub economy: bool,

    /// Valid sound names; empty accepts every name.
    #[serde(default)]
    pub sounds: Vec<String>,

    #[serde(default)]
    pub worlds: Vec<WorldDef>,

    #[serde(default)]
    pub players: Vec<PlayerDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldDef {
    pub name: String,
    #[serde(default = "default_ground")]
    pub ground: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerDef {
    pub name: String,
    pub uuid: Option<Uuid>,
    #[serde(default = "default_true")]
    pub online: bool,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub game_mode: Option<String>,
    pub location: Option<LocationDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationDef {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

const fn default_true() -> bool {
    true
}

const fn default_ground() -> f64 {
    64.0
}

fn parse_game_mode(name: &str) -> anyhow::Result<GameMode> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "survival" => GameMode::Survival,
        "creative" => GameMode::Creative,
        "adventure" => GameMode::Adventure,
        "spectator" => GameMode::Spectator,
        other => bail!("unknown game mode '{}'", other),
    })
}

impl WorldFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read world file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse world file {}", path.display()))
    }

    /// Builds the in-memory host this file describes.
    pub fn build(&self) -> anyhow::Result<Simulation> {
        let platform = Arc::new(MemoryPlatform::new());
        if self.worlds.is_empty() {
            platform.add_world(DEFAULT_WORLD, default_ground());
        }
        for world in &self.worlds {
            platform.add_world(&world.name, world.ground);
        }
        for sound in &self.sounds {
            platform.add_sound(sound);
        }

        let first_world = self.worlds.first().map_or(DEFAULT_WORLD, |w| w.name.as_str());
        let ledger = self.economy.then(|| Arc::new(MemoryLedger::new()));
        let mut players = HashMap::new();

        for def in &self.players {
            let mut player = MemoryPlayer::online(&def.name, first_world);
            if let Some(id) = def.uuid {
                player.id = id;
            }
            if let Some(location) = &def.location {
                if !self.worlds.is_empty() && !self.worlds.iter().any(|w| w.name == location.world) {
                    bail!("player '{}' is in unknown world '{}'", def.name, location.world);
                }
                player = player.at(Location::new(&location.world, location.x, location.y, location.z));
            }
            if let Some(mode) = &def.game_mode {
                player = player
                    .in_mode(parse_game_mode(mode).with_context(|| format!("player '{}'", def.name))?);
            }
            if !def.online {
                player = player.offline();
            }

            let id = platform.add_player(player);
            if let Some(ledger) = &ledger {
                ledger.set_balance(id, def.balance);
            }
            players.insert(def.name.to_lowercase(), (def.name.clone(), id, def.permissions.clone()));
        }

        Ok(Simulation { platform, ledger, players })
    }
}

/// The host built from a [`WorldFile`].
pub struct Simulation {
    pub platform: Arc<MemoryPlatform>,
    pub ledger: Option<Arc<MemoryLedger>>,
    /// Lowercased name to (display name, id, permissions).
    players: HashMap<String, (String, Uuid, Vec<String>)>,
}

impl Simulation {
    /// A sender for a player declared in the world file, online or not.
    pub fn player(&self, name: &str) -> Option<SenderRef> {
        let (name, id, permissions) = self.players.get(&name.to_lowercase())?;
        let sender = MemorySender::player(&self.platform, name, *id)
            .with_permissions(permissions.iter().map(String::as_str));
        Some(Arc::new(sender))
    }

    pub fn console(&self) -> SenderRef {
        Arc::new(MemorySender::console(&self.platform))
    }

    /// `console`, or a declared player.
    pub fn sender(&self, who: &str) -> Option<SenderRef> {
        if who.eq_ignore_ascii_case("console") { Some(self.console()) } else { self.player(who) }
    }

    pub fn balance(&self, name: &str) -> Option<f64> {
        let (_, id, _) = self.players.get(&name.to_lowercase())?;
        self.ledger.as_ref().map(|ledger| ledger.balance(*id))
    }
}
