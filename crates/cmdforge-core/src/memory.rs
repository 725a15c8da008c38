//! In-memory host.
//!
//! Implements every host capability against plain data and records each
//! effect in an ordered log. Used by the simulation shell and by tests.

use crate::host::{
    CommandHandle, CommandRegistrar, CommandSender, GameMode, Ledger, Location, Platform,
    TitleTimings,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// One observable side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Feedback line delivered to a sender.
    Message { to: String, text: String },
    Console(String),
    Broadcast(String),
    Chat { player: String, text: String },
    Sound { player: String, sound: String },
    Title { player: String, title: String, subtitle: String },
    ActionBar { player: String, text: String },
    Teleport { player: String, to: Location },
}

/// A known player.
#[derive(Debug, Clone)]
pub struct MemoryPlayer {
    pub name: String,
    pub id: Uuid,
    pub online: bool,
    pub location: Location,
    pub game_mode: GameMode,
}

impl MemoryPlayer {
    /// An online survival player at the origin of `world`.
    pub fn online(name: &str, world: &str) -> Self {
        Self {
            name: name.to_string(),
            id: Uuid::new_v4(),
            online: true,
            location: Location::new(world, 0.0, 64.0, 0.0),
            game_mode: GameMode::Survival,
        }
    }

    #[must_use]
    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn in_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = mode;
        self
    }
}

#[derive(Debug, Default)]
struct PlatformState {
    players: Vec<MemoryPlayer>,
    /// World name to ground height; a flat world is safe exactly at ground level.
    worlds: Vec<(String, f64)>,
    sounds: HashSet<String>,
    effects: Vec<Effect>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Flat-world platform with an effect log.
#[derive(Debug, Default)]
pub struct MemoryPlatform {
    state: Mutex<PlatformState>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flat world whose ground is at `ground`.
    pub fn add_world(&self, name: &str, ground: f64) {
        lock(&self.state).worlds.push((name.to_string(), ground));
    }

    pub fn add_player(&self, player: MemoryPlayer) -> Uuid {
        let id = player.id;
        lock(&self.state).players.push(player);
        id
    }

    /// Restricts valid sound names; with none registered every name is valid.
    pub fn add_sound(&self, sound: &str) {
        lock(&self.state).sounds.insert(sound.to_ascii_uppercase());
    }

    pub fn set_online(&self, name: &str, online: bool) {
        if let Some(player) = lock(&self.state).players.iter_mut().find(|p| p.name == name) {
            player.online = online;
        }
    }

    pub fn player(&self, name: &str) -> Option<MemoryPlayer> {
        lock(&self.state).players.iter().find(|p| p.name == name).cloned()
    }

    /// Removes and returns every effect recorded so far.
    pub fn drain_effects(&self) -> Vec<Effect> {
        std::mem::take(&mut lock(&self.state).effects)
    }

    /// Copy of the effect log.
    pub fn effects(&self) -> Vec<Effect> {
        lock(&self.state).effects.clone()
    }

    /// Appends to the effect log.
    pub fn record(&self, effect: Effect) {
        lock(&self.state).effects.push(effect);
    }

    fn with_online<T>(&self, name: &str, f: impl FnOnce(&MemoryPlayer) -> T) -> Option<T> {
        lock(&self.state).players.iter().find(|p| p.online && p.name == name).map(f)
    }

    fn ground(&self, world: &str) -> Option<f64> {
        lock(&self.state).worlds.iter().find(|(name, _)| name == world).map(|(_, ground)| *ground)
    }
}

impl Platform for MemoryPlatform {
    fn online_player(&self, name: &str) -> Option<Uuid> {
        self.with_online(name, |p| p.id)
    }

    fn online_player_names(&self) -> Vec<String> {
        lock(&self.state).players.iter().filter(|p| p.online).map(|p| p.name.clone()).collect()
    }

    fn offline_player(&self, name: &str) -> Option<Uuid> {
        lock(&self.state).players.iter().find(|p| p.name.eq_ignore_ascii_case(name)).map(|p| p.id)
    }

    fn world_exists(&self, name: &str) -> bool {
        self.ground(name).is_some()
    }

    fn world_names(&self) -> Vec<String> {
        lock(&self.state).worlds.iter().map(|(name, _)| name.clone()).collect()
    }

    fn dispatch_console(&self, command_line: &str) {
        self.record(Effect::Console(command_line.to_string()));
    }

    fn broadcast(&self, message: &str) {
        self.record(Effect::Broadcast(message.to_string()));
    }

    fn chat(&self, player: &str, message: &str) {
        self.record(Effect::Chat { player: player.to_string(), text: message.to_string() });
    }

    fn play_sound(&self, player: &str, sound: &str) -> bool {
        let sound = sound.to_ascii_uppercase();
        let known = {
            let state = lock(&self.state);
            state.sounds.is_empty() || state.sounds.contains(&sound)
        };
        if known {
            self.record(Effect::Sound { player: player.to_string(), sound });
        }
        known
    }

    fn show_title(&self, player: &str, title: &str, subtitle: &str, _timings: TitleTimings) {
        self.record(Effect::Title {
            player: player.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
        });
    }

    fn action_bar(&self, player: &str, message: &str) {
        self.record(Effect::ActionBar { player: player.to_string(), text: message.to_string() });
    }

    fn location(&self, player: &str) -> Option<Location> {
        self.with_online(player, |p| p.location.clone())
    }

    fn game_mode(&self, player: &str) -> Option<GameMode> {
        self.with_online(player, |p| p.game_mode)
    }

    fn is_safe(&self, location: &Location) -> bool {
        self.ground(&location.world).is_some_and(|ground| (location.y - ground).abs() < 1.0)
    }

    fn highest_standing(&self, location: &Location) -> Location {
        let ground = self.ground(&location.world).unwrap_or(location.y);
        Location { y: ground, ..location.clone() }
    }

    fn teleport(&self, player: &str, to: &Location) {
        if let Some(p) = lock(&self.state).players.iter_mut().find(|p| p.name == player) {
            p.location = to.clone();
        }
        self.record(Effect::Teleport { player: player.to_string(), to: to.clone() });
    }
}

/// A sender backed by a [`MemoryPlatform`] effect log.
pub struct MemorySender {
    name: String,
    id: Option<Uuid>,
    permissions: HashSet<String>,
    operator: bool,
    platform: Arc<MemoryPlatform>,
}

impl MemorySender {
    /// An interactive player sender.
    pub fn player(platform: &Arc<MemoryPlatform>, name: &str, id: Uuid) -> Self {
        Self {
            name: name.to_string(),
            id: Some(id),
            permissions: HashSet::new(),
            operator: false,
            platform: Arc::clone(platform),
        }
    }

    /// The console: non-interactive, holds every permission.
    pub fn console(platform: &Arc<MemoryPlatform>) -> Self {
        Self {
            name: "CONSOLE".to_string(),
            id: None,
            permissions: HashSet::new(),
            operator: true,
            platform: Arc::clone(platform),
        }
    }

    #[must_use]
    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }

    #[must_use]
    pub fn with_permissions<'a>(mut self, permissions: impl IntoIterator<Item = &'a str>) -> Self {
        self.permissions.extend(permissions.into_iter().map(str::to_string));
        self
    }
}

impl CommandSender for MemorySender {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> Option<Uuid> {
        self.id
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.operator || self.permissions.contains(permission)
    }

    fn send_message(&self, message: &str) {
        self.platform.record(Effect::Message { to: self.name.clone(), text: message.to_string() });
    }
}

/// Balances keyed by identifier.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    balances: Mutex<HashMap<Uuid, f64>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, actor: Uuid, amount: f64) {
        lock(&self.balances).insert(actor, amount);
    }

    pub fn balance(&self, actor: Uuid) -> f64 {
        lock(&self.balances).get(&actor).copied().unwrap_or(0.0)
    }
}

impl Ledger for MemoryLedger {
    fn has(&self, actor: Uuid, amount: f64) -> bool {
        self.balance(actor) >= amount
    }

    fn withdraw(&self, actor: Uuid, amount: f64) -> bool {
        let mut balances = lock(&self.balances);
        let balance = balances.entry(actor).or_insert(0.0);
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }
}

/// Label table standing in for the host's command router.
#[derive(Debug, Default)]
pub struct MemoryRegistrar {
    labels: Mutex<BTreeMap<String, CommandHandle>>,
}

impl MemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered labels in sorted order.
    pub fn labels(&self) -> Vec<String> {
        lock(&self.labels).keys().cloned().collect()
    }

    pub fn handle(&self, label: &str) -> Option<CommandHandle> {
        lock(&self.labels).get(&label.to_lowercase()).cloned()
    }
}

impl CommandRegistrar for MemoryRegistrar {
    fn register(&self, label: &str, handle: CommandHandle) -> bool {
        let mut labels = lock(&self.labels);
        let key = label.to_lowercase();
        if labels.contains_key(&key) {
            return false;
        }
        labels.insert(key, handle);
        true
    }

    fn unregister(&self, label: &str) -> bool {
        lock(&self.labels).remove(&label.to_lowercase()).is_some()
    }
}
