//! Command table and invocation pipeline.
//!
//! The dispatcher owns every piece of mutable state: the command table, the
//! cooldown registry and the scheduler. All of it is driven from one serial
//! context, so none of it is locked internally; hosts that share a
//! dispatcher across tasks wrap it in a mutex (see [`crate::runtime`]).
//!
//! An invocation runs these gates in order, each short-circuiting with
//! exactly one message and no side effect from later stages:
//!
//! 1. command permission, argument path and node permissions
//! 2. cooldown (interactive senders only)
//! 3. cost (interactive senders only)
//!
//! The cooldown is only committed after the cost is paid.

mod error;

pub use error::DispatchError;

use crate::colors::translate;
use crate::config::{CmdforgeConfig, Messages};
use crate::cooldown::CooldownRegistry;
use crate::executor::{ActionExecutor, RunSummary};
use crate::host::{CommandHandle, CommandRegistrar, CommandSender, Ledger, Platform, SenderRef};
use crate::identity::IdentityResolver;
use crate::scheduler::{Clock, Scheduler, SystemClock, Task};
use crate::spec::{CommandSpec, LoadFailure, SpecLoader};
use crate::tree::MatchOutcome;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Period between countdown ticks.
const TICK: Duration = Duration::from_secs(1);

/// A successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The actions ran immediately.
    Completed { command: String, summary: RunSummary },
    /// A countdown was started; its first tick is due on the next pump.
    Scheduled { command: String, length_secs: u64 },
}

impl Invocation {
    pub fn command(&self) -> &str {
        match self {
            Self::Completed { command, .. } | Self::Scheduled { command, .. } => command,
        }
    }
}

/// Result of a reload.
#[derive(Debug, Default)]
pub struct ReloadSummary {
    /// Names of the commands now in the table.
    pub loaded: Vec<String>,
    /// Units that were skipped.
    pub failures: Vec<LoadFailure>,
}

/// Owns the command table and runs invocations through the gates.
pub struct Dispatcher {
    /// Keyed by lowercase command name.
    commands: HashMap<String, Arc<CommandSpec>>,
    /// Lowercase alias to lowercase command name.
    aliases: HashMap<String, String>,
    /// Labels currently held at the registrar.
    registered: Vec<String>,
    identity: IdentityResolver,
    executor: ActionExecutor,
    ledger: Option<Arc<dyn Ledger>>,
    registrar: Option<Arc<dyn CommandRegistrar>>,
    registrar_missing_logged: bool,
    cooldowns: CooldownRegistry,
    scheduler: Scheduler,
    clock: Arc<dyn Clock>,
    messages: Messages,
    commands_dir: PathBuf,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("commands", &self.commands.len())
            .field("aliases", &self.aliases.len())
            .field("cooldowns", &self.cooldowns.len())
            .field("scheduled", &self.scheduler.len())
            .field("commands_dir", &self.commands_dir)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with an empty table, the wall clock, default
    /// messages, no ledger and no registrar.
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        let messages = Messages::default();
        Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
            registered: Vec::new(),
            identity: IdentityResolver::new(Arc::clone(&platform)),
            executor: ActionExecutor::new(platform, &messages),
            ledger: None,
            registrar: None,
            registrar_missing_logged: false,
            cooldowns: CooldownRegistry::new(),
            scheduler: Scheduler::new(),
            clock: Arc::new(SystemClock),
            messages,
            commands_dir: PathBuf::from("commands"),
        }
    }

    /// Creates a dispatcher with messages, commands directory and roster
    /// taken from `config`.
    pub fn from_config(platform: Arc<dyn Platform>, config: &CmdforgeConfig) -> Self {
        Self::new(platform)
            .with_messages(config.messages.clone())
            .with_commands_dir(&config.commands_dir)
            .with_roster(&config.usercache)
    }

    #[must_use]
    pub fn with_ledger(mut self, ledger: Arc<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    #[must_use]
    pub fn with_registrar(mut self, registrar: Arc<dyn CommandRegistrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_cooldowns(mut self, cooldowns: CooldownRegistry) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.executor = ActionExecutor::new(Arc::clone(self.executor.platform()), &messages);
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_commands_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.commands_dir = dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn with_roster(mut self, path: impl AsRef<Path>) -> Self {
        self.identity = self.identity.with_roster(path);
        self
    }

    /// Looks up a command by name or alias, case-insensitively.
    pub fn command(&self, label: &str) -> Option<&Arc<CommandSpec>> {
        let label = label.to_lowercase();
        let name = self.aliases.get(&label).unwrap_or(&label);
        self.commands.get(name)
    }

    /// Loaded command names, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.values().map(|spec| spec.name()).collect();
        names.sort_unstable();
        names
    }

    /// Labels currently registered with the host.
    pub fn registered_labels(&self) -> &[String] {
        &self.registered
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn cooldowns(&self) -> &CooldownRegistry {
        &self.cooldowns
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn commands_dir(&self) -> &Path {
        &self.commands_dir
    }

    /// Runs `label args...` for `sender` through every gate.
    ///
    /// On success the actions have run (or a countdown has been queued); on
    /// failure nothing happened and the error carries the message for the
    /// sender.
    pub fn dispatch<A: AsRef<str>>(
        &mut self,
        sender: &SenderRef,
        label: &str,
        args: &[A],
    ) -> Result<Invocation, DispatchError> {
        let spec = self
            .command(label)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownCommand(self.messages.unknown_command.clone()))?;

        let resolution = match spec.tree().match_path(args, sender.as_ref(), &self.identity) {
            MatchOutcome::Resolved(resolution) => resolution,
            MatchOutcome::UsagePrefixIncomplete => {
                return Err(DispatchError::UsagePrefixIncomplete(spec.usage()));
            }
            MatchOutcome::InvalidArgument(message) => {
                return Err(DispatchError::InvalidArgument(message));
            }
            MatchOutcome::PermissionDenied(message) => {
                return Err(DispatchError::PermissionDenied(
                    message.unwrap_or_else(|| self.messages.no_permission.clone()),
                ));
            }
        };

        let now = self.clock.now();
        if let Some(actor) = sender.unique_id() {
            self.pass_gates(&spec, actor, now)?;
            self.cooldowns.set(spec.name(), actor, spec.cooldown_duration(), now, &mut self.scheduler);
        } else {
            debug!(command = spec.name(), sender = sender.name(), "Non-interactive sender, gates skipped");
        }

        let command = spec.name().to_string();
        if let Some(delay) = resolution.delay {
            let length_secs = delay.length_secs();
            let execution = self.executor.start_phased(
                Arc::clone(sender),
                delay,
                resolution.actions,
                resolution.bindings,
            );
            self.scheduler.schedule_at(now, Task::Phased(execution));
            debug!(command = %command, length_secs, "Phased execution scheduled");
            return Ok(Invocation::Scheduled { command, length_secs });
        }

        let summary = resolution.actions.map_or_else(RunSummary::default, |actions| {
            self.executor.run(sender.as_ref(), &actions, &resolution.bindings)
        });
        Ok(Invocation::Completed { command, summary })
    }

    /// Cooldown then cost. Pays the cost when both pass.
    fn pass_gates(&self, spec: &CommandSpec, actor: Uuid, now: Instant) -> Result<(), DispatchError> {
        if spec.cooldown().is_some() && self.cooldowns.is_active(spec.name(), actor, now) {
            debug!(
                command = spec.name(),
                %actor,
                remaining_secs = self.cooldowns.remaining(spec.name(), actor, now).as_secs(),
                "Rejected: on cooldown"
            );
            return Err(DispatchError::OnCooldown(self.messages.cooldown.clone()));
        }

        let cost = spec.cost();
        if cost > 0.0 {
            let Some(ledger) = self.ledger.as_ref() else {
                debug!(command = spec.name(), cost, "Rejected: no ledger");
                return Err(DispatchError::LedgerUnavailable(self.messages.ledger_unavailable.clone()));
            };
            if !ledger.has(actor, cost) {
                debug!(command = spec.name(), %actor, cost, "Rejected: insufficient funds");
                return Err(DispatchError::InsufficientFunds(self.messages.insufficient_funds.clone()));
            }
            if !ledger.withdraw(actor, cost) {
                warn!(command = spec.name(), %actor, cost, "Ledger refused a withdrawal it had approved");
                return Err(DispatchError::InsufficientFunds(self.messages.insufficient_funds.clone()));
            }
        }
        Ok(())
    }

    /// Like [`dispatch`](Self::dispatch), but delivers the failure message to
    /// the sender instead of returning it.
    pub fn execute<A: AsRef<str>>(&mut self, sender: &SenderRef, label: &str, args: &[A]) -> Option<Invocation> {
        match self.dispatch(sender, label, args) {
            Ok(invocation) => Some(invocation),
            Err(err) => {
                debug!(label, sender = sender.name(), error = ?err, "Invocation rejected");
                sender.send_message(&translate(err.message()));
                None
            }
        }
    }

    /// Completions for the last of `args`.
    pub fn tab_complete<A: AsRef<str>>(&self, sender: &dyn CommandSender, label: &str, args: &[A]) -> Vec<String> {
        let Some(spec) = self.command(label) else {
            return Vec::new();
        };
        if spec.permission().is_some_and(|permission| !sender.has_permission(permission)) {
            return Vec::new();
        }
        spec.tree().suggest(args, sender, &self.identity)
    }

    /// Applies every task due now. Returns the number of tasks applied.
    ///
    /// Countdowns that still have ticks left are re-posted one second after
    /// this pump.
    pub fn run_pending(&mut self) -> usize {
        let now = self.clock.now();
        let mut applied = 0;
        while let Some(task) = self.scheduler.pop_due(now) {
            applied += 1;
            match task {
                Task::CooldownCleanup(cleanup) => {
                    self.cooldowns.cleanup(&cleanup);
                }
                Task::Phased(mut execution) => {
                    if self.executor.tick(&mut execution) {
                        self.scheduler.schedule_at(now + TICK, Task::Phased(execution));
                    }
                }
            }
        }
        applied
    }

    /// Replaces the whole command table.
    ///
    /// Every label registered by the previous table is unregistered first,
    /// then the new names and aliases are registered. Commands keep their
    /// input order for alias conflicts: a later alias never shadows an
    /// earlier one, and no alias shadows a command name.
    pub fn load(&mut self, specs: Vec<CommandSpec>) {
        self.unregister_all();

        let mut ordered: Vec<Arc<CommandSpec>> = Vec::with_capacity(specs.len());
        let mut commands = HashMap::new();
        for spec in specs {
            let key = spec.name().to_lowercase();
            if commands.contains_key(&key) {
                warn!(command = spec.name(), "Duplicate command name, keeping the first");
                continue;
            }
            let spec = Arc::new(spec);
            commands.insert(key, Arc::clone(&spec));
            ordered.push(spec);
        }

        let mut aliases: HashMap<String, String> = HashMap::new();
        let mut labels: Vec<(String, CommandHandle)> = Vec::new();
        for spec in &ordered {
            let key = spec.name().to_lowercase();
            let handle = CommandHandle {
                command: spec.name().to_string(),
                permission: spec.permission().map(str::to_string),
                usage: spec.usage(),
            };
            labels.push((spec.name().to_string(), handle.clone()));

            for alias in spec.aliases() {
                let alias_key = alias.to_lowercase();
                if commands.contains_key(&alias_key) || aliases.contains_key(&alias_key) {
                    warn!(command = spec.name(), alias = %alias, "Alias already in use, skipping");
                    continue;
                }
                aliases.insert(alias_key, key.clone());
                labels.push((alias.clone(), handle.clone()));
            }
        }

        self.commands = commands;
        self.aliases = aliases;
        self.register_all(labels);
        info!(commands = self.commands.len(), aliases = self.aliases.len(), "Command table loaded");
    }

    /// Loads every unit in `dir` and swaps the table in.
    ///
    /// # Errors
    /// Only if the directory itself cannot be created or listed; the table
    /// is left untouched in that case.
    pub fn reload_from(&mut self, dir: &Path) -> crate::Result<ReloadSummary> {
        let report = SpecLoader::new(dir).load()?;
        let loaded: Vec<String> = report.specs.iter().map(|spec| spec.name().to_string()).collect();
        self.load(report.specs);
        Ok(ReloadSummary { loaded, failures: report.failures })
    }

    /// Reloads from the configured commands directory.
    pub fn reload(&mut self) -> crate::Result<ReloadSummary> {
        let dir = self.commands_dir.clone();
        self.reload_from(&dir)
    }

    /// Releases every registered label and empties the command table.
    ///
    /// Countdowns already queued still run to completion on later pumps.
    pub fn shutdown(&mut self) {
        let labels = self.registered.len();
        self.unregister_all();
        self.commands.clear();
        self.aliases.clear();
        info!(labels, "Commands unregistered");
    }

    fn unregister_all(&mut self) {
        let labels = std::mem::take(&mut self.registered);
        let Some(registrar) = self.registrar.as_ref() else {
            return;
        };
        for label in labels {
            if !registrar.unregister(&label) {
                debug!(label = %label, "Label was not registered");
            }
        }
    }

    fn register_all(&mut self, labels: Vec<(String, CommandHandle)>) {
        let Some(registrar) = self.registrar.as_ref() else {
            if !self.registrar_missing_logged {
                error!("No command registrar available; commands are only reachable through direct dispatch");
                self.registrar_missing_logged = true;
            }
            return;
        };

        for (label, handle) in labels {
            if registrar.register(&label, handle) {
                self.registered.push(label);
            } else {
                warn!(label = %label, "Label already taken at the registrar");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Effect, MemoryLedger, MemoryPlatform, MemoryPlayer, MemoryRegistrar, MemorySender};
    use crate::scheduler::ManualClock;

    struct Fixture {
        platform: Arc<MemoryPlatform>,
        ledger: Arc<MemoryLedger>,
        registrar: Arc<MemoryRegistrar>,
        clock: Arc<ManualClock>,
        dispatcher: Dispatcher,
        alice: SenderRef,
        alice_id: Uuid,
    }

    impl Fixture {
        fn new(specs: &[(&str, &str)]) -> Self {
            let platform = Arc::new(MemoryPlatform::new());
            platform.add_world("world", 64.0);
            let alice_id = platform.add_player(MemoryPlayer::online("Alice", "world"));
            let ledger = Arc::new(MemoryLedger::new());
            let registrar = Arc::new(MemoryRegistrar::new());
            let clock = Arc::new(ManualClock::new());

            let mut dispatcher = Dispatcher::new(Arc::clone(&platform) as Arc<dyn Platform>)
                .with_ledger(Arc::clone(&ledger) as Arc<dyn Ledger>)
                .with_registrar(Arc::clone(&registrar) as Arc<dyn CommandRegistrar>)
                .with_clock(Arc::clone(&clock) as Arc<dyn Clock>);
            dispatcher.load(specs.iter().map(|(name, yaml)| CommandSpec::from_yaml_str(name, yaml).unwrap()).collect());

            let alice: SenderRef = Arc::new(MemorySender::player(&platform, "Alice", alice_id));
            Self { platform, ledger, registrar, clock, dispatcher, alice, alice_id }
        }

        fn messages(&self) -> Vec<String> {
            self.platform
                .drain_effects()
                .into_iter()
                .filter_map(|effect| match effect {
                    Effect::Message { text, .. } => Some(text),
                    _ => None,
                })
                .collect()
        }
    }

    const NONE: [&str; 0] = [];

    #[test]
    fn test_unknown_command() {
        let mut fx = Fixture::new(&[]);
        let err = fx.dispatcher.dispatch(&fx.alice, "nope", &NONE).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(_)));
    }

    #[test]
    fn test_label_lookup_is_case_insensitive_and_follows_aliases() {
        let mut fx = Fixture::new(&[("Ping", "aliases: [p]\nactions: {message: [pong]}\n")]);
        assert!(fx.dispatcher.dispatch(&fx.alice, "PING", &NONE).is_ok());
        assert!(fx.dispatcher.dispatch(&fx.alice, "P", &NONE).is_ok());
        assert_eq!(fx.messages(), vec!["pong", "pong"]);
    }

    #[test]
    fn test_usage_and_permission_messages() {
        let mut fx = Fixture::new(&[(
            "kit",
            "permission: kit.use\nusage-message: \"&cUsage: /kit <name>\"\narguments:\n  starter:\n    actions: {message: [x]}\n",
        )]);
        let err = fx.dispatcher.dispatch(&fx.alice, "kit", &NONE).unwrap_err();
        assert_eq!(err, DispatchError::PermissionDenied(Messages::default().no_permission));

        let holder: SenderRef = Arc::new(
            MemorySender::player(&fx.platform, "Alice", fx.alice_id).with_permission("kit.use"),
        );
        let err = fx.dispatcher.dispatch(&holder, "kit", &NONE).unwrap_err();
        assert_eq!(err, DispatchError::UsagePrefixIncomplete("&cUsage: /kit <name>".to_string()));

        // execute delivers exactly one translated message.
        assert!(fx.dispatcher.execute(&holder, "kit", &NONE).is_none());
        assert_eq!(fx.messages(), vec![translate("&cUsage: /kit <name>")]);
    }

    #[test]
    fn test_cooldown_gate_and_refresh() {
        let mut fx = Fixture::new(&[("warp", "cooldown: 10 seconds\nactions: {message: [go]}\n")]);
        assert!(fx.dispatcher.dispatch(&fx.alice, "warp", &NONE).is_ok());

        fx.clock.advance(Duration::from_secs(5));
        let err = fx.dispatcher.dispatch(&fx.alice, "warp", &NONE).unwrap_err();
        assert!(matches!(err, DispatchError::OnCooldown(_)));

        fx.clock.advance(Duration::from_secs(5));
        assert_eq!(fx.dispatcher.run_pending(), 1);
        assert!(fx.dispatcher.cooldowns().is_empty());
        assert!(fx.dispatcher.dispatch(&fx.alice, "warp", &NONE).is_ok());
        assert!(fx.dispatcher.cooldowns().is_active("warp", fx.alice_id, fx.clock.now()));
    }

    #[test]
    fn test_aliases_share_the_cooldown() {
        let mut fx = Fixture::new(&[("warp", "aliases: [w]\ncooldown: 1 minute\nactions: {message: [go]}\n")]);
        assert!(fx.dispatcher.dispatch(&fx.alice, "w", &NONE).is_ok());
        assert!(matches!(
            fx.dispatcher.dispatch(&fx.alice, "warp", &NONE),
            Err(DispatchError::OnCooldown(_))
        ));
    }

    #[test]
    fn test_cost_gate() {
        let mut fx = Fixture::new(&[("heal", "cost: 5\ncooldown: 10 seconds\nactions: {message: [healed]}\n")]);
        fx.ledger.set_balance(fx.alice_id, 3.0);
        let err = fx.dispatcher.dispatch(&fx.alice, "heal", &NONE).unwrap_err();
        assert!(matches!(err, DispatchError::InsufficientFunds(_)));
        assert!((fx.ledger.balance(fx.alice_id) - 3.0).abs() < f64::EPSILON);
        // A rejected invocation does not consume the cooldown.
        assert!(fx.dispatcher.cooldowns().is_empty());

        fx.ledger.set_balance(fx.alice_id, 10.0);
        assert!(fx.dispatcher.dispatch(&fx.alice, "heal", &NONE).is_ok());
        assert!((fx.ledger.balance(fx.alice_id) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cost_without_ledger() {
        let platform = Arc::new(MemoryPlatform::new());
        let id = platform.add_player(MemoryPlayer::online("Alice", "world"));
        let alice: SenderRef = Arc::new(MemorySender::player(&platform, "Alice", id));
        let mut dispatcher = Dispatcher::new(Arc::clone(&platform) as Arc<dyn Platform>);
        dispatcher.load(vec![
            CommandSpec::from_yaml_str("paid", "cost: 1\nactions: {message: [x]}\n").unwrap(),
            CommandSpec::from_yaml_str("free", "actions: {message: [x]}\n").unwrap(),
        ]);

        assert!(matches!(
            dispatcher.dispatch(&alice, "paid", &NONE),
            Err(DispatchError::LedgerUnavailable(_))
        ));
        assert!(dispatcher.dispatch(&alice, "free", &NONE).is_ok());
    }

    #[test]
    fn test_console_skips_gates() {
        let mut fx = Fixture::new(&[("heal", "cost: 5\ncooldown: 10 seconds\nactions: {message: [healed]}\n")]);
        let console: SenderRef = Arc::new(MemorySender::console(&fx.platform));
        assert!(fx.dispatcher.dispatch(&console, "heal", &NONE).is_ok());
        assert!(fx.dispatcher.dispatch(&console, "heal", &NONE).is_ok());
        assert!(fx.dispatcher.cooldowns().is_empty());
    }

    #[test]
    fn test_phased_invocation() {
        let mut fx = Fixture::new(&[(
            "spawn",
            "delay:\n  length: 2 seconds\n  per_second-actions:\n    message: [\"{seconds_remaining}\"]\nactions: {message: [done]}\n",
        )]);
        let invocation = fx.dispatcher.dispatch(&fx.alice, "spawn", &NONE).unwrap();
        assert_eq!(invocation, Invocation::Scheduled { command: "spawn".into(), length_secs: 2 });
        assert!(fx.messages().is_empty());

        fx.dispatcher.run_pending();
        assert_eq!(fx.messages(), vec!["2"]);
        // Pumping again within the same second does nothing.
        assert_eq!(fx.dispatcher.run_pending(), 0);

        fx.clock.advance(TICK);
        fx.dispatcher.run_pending();
        fx.clock.advance(TICK);
        fx.dispatcher.run_pending();
        assert_eq!(fx.messages(), vec!["1", "done"]);
        assert!(fx.dispatcher.scheduler().is_empty());
    }

    #[test]
    fn test_load_registers_and_reload_unregisters() {
        let mut fx = Fixture::new(&[
            ("warp", "aliases: [w, go]\nactions: {message: [x]}\n"),
            ("home", "aliases: [h, w]\nactions: {message: [x]}\n"),
        ]);
        assert_eq!(fx.registrar.labels(), vec!["go", "h", "home", "w", "warp"]);
        assert_eq!(fx.dispatcher.command("w").map(|spec| spec.name()), Some("warp"));

        fx.dispatcher.load(vec![CommandSpec::from_yaml_str("home", "actions: {message: [x]}\n").unwrap()]);
        assert_eq!(fx.registrar.labels(), vec!["home"]);
        assert!(fx.dispatcher.command("warp").is_none());
        assert!(fx.dispatcher.command("w").is_none());
        assert_eq!(fx.dispatcher.registered_labels(), &["home".to_string()]);
    }

    #[test]
    fn test_shutdown_releases_every_label() {
        let mut fx = Fixture::new(&[
            ("warp", "aliases: [w, tp]\nactions: {message: [x]}\n"),
            ("home", "actions: {message: [y]}\n"),
        ]);
        assert_eq!(fx.registrar.labels(), vec!["home", "tp", "w", "warp"]);

        fx.dispatcher.shutdown();
        assert!(fx.registrar.labels().is_empty());
        assert!(fx.dispatcher.registered_labels().is_empty());
        assert!(fx.dispatcher.command_names().is_empty());
        assert!(matches!(
            fx.dispatcher.dispatch(&fx.alice, "warp", &NONE),
            Err(DispatchError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_missing_registrar_still_dispatches() {
        let platform = Arc::new(MemoryPlatform::new());
        let mut dispatcher = Dispatcher::new(Arc::clone(&platform) as Arc<dyn Platform>);
        dispatcher.load(vec![CommandSpec::from_yaml_str("ping", "actions: {message: [pong]}\n").unwrap()]);
        dispatcher.load(vec![CommandSpec::from_yaml_str("ping", "actions: {message: [pong]}\n").unwrap()]);
        assert!(dispatcher.registered_labels().is_empty());

        let console: SenderRef = Arc::new(MemorySender::console(&platform));
        assert!(dispatcher.dispatch(&console, "ping", &NONE).is_ok());
    }

    #[test]
    fn test_tab_complete_checks_command_permission() {
        let fx = Fixture::new(&[(
            "kit",
            "permission: kit.use\narguments:\n  starter:\n    actions: {message: [x]}\n  stone:\n    actions: {message: [x]}\n",
        )]);
        let plain = MemorySender::player(&fx.platform, "Alice", fx.alice_id);
        assert!(fx.dispatcher.tab_complete(&plain, "kit", &["st"]).is_empty());

        let holder = MemorySender::player(&fx.platform, "Alice", fx.alice_id).with_permission("kit.use");
        assert_eq!(fx.dispatcher.tab_complete(&holder, "kit", &["st"]), vec!["starter", "stone"]);
        assert!(fx.dispatcher.tab_complete(&holder, "unknown", &[""]).is_empty());
    }
}
