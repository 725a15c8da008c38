//! Shared test utilities for cmdforge core integration tests.
//!
//! A [`Harness`] wires a dispatcher to the in-memory host with a manual
//! clock and a temporary commands directory.

#![allow(dead_code)]

use cmdforge_core::memory::{Effect, MemoryLedger, MemoryPlatform, MemoryPlayer, MemoryRegistrar, MemorySender};
use cmdforge_core::{Clock, CommandRegistrar, Dispatcher, Ledger, ManualClock, Platform, SenderRef};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

pub struct Harness {
    pub temp_dir: TempDir,
    pub platform: Arc<MemoryPlatform>,
    pub ledger: Arc<MemoryLedger>,
    pub registrar: Arc<MemoryRegistrar>,
    pub clock: Arc<ManualClock>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    /// Empty commands directory, one flat world, no players.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let platform = Arc::new(MemoryPlatform::new());
        platform.add_world("world", 64.0);
        let ledger = Arc::new(MemoryLedger::new());
        let registrar = Arc::new(MemoryRegistrar::new());
        let clock = Arc::new(ManualClock::new());

        let dispatcher = Dispatcher::new(Arc::clone(&platform) as Arc<dyn Platform>)
            .with_ledger(Arc::clone(&ledger) as Arc<dyn Ledger>)
            .with_registrar(Arc::clone(&registrar) as Arc<dyn CommandRegistrar>)
            .with_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .with_commands_dir(temp_dir.path());

        Self { temp_dir, platform, ledger, registrar, clock, dispatcher }
    }

    pub fn commands_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a unit file into the commands directory.
    pub fn write_unit(&self, file: &str, content: &str) {
        std::fs::write(self.commands_dir().join(file), content).unwrap();
    }

    pub fn remove_unit(&self, file: &str) {
        std::fs::remove_file(self.commands_dir().join(file)).unwrap();
    }

    /// Reloads and asserts every unit loaded.
    pub fn reload(&mut self) {
        let summary = self.dispatcher.reload().unwrap();
        assert!(summary.failures.is_empty(), "unexpected load failures: {:?}", summary.failures);
    }

    /// Adds an online player and returns a sender for them.
    pub fn player(&self, name: &str, permissions: &[&str]) -> (SenderRef, Uuid) {
        let id = self.platform.add_player(MemoryPlayer::online(name, "world"));
        let sender = MemorySender::player(&self.platform, name, id).with_permissions(permissions.iter().copied());
        (Arc::new(sender), id)
    }

    pub fn console(&self) -> SenderRef {
        Arc::new(MemorySender::console(&self.platform))
    }

    pub fn advance(&self, secs: u64) {
        self.clock.advance(Duration::from_secs(secs));
    }

    /// Advances one second at a time, pumping the scheduler after each step.
    pub fn run_for(&mut self, secs: u64) {
        self.dispatcher.run_pending();
        for _ in 0..secs {
            self.advance(1);
            self.dispatcher.run_pending();
        }
    }

    /// Drains the effect log, keeping only feedback lines.
    pub fn messages(&self) -> Vec<String> {
        self.platform
            .drain_effects()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.platform.drain_effects()
    }
}

/// Splits a command line into arguments.
pub fn args(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}
