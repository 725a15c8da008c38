//! # cmdforge core
//!
//! Declarative custom commands for game-server style hosts.
//!
//! Each command is one specification unit describing a tree of argument
//! paths (literal words, fixed `{aliases}` and typed `[slots]`) ending in
//! ordered action sets. The [`Dispatcher`] matches input against the tree,
//! runs the permission, cooldown and cost gates, and hands the bound
//! actions to the [`ActionExecutor`], either immediately or as a countdown
//! driven by the [`Scheduler`].
//!
//! The host stays behind the traits in [`host`]: the core decides which
//! effect to run and with what parameters, the host performs it.

pub mod admin;
pub mod bindings;
pub mod colors;
pub mod config;
pub mod cooldown;
pub mod dispatcher;
pub mod duration;
pub mod error;
pub mod executor;
pub mod host;
pub mod identity;
pub mod memory;
pub mod runtime;
pub mod scheduler;
pub mod spec;
pub mod tree;
pub mod value;

pub use admin::AdminCommand;
pub use bindings::Bindings;
pub use config::{CmdforgeConfig, ConfigError, Messages};
pub use cooldown::{CooldownCleanup, CooldownRegistry, MAX_COOLDOWN};
pub use dispatcher::{DispatchError, Dispatcher, Invocation, ReloadSummary};
pub use duration::parse_duration;
pub use error::{CmdforgeError, Result};
pub use executor::{ActionExecutor, ActionKind, RunSummary};
pub use host::{
    CommandHandle, CommandRegistrar, CommandSender, GameMode, Ledger, Location, Platform, SenderRef,
    TitleTimings,
};
pub use identity::IdentityResolver;
pub use runtime::{DriverHandle, SharedDispatcher, drive};
pub use scheduler::{Clock, Countdown, ManualClock, PhasedExecution, Scheduler, SystemClock, Task, TickStep};
pub use spec::{CommandSpec, LoadReport, SpecError, SpecLoader};
pub use tree::{ArgumentTree, ArgumentType, MatchOutcome, NodeId, Resolution};
pub use value::Value;
