//! Specification units: one declarative file per command.
//!
//! # Example
//!
//! `commands/warp.yml`:
//!
//! ```yaml
//! permission: warp.use
//! usage-message: "&cUsage: /warp <spawn|player>"
//! aliases: [w]
//! cost: 5
//! cooldown: 30 seconds
//! arguments:
//!   spawn:
//!     delay:
//!       length: 3 seconds
//!       per_second-actions:
//!         small_text: "&eWarping in {seconds_remaining}..."
//!     actions:
//!       console: ["spawn {sender}"]
//!   "[target]":
//!     type: online_player
//!     type-error: "&c%input% is not online."
//!     actions:
//!       teleport:
//!         who: "{sender}"
//!         toPlayer: "[target]"
//! ```

mod error;
mod loader;
mod model;

pub use error::{Result, SpecError};
pub use loader::{LoadFailure, LoadReport, SpecLoader};
pub use model::{ActionSet, CommandDefinition, CommandSpec, DelaySpec, NodeDefinition};
