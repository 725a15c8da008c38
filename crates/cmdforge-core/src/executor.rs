//! Action execution.
//!
//! Turns an [`ActionSet`] plus bound placeholders into host effects, and
//! advances phased executions one tick at a time.

use crate::bindings::{Bindings, SECONDS_REMAINING, substitute};
use crate::colors::translate;
use crate::config::Messages;
use crate::host::{CommandSender, Location, Platform, SenderRef, TitleTimings};
use crate::scheduler::{Countdown, PhasedExecution, TickStep};
use crate::spec::{ActionSet, DelaySpec};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Known action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Console,
    PlayerChat,
    Broadcast,
    Message,
    Sound,
    Teleport,
    BigText,
    SmallText,
}

impl ActionKind {
    /// Parses a kind name case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "console" => Self::Console,
            "player" | "player-chat" => Self::PlayerChat,
            "broadcast" => Self::Broadcast,
            "message" => Self::Message,
            "sound" => Self::Sound,
            "teleport" => Self::Teleport,
            "big_text" => Self::BigText,
            "small_text" => Self::SmallText,
            _ => return None,
        })
    }

    /// Kinds whose payload is a list of lines.
    fn takes_lines(self) -> bool {
        matches!(self, Self::Console | Self::PlayerChat | Self::Broadcast | Self::Message | Self::Sound)
    }

    /// Kinds that act on the sender's own avatar.
    fn player_only(self) -> bool {
        matches!(self, Self::PlayerChat | Self::Sound)
    }
}

/// What one [`ActionExecutor::run`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries that were dispatched to a handler.
    pub executed: usize,
    /// Entries skipped for an unknown kind or an unusable payload.
    pub skipped: usize,
}

/// Runs action sets against the host.
pub struct ActionExecutor {
    platform: Arc<dyn Platform>,
    player_only: String,
}

impl ActionExecutor {
    pub fn new(platform: Arc<dyn Platform>, messages: &Messages) -> Self {
        Self { platform, player_only: messages.player_only.clone() }
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// Runs every entry of `actions` in order.
    ///
    /// Entries are independent: an unknown kind or a bad payload is logged
    /// and the rest of the set still runs.
    pub fn run(&self, sender: &dyn CommandSender, actions: &ActionSet, bindings: &Bindings) -> RunSummary {
        let mut summary = RunSummary::default();
        for (name, payload) in actions.iter() {
            let Some(kind) = ActionKind::parse(name) else {
                warn!(action = %name, "Unknown action type");
                summary.skipped += 1;
                continue;
            };

            let payload = substitute(payload, bindings);
            if self.apply(sender, kind, name, &payload) {
                summary.executed += 1;
            } else {
                summary.skipped += 1;
            }
        }
        summary
    }

    /// False when the payload could not be used.
    fn apply(&self, sender: &dyn CommandSender, kind: ActionKind, name: &str, payload: &Value) -> bool {
        if kind.takes_lines() {
            let Some(lines) = payload.lines() else {
                warn!(action = %name, found = payload.kind(), "Invalid value type for action, expected a list");
                return false;
            };
            self.run_lines(sender, kind, &lines);
            return true;
        }

        match kind {
            ActionKind::Teleport => {
                if payload.as_map().is_none() {
                    warn!(found = payload.kind(), "Invalid value type for teleport, expected a mapping");
                    return false;
                }
                self.teleport(payload);
            }
            ActionKind::BigText => {
                if payload.as_map().is_none() {
                    warn!(found = payload.kind(), "Invalid value type for big_text, expected a mapping");
                    return false;
                }
                if sender.is_interactive() {
                    let title = translate(payload.get_str("title").unwrap_or_default());
                    let subtitle = translate(payload.get_str("subtitle").unwrap_or_default());
                    self.platform.show_title(sender.name(), &title, &subtitle, TitleTimings::default());
                }
            }
            ActionKind::SmallText => {
                let Some(text) = payload.as_str() else {
                    warn!(found = payload.kind(), "Invalid value type for small_text, expected a string");
                    return false;
                };
                if sender.is_interactive() {
                    self.platform.action_bar(sender.name(), &translate(text));
                }
            }
            _ => {}
        }
        true
    }

    fn run_lines(&self, sender: &dyn CommandSender, kind: ActionKind, lines: &[&str]) {
        if kind.player_only() && !sender.is_interactive() {
            sender.send_message(&translate(&self.player_only));
            return;
        }

        for line in lines {
            let line = translate(line);
            match kind {
                ActionKind::Console => self.platform.dispatch_console(&line),
                ActionKind::PlayerChat => self.platform.chat(sender.name(), &line),
                ActionKind::Broadcast => self.platform.broadcast(&line),
                ActionKind::Message => sender.send_message(&line),
                ActionKind::Sound => {
                    if !self.platform.play_sound(sender.name(), &line) {
                        warn!(sound = %line, "Invalid sound name");
                    }
                }
                _ => {}
            }
        }
    }

    fn teleport(&self, data: &Value) {
        let Some(who) = data.get_str("who") else {
            warn!("Teleport action is missing the 'who' field");
            return;
        };
        if self.platform.online_player(who).is_none() {
            warn!(player = %who, "Teleport target not found");
            return;
        }

        if let Some(to_player) = data.get_str("toPlayer") {
            match self.platform.location(to_player) {
                Some(destination) => self.platform.teleport(who, &destination),
                None => warn!(destination = %to_player, "Teleport destination player not found"),
            }
            return;
        }

        let world = match data.get_str("world") {
            Some(world) => world.to_string(),
            None => match self.platform.location(who) {
                Some(current) => current.world,
                None => return,
            },
        };
        let (Some(x), Some(y), Some(z)) = (data.get_str("x"), data.get_str("y"), data.get_str("z")) else {
            debug!(player = %who, "Teleport action has no coordinates");
            return;
        };
        let coords = (x.trim().parse::<f64>(), y.trim().parse::<f64>(), z.trim().parse::<f64>());
        let (Ok(x), Ok(y), Ok(z)) = coords else {
            warn!(player = %who, x, y, z, "Invalid teleport coordinates");
            return;
        };
        if !self.platform.world_exists(&world) {
            warn!(world = %world, "Invalid world for teleport");
            return;
        }

        let mut location = Location::new(world, x, y, z);
        let ignores_terrain = self.platform.game_mode(who).is_some_and(|mode| mode.ignores_terrain());
        if !ignores_terrain && !self.platform.is_safe(&location) {
            location = self.platform.highest_standing(&location);
        }
        self.platform.teleport(who, &location);
    }

    /// Starts a countdown for `delay`, to be ticked by the scheduler owner.
    pub fn start_phased(
        &self,
        sender: SenderRef,
        delay: Arc<DelaySpec>,
        main: Option<Arc<ActionSet>>,
        bindings: Bindings,
    ) -> PhasedExecution {
        let countdown = Countdown::new(delay.length_secs());
        PhasedExecution { sender, delay, main, bindings, countdown }
    }

    /// Advances one second. Returns true while more ticks are needed.
    pub fn tick(&self, execution: &mut PhasedExecution) -> bool {
        match execution.countdown.advance() {
            TickStep::PerSecond(remaining) => {
                if let Some(per_second) = execution.delay.per_second_actions.as_ref() {
                    let bindings = execution.bindings.with(SECONDS_REMAINING, remaining.to_string());
                    self.run(execution.sender.as_ref(), per_second, &bindings);
                }
                true
            }
            TickStep::Finish => {
                if let Some(main) = execution.main.as_ref() {
                    self.run(execution.sender.as_ref(), main, &execution.bindings);
                }
                false
            }
            TickStep::Idle => false,
        }
    }
}
