//! Deterministic timer queue for deferred work.
//!
//! Deferred work is plain data: a [`Task`] is either a cooldown cleanup or a
//! phased execution waiting for its next tick. The owner pops due tasks with
//! [`Scheduler::pop_due`] from its serial context and applies them; nothing
//! runs on a background thread.

use crate::bindings::Bindings;
use crate::cooldown::CooldownCleanup;
use crate::host::SenderRef;
use crate::spec::{ActionSet, DelaySpec};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), elapsed_ms: AtomicU64::new(0) }
    }

    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(millis, Ordering::SeqCst);
    }

    /// Time advanced since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

/// State of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Pending { remaining_secs: u64 },
    Done,
}

/// What one countdown tick asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStep {
    /// Run the per-second actions with this many seconds remaining.
    PerSecond(u64),
    /// Run the main actions; the countdown is now done.
    Finish,
    /// Already done, nothing to run.
    Idle,
}

impl Countdown {
    pub fn new(length_secs: u64) -> Self {
        Self::Pending { remaining_secs: length_secs }
    }

    /// Advances by one second.
    pub fn advance(&mut self) -> TickStep {
        match *self {
            Self::Pending { remaining_secs: 0 } => {
                *self = Self::Done;
                TickStep::Finish
            }
            Self::Pending { remaining_secs } => {
                *self = Self::Pending { remaining_secs: remaining_secs - 1 };
                TickStep::PerSecond(remaining_secs)
            }
            Self::Done => TickStep::Idle,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A started delay: who invoked it, what to run, and how far along it is.
///
/// Holds its own handles to the action sets, so it finishes even if the
/// command it came from is reloaded away.
pub struct PhasedExecution {
    pub sender: SenderRef,
    pub delay: Arc<DelaySpec>,
    pub main: Option<Arc<ActionSet>>,
    pub bindings: Bindings,
    pub countdown: Countdown,
}

impl fmt::Debug for PhasedExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhasedExecution")
            .field("sender", &self.sender.name())
            .field("countdown", &self.countdown)
            .finish_non_exhaustive()
    }
}

/// Deferred work.
#[derive(Debug)]
pub enum Task {
    CooldownCleanup(CooldownCleanup),
    Phased(PhasedExecution),
}

/// Timer queue ordered by due instant, then by insertion.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BTreeMap<(Instant, u64), Task>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, due: Instant, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), task);
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Task> {
        let entry = self.queue.first_entry()?;
        if entry.key().0 > now {
            return None;
        }
        Some(entry.remove())
    }

    /// Instant of the earliest pending task.
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Number of phased executions still counting down.
    pub fn phased_len(&self) -> usize {
        self.queue.values().filter(|task| matches!(task, Task::Phased(_))).count()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
