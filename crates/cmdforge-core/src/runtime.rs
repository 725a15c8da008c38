//! Tokio driver for the dispatcher's scheduler.

use crate::dispatcher::Dispatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Dispatcher shared between the input loop and the driver.
pub type SharedDispatcher = Arc<Mutex<Dispatcher>>;

/// Pumps [`Dispatcher::run_pending`] every `period` until `shutdown` flips
/// to true or its sender is dropped.
pub async fn drive(dispatcher: SharedDispatcher, period: Duration, mut shutdown: watch::Receiver<bool>) {
    info!(period_ms = period.as_millis(), "Scheduler driver started");

    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("Scheduler driver shutdown signal received");
                    break;
                }
            }
            _ = interval.tick() => {
                let applied = dispatcher.lock().await.run_pending();
                if applied > 0 {
                    debug!(applied, "Applied scheduled tasks");
                }
            }
        }
    }
}

/// A running [`drive`] task.
#[derive(Debug)]
pub struct DriverHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// Spawns [`drive`] on the current runtime.
    pub fn spawn(dispatcher: SharedDispatcher, period: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(drive(dispatcher, period, shutdown_rx));
        Self { shutdown_tx, task }
    }

    /// Signals shutdown and waits for the driver to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Scheduler driver task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Platform, SenderRef};
    use crate::memory::{Effect, MemoryPlatform, MemoryPlayer, MemorySender};
    use crate::scheduler::{Clock, ManualClock};
    use crate::spec::CommandSpec;

    #[tokio::test(start_paused = true)]
    async fn test_driver_runs_countdown_and_stops() {
        let platform = Arc::new(MemoryPlatform::new());
        let id = platform.add_player(MemoryPlayer::online("Alice", "world"));
        let clock = Arc::new(ManualClock::new());

        let mut dispatcher = Dispatcher::new(Arc::clone(&platform) as Arc<dyn Platform>)
            .with_clock(Arc::clone(&clock) as Arc<dyn Clock>);
        dispatcher.load(vec![
            CommandSpec::from_yaml_str("later", "delay: {length: 1 second}\nactions: {message: [done]}\n")
                .unwrap(),
        ]);
        let shared: SharedDispatcher = Arc::new(Mutex::new(dispatcher));
        let driver = DriverHandle::spawn(Arc::clone(&shared), Duration::from_millis(10));

        let alice: SenderRef = Arc::new(MemorySender::player(&platform, "Alice", id));
        let none: [&str; 0] = [];
        assert!(shared.lock().await.dispatch(&alice, "later", &none).is_ok());

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(shared.lock().await.scheduler().phased_len(), 1);
        assert!(platform.effects().is_empty());

        clock.advance(Duration::from_secs(1));
        time::sleep(Duration::from_millis(50)).await;
        assert!(shared.lock().await.scheduler().is_empty());
        assert_eq!(platform.effects(), vec![Effect::Message { to: "Alice".into(), text: "done".into() }]);

        driver.stop().await;
    }
}
