//! Active Thread Poller
//!
//! Periodically re-syncs the thread that is open in a session. Background
//! threads are not polled; they are refreshed by a full sync.
//!
//! The poll loop runs as a tokio task that is started with
//! [`Poller::start_task`] and cancelled with [`Poller::stop_task`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::config::ClientConfig;
use crate::gateway::RemoteGateway;
use crate::sync::{PollOutcome, SessionContext, SyncEngine};

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

struct PollTask {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// Owner of the poll task.
pub struct Poller {
    interval: Duration,
    task: Option<PollTask>,
}

impl Poller {
    /// Creates a stopped poller. Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        Poller {
            interval: interval.max(MIN_POLL_INTERVAL),
            task: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.poll_interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true while the poll task is alive.
    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }

    /// Starts polling the active thread of `session`.
    ///
    /// A task that is already running is cancelled and replaced. The first
    /// poll happens one interval after the start.
    pub fn start_task<G>(&mut self, engine: Arc<SyncEngine<G>>, session: Arc<SessionContext>)
    where
        G: RemoteGateway + 'static,
    {
        if let Some(previous) = self.task.take() {
            let _ = previous.shutdown.send(true);
            previous.handle.abort();
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let period = self.interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        poll_active(&engine, &session).await;
                    }
                }
            }
            debug!("poller stopped");
        });

        debug!(interval_ms = period.as_millis() as u64, "poller started");
        self.task = Some(PollTask { handle, shutdown });
    }

    /// Stops the poll task and waits for it to exit.
    ///
    /// Returns false if no task was running.
    pub async fn stop_task(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                let _ = task.shutdown.send(true);
                let _ = task.handle.await;
                true
            }
            None => false,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
        }
    }
}

/// Polls the active thread once. Failures are retried on the next tick.
pub async fn poll_active<G: RemoteGateway>(
    engine: &SyncEngine<G>,
    session: &SessionContext,
) -> Option<PollOutcome> {
    let active = session.active_thread()?;
    match engine.sync_messages(session, &active.thread_id).await {
        Ok(outcome) => {
            debug!(thread_id = %active.thread_id, ?outcome, "poll complete");
            Some(outcome)
        }
        Err(err) => {
            debug!(thread_id = %active.thread_id, error = %err, "poll failed");
            None
        }
    }
}
