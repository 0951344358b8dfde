use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::dispatch::dispatcher::RequestDispatcher;
use crate::error::NfieldError;
use crate::transport::Transport;
use crate::utils::constants::TRIGGER_PERSISTENT;

struct RefreshTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Background task that signs in again on a fixed cadence, so the token is
/// renewed even when the client is idle.
///
/// The task stops on [`PersistentRefresher::stop`] and when the refresher
/// itself is dropped.
pub struct PersistentRefresher<T> {
    dispatcher: RequestDispatcher<T>,
    task: Mutex<Option<RefreshTask>>,
}

impl<T: Transport> PersistentRefresher<T> {
    pub fn new(dispatcher: RequestDispatcher<T>) -> Self {
        Self {
            dispatcher,
            task: Mutex::new(None),
        }
    }

    /// Start refreshing every `interval`. Failures go to `on_error`.
    ///
    /// Returns `false` when a task is already running, when `interval` is zero,
    /// or when called outside a Tokio runtime.
    pub fn start<F>(&self, interval: Duration, on_error: F) -> bool
    where
        F: Fn(NfieldError) + Send + Sync + 'static,
    {
        if interval.is_zero() {
            warn!("persistent refresh interval must be positive");
            return false;
        }

        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|running| !running.handle.is_finished()) {
            debug!("persistent refresh already running");
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("persistent refresh needs a tokio runtime: {e}");
                return false;
            }
        };

        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();
        let dispatcher = self.dispatcher.clone();
        let handle = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // explicit stop, or the sender went away with its refresher
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        if let Err(e) = dispatcher.refresh_now(TRIGGER_PERSISTENT).await {
                            on_error(e);
                        }
                    }
                }
            }
            debug!("persistent refresh loop finished");
        });

        *task = Some(RefreshTask { shutdown, handle });
        info!(interval_ms = interval.as_millis() as u64, "persistent refresh started");
        true
    }

    /// Stop the background task. Returns `false` when nothing was running.
    pub fn stop(&self) -> bool {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match task {
            Some(RefreshTask { shutdown, handle }) if !handle.is_finished() => {
                // an in-progress refresh completes; the loop exits right after
                let _ = shutdown.send(());
                info!("persistent refresh stopped");
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }
}

impl<T> std::fmt::Debug for PersistentRefresher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let running = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("PersistentRefresher")
            .field("running", &running)
            .finish()
    }
}
