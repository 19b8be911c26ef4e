use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

/// Configuration for periodic refresh behavior
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicRefreshConfig {
    pub interval: Duration,
    /// Delay before the first tick, for staggering several pollers
    pub initial_delay: Option<Duration>,
}

impl Default for PeriodicRefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            initial_delay: None,
        }
    }
}

/// A background loop calling `tick` on a fixed interval until stopped.
///
/// The first tick runs right after the initial delay. Ticks never overlap:
/// a slow tick delays the next one. Dropping the task cancels it; `stop`
/// additionally waits until the loop has exited.
pub struct PeriodicTask {
    name: &'static str,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
    _cancel_on_drop: DropGuard,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(name: &'static str, config: PeriodicRefreshConfig, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let inner_token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            if let Some(delay) = config.initial_delay {
                tokio::select! {
                    _ = inner_token.cancelled() => return,
                    _ = time::sleep(delay) => {}
                }
            }

            let mut interval = time::interval(config.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = inner_token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                debug!("{} tick", name);
                tokio::select! {
                    biased;
                    _ = inner_token.cancelled() => break,
                    _ = tick() => {}
                }
            }
            debug!("{} stopped", name);
        });

        Self {
            name,
            _cancel_on_drop: cancel_token.clone().drop_guard(),
            cancel_token,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the loop and wait for it to exit
    pub async fn stop(mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!("{} ended abnormally: {}", self.name, e);
            }
        }
    }
}
