//! Fire-and-forget cache writes and the shutdown signal for cache reads.

use async_trait::async_trait;
use carelink_core::{CarelinkResult, Interface};
use futures::future::BoxFuture;
use shaku::Component;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Owner of detached cache work.
#[async_trait]
pub trait BackgroundTasks: Interface + Send + Sync {
    /// Runs a cache write off the request path. Failures are logged.
    fn spawn_write(&self, key: String, write: BoxFuture<'static, CarelinkResult<()>>);

    /// Token cancelled when the process starts shutting down.
    fn shutdown_token(&self) -> CancellationToken;

    /// Cancels pending reads and waits up to `grace` for writes to finish.
    ///
    /// Returns `false` if writes were still running when the grace period
    /// ran out.
    async fn shutdown(&self, grace: Duration) -> bool;
}

/// Tracks spawned writes so shutdown can drain them.
#[derive(Component, Default)]
#[shaku(interface = BackgroundTasks)]
pub struct TaskSupervisor {
    #[shaku(default)]
    tracker: TaskTracker,
    #[shaku(default)]
    token: CancellationToken,
}

impl TaskSupervisor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes currently in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every write spawned so far has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

#[async_trait]
impl BackgroundTasks for TaskSupervisor {
    fn spawn_write(&self, key: String, write: BoxFuture<'static, CarelinkResult<()>>) {
        self.tracker.spawn(async move {
            match write.await {
                Ok(()) => debug!("Background cache write for '{}' done", key),
                Err(e) => warn!("Background cache write for '{}' failed: {}", key, e),
            }
        });
    }

    fn shutdown_token(&self) -> CancellationToken {
        self.token.clone()
    }

    async fn shutdown(&self, grace: Duration) -> bool {
        self.token.cancel();
        self.tracker.close();

        let pending = self.tracker.len();
        if pending > 0 {
            info!("Draining {} pending cache writes", pending);
        }

        if tokio::time::timeout(grace, self.tracker.wait()).await.is_ok() {
            true
        } else {
            warn!(
                "Shutdown grace of {:?} elapsed with {} cache writes pending",
                grace,
                self.tracker.len()
            );
            false
        }
    }
}
