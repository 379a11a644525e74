// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform capabilities the core is written against.
//!
//! Everything here is `Send + Sync` so the asset registry and the bootstrap
//! gate behave the same on a single-threaded browser event loop and on a
//! multi-threaded native executor.

use std::sync::Arc;
use std::time::Duration;

use futures_core::future::BoxFuture;
use futures_util::task::{Spawn, SpawnExt};

/// Monotonic time plus cancellable sleeps.
pub trait Clock: Send + Sync {
    /// Time since an arbitrary, fixed origin.
    fn now(&self) -> Duration;

    /// Resolves after `duration`. Dropping the future cancels the timer.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Work handed to an idle scheduler.
pub type IdleTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs a task when the host is idle, or at the latest after `timeout`.
pub trait IdleScheduler: Send + Sync {
    fn schedule_when_idle(&self, task: IdleTask, timeout: Duration);
}

/// Executor handle used for detached background work.
pub type Spawner = Arc<dyn Spawn + Send + Sync>;

/// Idle backend for hosts without a native idle callback: waits a fixed
/// delay and then runs the task, ignoring the idle timeout.
pub struct DelayedScheduler {
    clock: Arc<dyn Clock>,
    spawner: Spawner,
    delay: Duration,
}

impl DelayedScheduler {
    pub fn new(clock: Arc<dyn Clock>, spawner: Spawner, delay: Duration) -> Self {
        Self {
            clock,
            spawner,
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl IdleScheduler for DelayedScheduler {
    fn schedule_when_idle(&self, task: IdleTask, _timeout: Duration) {
        let sleep = self.clock.sleep(self.delay);
        let spawned = self.spawner.spawn(async move {
            sleep.await;
            task();
        });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, delay = ?self.delay, "Failed to schedule delayed task");
        }
    }
}

/// Pick the native idle backend when the host has one, otherwise the
/// delayed fallback.
pub fn select_idle_scheduler(
    native: Option<Arc<dyn IdleScheduler>>,
    fallback: DelayedScheduler,
) -> Arc<dyn IdleScheduler> {
    match native {
        Some(native) => native,
        None => {
            tracing::debug!(delay = ?fallback.delay(), "No idle callback available, using delayed fallback");
            Arc::new(fallback)
        }
    }
}

/// Capability bundle shared by the registry and the bootstrap sequencer.
#[derive(Clone)]
pub struct Platform {
    pub clock: Arc<dyn Clock>,
    pub spawner: Spawner,
    pub idle: Arc<dyn IdleScheduler>,
}

impl Platform {
    pub fn new(clock: Arc<dyn Clock>, spawner: Spawner, idle: Arc<dyn IdleScheduler>) -> Self {
        Self {
            clock,
            spawner,
            idle,
        }
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
