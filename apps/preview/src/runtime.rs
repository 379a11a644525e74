// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tokio-backed platform capabilities.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::task::{FutureObj, Spawn, SpawnError};
use spacefolio_core::{select_idle_scheduler, Clock, DelayedScheduler, IdleConfig, Platform};
use tokio::runtime::Handle;
use tokio::time::Instant;

pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed()
    }
}

/// Spawns onto a runtime handle, so it works from any thread.
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Spawn for TokioSpawner {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
        self.handle.spawn(future);
        Ok(())
    }
}

/// Native hosts have no idle callback, so the delayed fallback is always used.
pub fn tokio_platform(handle: Handle, idle: &IdleConfig) -> Platform {
    let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());
    let spawner: Arc<dyn Spawn + Send + Sync> = Arc::new(TokioSpawner::new(handle));
    let fallback = DelayedScheduler::new(clock.clone(), spawner.clone(), idle.fallback_delay());
    Platform::new(clock, spawner, select_idle_scheduler(None, fallback))
}
