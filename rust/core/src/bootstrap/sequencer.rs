// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::{self, AbortHandle, AbortRegistration, Abortable, Either, FutureExt};

use super::{LayoutObserver, LoadingPhase};
use crate::asset::{AssetRegistry, CriticalReport};
use crate::config::BootstrapConfig;
use crate::error::{Error, Result};

/// Why the loading screen went away.
#[derive(Debug, Clone)]
pub enum ReadyReason {
    /// Minimum display elapsed and the critical set settled.
    AssetsSettled(CriticalReport),
    /// The fail-safe fired first.
    FailSafe,
}

#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    Ready { reason: ReadyReason, elapsed: Duration },
    /// Torn down before reaching Ready; no state was touched.
    Cancelled,
}

impl BootstrapOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, BootstrapOutcome::Ready { .. })
    }
}

/// Thread-safe handle that tears a running sequence down.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl CancelHandle {
    /// Stop the gate. Timers are dropped and a late critical settle is ignored.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            tracing::debug!("Bootstrap cancelled");
        }
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Drives `Loading -> Ready` from a minimum-display timer, the critical
/// asset load and a fail-safe timer.
///
/// Ready fires once the timer elapsed AND the critical set settled, OR the
/// fail-safe fired, whichever comes first. On Ready the secondary preload is
/// scheduled and every layout observer is notified once.
pub struct BootstrapSequencer {
    registry: AssetRegistry,
    config: BootstrapConfig,
    ready: Arc<AtomicBool>,
    cancel: CancelHandle,
    registration: Mutex<Option<AbortRegistration>>,
    observers: RefCell<Vec<Rc<dyn LayoutObserver>>>,
}

impl BootstrapSequencer {
    pub fn new(registry: AssetRegistry, config: BootstrapConfig) -> Self {
        let (abort, registration) = AbortHandle::new_pair();
        Self {
            registry,
            config,
            ready: Arc::new(AtomicBool::new(false)),
            cancel: CancelHandle {
                cancelled: Arc::new(AtomicBool::new(false)),
                abort,
            },
            registration: Mutex::new(Some(registration)),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn phase(&self) -> LoadingPhase {
        if self.ready.load(Ordering::Acquire) {
            LoadingPhase::Ready
        } else {
            LoadingPhase::Loading
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == LoadingPhase::Loading
    }

    /// Observers are notified once, at the Ready transition.
    pub fn add_layout_observer(&self, observer: Rc<dyn LayoutObserver>) {
        self.observers.borrow_mut().push(observer);
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run the gate to completion. Only the first call runs; later calls
    /// return `Error::AlreadyStarted`.
    pub async fn run(&self) -> Result<BootstrapOutcome> {
        let registration = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(Error::AlreadyStarted)?;

        let platform = self.registry.platform().clone();
        let started_at = platform.clock.now();
        tracing::debug!(
            min_display = ?self.config.min_display(),
            fail_safe = ?self.config.fail_safe(),
            "Bootstrap started"
        );

        // Dropping this on cancel or fail-safe leaves the loads running; the
        // registry drives every started load to completion.
        let critical = self.registry.load_critical();
        let assets_settled = future::join(platform.clock.sleep(self.config.min_display()), critical)
            .map(|((), report)| report)
            .boxed();
        let fail_safe = platform.clock.sleep(self.config.fail_safe());
        let gate = future::select(assets_settled, fail_safe);

        let reason = match Abortable::new(gate, registration).await {
            Err(_aborted) => return Ok(BootstrapOutcome::Cancelled),
            Ok(Either::Left((report, _))) => ReadyReason::AssetsSettled(report),
            Ok(Either::Right(((), _))) => ReadyReason::FailSafe,
        };
        if self.cancel.is_cancelled() {
            return Ok(BootstrapOutcome::Cancelled);
        }

        match &reason {
            ReadyReason::AssetsSettled(report) => {
                if let Some(err) = report.degraded() {
                    tracing::warn!(error = %err, "Continuing with degraded critical assets");
                }
            }
            ReadyReason::FailSafe => {
                let err = Error::SequencerTimeout(self.config.fail_safe());
                tracing::info!(error = %err, "Releasing loading screen before critical assets settled");
            }
        }

        self.ready.store(true, Ordering::Release);
        let elapsed = platform.clock.now().saturating_sub(started_at);
        tracing::debug!(?elapsed, "Loading phase -> Ready");

        self.registry.load_secondary();
        let observers = std::mem::take(&mut *self.observers.borrow_mut());
        for observer in observers {
            observer.layout_changed();
        }

        Ok(BootstrapOutcome::Ready { reason, elapsed })
    }
}

impl std::fmt::Debug for BootstrapSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapSequencer")
            .field("phase", &self.phase())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
