// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use bytes::Bytes;
use futures_util::future::{self, BoxFuture, FutureExt, Shared};
use futures_util::task::SpawnExt;
use rustc_hash::FxHashMap;

use super::{AssetKey, AssetKind, AssetSource, ImageHandle};
use crate::config::{AssetManifest, IdleConfig};
use crate::error::{Error, Result};
use crate::platform::Platform;

type SharedLoad<T> = Shared<BoxFuture<'static, Result<T>>>;

static GLOBAL: OnceLock<AssetRegistry> = OnceLock::new();

/// Point-in-time state of a tracked key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    /// Last attempt failed; the next request starts a fresh load.
    Failed,
}

enum LoadRecord<T> {
    Pending(SharedLoad<T>),
    Loaded(T),
    Failed(Error),
}

impl<T> LoadRecord<T> {
    fn state(&self) -> LoadState {
        match self {
            LoadRecord::Pending(_) => LoadState::Pending,
            LoadRecord::Loaded(_) => LoadState::Loaded,
            LoadRecord::Failed(_) => LoadState::Failed,
        }
    }

    fn error(&self) -> Option<Error> {
        match self {
            LoadRecord::Failed(err) => Some(err.clone()),
            LoadRecord::Pending(_) | LoadRecord::Loaded(_) => None,
        }
    }
}

#[derive(Default)]
struct RegistryState {
    images: FxHashMap<AssetKey, LoadRecord<ImageHandle>>,
    binaries: FxHashMap<AssetKey, LoadRecord<Bytes>>,
}

/// Payload types the registry can track, each with its own record table.
trait Tracked: Clone + Send + Sync + 'static {
    const KIND: AssetKind;

    fn records(state: &mut RegistryState) -> &mut FxHashMap<AssetKey, LoadRecord<Self>>;
}

impl Tracked for ImageHandle {
    const KIND: AssetKind = AssetKind::Image;

    fn records(state: &mut RegistryState) -> &mut FxHashMap<AssetKey, LoadRecord<Self>> {
        &mut state.images
    }
}

impl Tracked for Bytes {
    const KIND: AssetKind = AssetKind::Binary;

    fn records(state: &mut RegistryState) -> &mut FxHashMap<AssetKey, LoadRecord<Self>> {
        &mut state.binaries
    }
}

struct Inner {
    source: Arc<dyn AssetSource>,
    platform: Platform,
    manifest: AssetManifest,
    idle: IdleConfig,
    state: Mutex<RegistryState>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete<T: Tracked>(&self, key: &AssetKey, result: &Result<T>) {
        let mut state = self.lock();
        let Some(record) = T::records(&mut state).get_mut(key) else {
            return;
        };
        *record = match result {
            Ok(value) => {
                tracing::debug!(key = %key, kind = %T::KIND, "Asset loaded");
                LoadRecord::Loaded(value.clone())
            }
            Err(err) => {
                tracing::warn!(key = %key, kind = %T::KIND, error = %err, "Asset load failed");
                LoadRecord::Failed(err.clone())
            }
        };
    }
}

/// Outcome of one request inside a bulk load. Never an error by itself.
#[derive(Debug, Clone)]
pub enum Settled {
    Image(Result<ImageHandle>),
    /// `None` is the graceful-degradation sentinel for a failed fetch.
    Binary(Option<Bytes>),
}

impl Settled {
    pub fn is_ok(&self) -> bool {
        match self {
            Settled::Image(result) => result.is_ok(),
            Settled::Binary(bytes) => bytes.is_some(),
        }
    }
}

/// Settled outcomes of the critical set, in manifest order.
#[derive(Debug, Clone)]
pub struct CriticalReport {
    pub entries: Vec<(AssetKey, Settled)>,
}

impl CriticalReport {
    pub fn failed(&self) -> impl Iterator<Item = &AssetKey> {
        self.entries
            .iter()
            .filter(|(_, settled)| !settled.is_ok())
            .map(|(key, _)| key)
    }

    /// `CriticalLoadDegraded` when any critical asset is missing.
    pub fn degraded(&self) -> Option<Error> {
        let failed = self.failed().count();
        (failed > 0).then(|| Error::CriticalLoadDegraded {
            failed,
            total: self.entries.len(),
        })
    }

    /// The model payload, if it arrived.
    pub fn model(&self) -> Option<&Bytes> {
        self.entries.iter().find_map(|(_, settled)| match settled {
            Settled::Binary(bytes) => bytes.as_ref(),
            Settled::Image(_) => None,
        })
    }
}

/// Process-wide load-once cache of images and binary resources.
///
/// Cheap to clone; clones share the same tables. Records are never evicted:
/// a loaded key stays loaded for the lifetime of the process, while a failed
/// key becomes eligible for a fresh attempt.
#[derive(Clone)]
pub struct AssetRegistry {
    inner: Arc<Inner>,
}

impl AssetRegistry {
    pub fn new(
        source: Arc<dyn AssetSource>,
        platform: Platform,
        manifest: AssetManifest,
        idle: IdleConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                platform,
                manifest,
                idle,
                state: Mutex::new(RegistryState::default()),
            }),
        }
    }

    /// Make this registry the process-wide instance.
    ///
    /// Only the first installation wins; later calls get the existing
    /// registry back and the argument is dropped.
    pub fn install(self) -> &'static AssetRegistry {
        let mut installed = false;
        let global = GLOBAL.get_or_init(|| {
            installed = true;
            self
        });
        if !installed {
            tracing::debug!("Asset registry already installed, keeping the existing one");
        }
        global
    }

    /// The process-wide instance, once installed.
    pub fn global() -> Option<&'static AssetRegistry> {
        GLOBAL.get()
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.inner.manifest
    }

    pub fn idle(&self) -> &IdleConfig {
        &self.inner.idle
    }

    pub fn platform(&self) -> &Platform {
        &self.inner.platform
    }

    /// Request an image. Concurrent requests share one decode; failures
    /// reject this future with `Error::AssetLoad`.
    pub fn request_image(&self, key: &AssetKey) -> BoxFuture<'static, Result<ImageHandle>> {
        self.request::<ImageHandle>(key, |source, key| source.load_image(key))
    }

    /// Request a binary resource. Never rejects: a failed fetch resolves to
    /// `None` so callers can degrade gracefully.
    pub fn request_binary(&self, key: &AssetKey) -> BoxFuture<'static, Option<Bytes>> {
        self.request::<Bytes>(key, |source, key| source.fetch_binary(key))
            .map(|result| result.ok())
            .boxed()
    }

    /// Preload several images concurrently and wait until every one settled.
    pub fn load_images(&self, keys: &[AssetKey]) -> BoxFuture<'static, Vec<(AssetKey, Settled)>> {
        let requests: Vec<_> = keys
            .iter()
            .map(|key| {
                let key = key.clone();
                self.request_image(&key)
                    .map(move |result| (key, Settled::Image(result)))
            })
            .collect();
        future::join_all(requests).boxed()
    }

    /// Load the logo and the model concurrently; resolves once both settled.
    ///
    /// Never rejects. Individual failures are reported through tracing and
    /// in the returned report.
    pub fn load_critical(&self) -> BoxFuture<'static, CriticalReport> {
        let [(logo_key, _), (model_key, _)] = self.inner.manifest.critical();
        let logo = self.request_image(&logo_key);
        let model = self.request_binary(&model_key);

        async move {
            let (logo, model) = future::join(logo, model).await;
            let report = CriticalReport {
                entries: vec![
                    (logo_key, Settled::Image(logo)),
                    (model_key, Settled::Binary(model)),
                ],
            };
            for key in report.failed() {
                tracing::warn!(key = %key, "Critical asset failed to preload");
            }
            report
        }
        .boxed()
    }

    /// Fire-and-forget preload of the secondary set during idle time.
    ///
    /// Failures are logged and dropped; nothing retries them.
    pub fn load_secondary(&self) {
        let registry = self.clone();
        let timeout = self.inner.idle.timeout();
        self.inner.platform.idle.schedule_when_idle(
            Box::new(move || {
                let keys = registry.inner.manifest.secondary().to_vec();
                tracing::debug!(count = keys.len(), "Preloading secondary assets");
                let loads = registry.load_images(&keys).map(|results| {
                    let failed = results.iter().filter(|(_, settled)| !settled.is_ok()).count();
                    if failed > 0 {
                        tracing::debug!(failed, "Secondary preload finished with failures");
                    }
                });
                if let Err(err) = registry.inner.platform.spawner.spawn(loads) {
                    tracing::warn!(error = %err, "Failed to start secondary preload");
                }
            }),
            timeout,
        );
    }

    /// Whether `key` has finished loading, as either kind.
    pub fn is_loaded(&self, key: &AssetKey) -> bool {
        self.load_state(key, AssetKind::Image) == Some(LoadState::Loaded)
            || self.load_state(key, AssetKind::Binary) == Some(LoadState::Loaded)
    }

    /// Error of the last attempt for `key`, while the key is in the Failed state.
    pub fn last_error(&self, key: &AssetKey, kind: AssetKind) -> Option<Error> {
        let state = self.inner.lock();
        match kind {
            AssetKind::Image => state.images.get(key).and_then(LoadRecord::error),
            AssetKind::Binary => state.binaries.get(key).and_then(LoadRecord::error),
        }
    }

    /// State of `key` for the given kind, `None` if it was never requested.
    pub fn load_state(&self, key: &AssetKey, kind: AssetKind) -> Option<LoadState> {
        let state = self.inner.lock();
        match kind {
            AssetKind::Image => state.images.get(key).map(LoadRecord::state),
            AssetKind::Binary => state.binaries.get(key).map(LoadRecord::state),
        }
    }

    /// Dedup core. The lookup and the Pending insert happen under one lock,
    /// so two threads can never both start a load for the same key.
    ///
    /// `start` runs with the lock held and must only build the future. Every
    /// started load is also driven on the spawner, so it settles into
    /// Loaded or Failed even when all callers drop their futures.
    fn request<T: Tracked>(
        &self,
        key: &AssetKey,
        start: impl FnOnce(&dyn AssetSource, &AssetKey) -> BoxFuture<'static, Result<T>>,
    ) -> BoxFuture<'static, Result<T>> {
        let mut state = self.inner.lock();
        let records = T::records(&mut state);

        match records.get(key) {
            Some(LoadRecord::Loaded(value)) => return future::ready(Ok(value.clone())).boxed(),
            Some(LoadRecord::Pending(shared)) => return shared.clone().boxed(),
            Some(LoadRecord::Failed(_)) | None => {}
        }

        tracing::debug!(key = %key, kind = %T::KIND, "Starting asset load");
        let load = start(self.inner.source.as_ref(), key);
        let registry: Weak<Inner> = Arc::downgrade(&self.inner);
        let owned_key = key.clone();
        let shared = async move {
            let result = load.await;
            if let Some(inner) = registry.upgrade() {
                inner.complete(&owned_key, &result);
            }
            result
        }
        .boxed()
        .shared();

        records.insert(key.clone(), LoadRecord::Pending(shared.clone()));
        drop(state);

        if let Err(err) = self.inner.platform.spawner.spawn(shared.clone().map(drop)) {
            tracing::warn!(key = %key, error = %err, "Failed to drive asset load, callers must poll it");
        }
        shared.boxed()
    }
}

impl std::fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("AssetRegistry")
            .field("images", &state.images.len())
            .field("binaries", &state.binaries.len())
            .finish()
    }
}
