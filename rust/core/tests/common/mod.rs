// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::{self, BoxFuture, FutureExt};
use futures_util::task::{FutureObj, Spawn, SpawnError};
use nalgebra::Vector3;
use spacefolio_core::viewport::HostCallback;
use spacefolio_core::{
    select_idle_scheduler, AssetKey, CallbackList, DocumentMetrics, AssetManifest, AssetRegistry, AssetSource, Clock, DelayedScheduler,
    ElementGeometry, Error, IdleConfig, ImageHandle, Platform, Result, SceneNode, Subscription, ViewportHost,
};

pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
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

pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl Spawn for TokioSpawner {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> std::result::Result<(), SpawnError> {
        self.handle.spawn(future);
        Ok(())
    }
}

/// Tokio-backed platform with the delayed idle fallback.
pub fn platform() -> Platform {
    let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());
    let spawner: Arc<dyn Spawn + Send + Sync> = Arc::new(TokioSpawner {
        handle: tokio::runtime::Handle::current(),
    });
    let idle = IdleConfig::default();
    let fallback = DelayedScheduler::new(clock.clone(), spawner.clone(), idle.fallback_delay());
    Platform::new(clock, spawner, select_idle_scheduler(None, fallback))
}

#[derive(Default)]
struct Calls {
    images: HashMap<AssetKey, usize>,
    binaries: HashMap<AssetKey, usize>,
}

/// Counting source with configurable latency and failures.
#[derive(Default)]
pub struct FakeSource {
    delay: Duration,
    hang: bool,
    failing: HashSet<AssetKey>,
    calls: Mutex<Calls>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every load stays pending forever.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(AssetKey::from(key));
        self
    }

    pub fn image_calls(&self, key: &str) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.images.get(&AssetKey::from(key)).copied().unwrap_or(0)
    }

    pub fn binary_calls(&self, key: &str) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.binaries.get(&AssetKey::from(key)).copied().unwrap_or(0)
    }

    fn respond<T: Send + 'static>(&self, key: &AssetKey, value: T) -> BoxFuture<'static, Result<T>> {
        let delay = self.delay;
        let fail = self.failing.contains(key);
        let key = key.clone();
        if self.hang {
            return future::pending().boxed();
        }
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if fail {
                Err(Error::asset(&key, "HTTP 404"))
            } else {
                Ok(value)
            }
        }
        .boxed()
    }
}

impl AssetSource for FakeSource {
    fn load_image(&self, key: &AssetKey) -> BoxFuture<'static, Result<ImageHandle>> {
        *self.calls.lock().unwrap().images.entry(key.clone()).or_default() += 1;
        self.respond(key, ImageHandle::new(key.clone(), Some((64, 64))))
    }

    fn fetch_binary(&self, key: &AssetKey) -> BoxFuture<'static, Result<Bytes>> {
        *self.calls.lock().unwrap().binaries.entry(key.clone()).or_default() += 1;
        self.respond(key, Bytes::from_static(b"glTF"))
    }
}

pub fn registry(source: Arc<FakeSource>) -> AssetRegistry {
    AssetRegistry::new(source, platform(), AssetManifest::default(), IdleConfig::default())
}

pub const LOGO: &str = "/assets/ashwinsdk.svg";
pub const MODEL: &str = "/assets/need_some_space.glb";
pub const POSTERS: [&str; 3] = [
    "/projects/rigledger/poster.webp",
    "/projects/urbandao/poster.webp",
    "/projects/xylen/poster.webp",
];

pub fn assert_elapsed(elapsed: Duration, millis: u64) {
    let expected = Duration::from_millis(millis);
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(5),
        "expected ~{expected:?}, got {elapsed:?}"
    );
}

/// Manually driven page: tests decide when frames and scroll events fire.
pub struct ManualHost {
    pub width: Cell<f64>,
    pub geometry: Cell<Option<ElementGeometry>>,
    pub doc_height: Cell<f64>,
    pub frames: Rc<CallbackList>,
    pub scroll: Rc<CallbackList>,
    pub resize: Rc<CallbackList>,
}

impl ManualHost {
    pub fn new(width: f64, hero_height: f64) -> Rc<Self> {
        Rc::new(Self {
            width: Cell::new(width),
            geometry: Cell::new(Some(ElementGeometry::new(0.0, hero_height))),
            doc_height: Cell::new(4000.0),
            frames: Rc::default(),
            scroll: Rc::default(),
            resize: Rc::default(),
        })
    }

    /// Scroll the hero `px` pixels past the viewport top.
    pub fn scroll_hero(&self, px: f64) {
        if let Some(geometry) = self.geometry.get() {
            self.geometry.set(Some(ElementGeometry::new(-px, geometry.height)));
        }
        self.scroll.fire();
    }
}

impl ViewportHost for ManualHost {
    fn request_frames(&self, callback: HostCallback) -> Subscription {
        self.frames.register(callback)
    }

    fn on_scroll(&self, callback: HostCallback) -> Subscription {
        self.scroll.register(callback)
    }

    fn on_resize(&self, callback: HostCallback) -> Subscription {
        self.resize.register(callback)
    }

    fn viewport_width(&self) -> f64 {
        self.width.get()
    }

    fn hero_geometry(&self) -> Option<ElementGeometry> {
        self.geometry.get()
    }

    fn scroll_y(&self) -> f64 {
        self.geometry.get().map_or(0.0, |g| -g.top)
    }
}

impl DocumentMetrics for ManualHost {
    fn document_height(&self) -> f64 {
        self.doc_height.get()
    }
}

/// Scene node that records every write.
pub struct SpyNode {
    pub scales: RefCell<Vec<f64>>,
    pub positions: RefCell<Vec<Vector3<f64>>>,
    pub rotations: RefCell<Vec<Vector3<f64>>>,
    pub clones: RefCell<Vec<Rc<SpyNode>>>,
}

impl SpyNode {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            scales: RefCell::new(Vec::new()),
            positions: RefCell::new(Vec::new()),
            rotations: RefCell::new(Vec::new()),
            clones: RefCell::new(Vec::new()),
        })
    }

    pub fn last_scale(&self) -> Option<f64> {
        self.scales.borrow().last().copied()
    }
}

impl SceneNode for SpyNode {
    fn set_scale(&self, scale: f64) {
        self.scales.borrow_mut().push(scale);
    }

    fn set_position(&self, position: Vector3<f64>) {
        self.positions.borrow_mut().push(position);
    }

    fn set_rotation(&self, rotation: Vector3<f64>) {
        self.rotations.borrow_mut().push(rotation);
    }

    fn set_opacity(&self, _opacity: f64) {}

    fn clone_node(&self) -> Rc<dyn SceneNode> {
        let copy = SpyNode::new();
        self.clones.borrow_mut().push(copy.clone());
        copy
    }
}
