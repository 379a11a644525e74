// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser implementations of the core platform traits.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::task::{FutureObj, Spawn, SpawnError};
use gloo_timers::future::TimeoutFuture;
use spacefolio_core::{
    select_idle_scheduler, Clock, DelayedScheduler, IdleConfig, IdleScheduler, IdleTask, Platform,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::bridge::bridge;
use crate::utils::{console_warn, describe};

/// `performance.now()` plus `setTimeout`-backed sleeps.
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> Duration {
        let millis = web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now);
        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        bridge(TimeoutFuture::new(millis)).map(drop).boxed()
    }
}

/// Runs detached work on the page's microtask queue.
pub struct LocalSpawner;

impl Spawn for LocalSpawner {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
        spawn_local(future);
        Ok(())
    }
}

/// `requestIdleCallback` with a timeout.
pub struct BrowserIdleScheduler;

impl BrowserIdleScheduler {
    /// The native backend, when the browser has one.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        js_sys::Reflect::has(&window, &JsValue::from_str("requestIdleCallback"))
            .unwrap_or(false)
            .then_some(BrowserIdleScheduler)
    }
}

impl IdleScheduler for BrowserIdleScheduler {
    fn schedule_when_idle(&self, task: IdleTask, timeout: Duration) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let request = js_sys::Reflect::get(&window, &JsValue::from_str("requestIdleCallback"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
        let Some(request) = request else {
            console_warn("requestIdleCallback unavailable, running idle task now");
            task();
            return;
        };

        let options = js_sys::Object::new();
        let _ = js_sys::Reflect::set(
            &options,
            &JsValue::from_str("timeout"),
            &JsValue::from_f64(timeout.as_millis() as f64),
        );
        let callback = Closure::once_into_js(move || task());
        if let Err(err) = request.call2(&window, &callback, &options) {
            console_warn(&format!("requestIdleCallback failed: {}", describe(&err)));
        }
    }
}

/// Clock, spawner and idle backend for the current page.
pub fn browser_platform(idle: &IdleConfig) -> Platform {
    let clock: Arc<dyn Clock> = Arc::new(BrowserClock);
    let spawner: Arc<dyn Spawn + Send + Sync> = Arc::new(LocalSpawner);
    let native = BrowserIdleScheduler::detect().map(|native| Arc::new(native) as Arc<dyn IdleScheduler>);
    let fallback = DelayedScheduler::new(clock.clone(), spawner.clone(), idle.fallback_delay());
    Platform::new(clock, spawner, select_idle_scheduler(native, fallback))
}
