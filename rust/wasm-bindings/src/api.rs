// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for the landing page.
//!
//! ```javascript
//! const site = new SpaceSite();
//! site.onLayoutChange(() => ScrollTrigger.refresh());
//! const outcome = await site.start();
//! if (!site.isLoading) hideLoadingScreen();
//!
//! const hero = site.mountHero('hero');
//! hero.sceneReady(group);
//! ```

use std::rc::Rc;
use std::sync::Arc;

use js_sys::{Function, Object, Promise, Reflect, Uint8Array};
use spacefolio_core::scroll::{
    black_overlay, hero_container_fade, hero_planet_drift, planet_layer_fade, planet_layer_zoom,
};
use spacefolio_core::{
    AmbientViewport, AssetKey, AssetRegistry, BootstrapOutcome, BootstrapSequencer, Property,
    ReadyReason, ScrollViewportController, SiteConfig, TriggerSet, ViewportHost,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::error::BindingError;
use crate::fetch::BrowserAssetSource;
use crate::host::BrowserHost;
use crate::platform::browser_platform;
use crate::utils::{console_warn, describe};
use crate::viewport::{AmbientViewportHandle, HeroViewport};

const DEFAULT_HERO_ID: &str = "hero";

/// Loading gate, asset registry and scroll wiring for one page.
#[wasm_bindgen]
pub struct SpaceSite {
    config: SiteConfig,
    registry: AssetRegistry,
    sequencer: Rc<BootstrapSequencer>,
    page: Rc<BrowserHost>,
    triggers: Rc<TriggerSet>,
}

#[wasm_bindgen]
impl SpaceSite {
    /// Build from an optional, partial config object (camelCase keys).
    ///
    /// The asset registry is page-wide: the first site installs it, and later
    /// sites share it, keeping its `assets` and `idle` settings. A differing
    /// `assets` or `idle` is reported on the console and otherwise ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SpaceSite, JsValue> {
        web_sys::window().ok_or(BindingError::NoWindow)?;
        let config = parse_config(config)?;
        let platform = browser_platform(&config.idle);
        let registry = AssetRegistry::new(
            Arc::new(BrowserAssetSource::default()),
            platform,
            config.assets.clone(),
            config.idle.clone(),
        )
        .install()
        .clone();
        if registry.manifest() != &config.assets || registry.idle() != &config.idle {
            console_warn("SpaceSite: asset registry already installed, keeping its assets and idle settings");
        }
        let sequencer = Rc::new(BootstrapSequencer::new(registry.clone(), config.bootstrap.clone()));
        let page = Rc::new(BrowserHost::new(DEFAULT_HERO_ID));
        let triggers = Rc::new(TriggerSet::new(page.clone()));
        sequencer.add_layout_observer(triggers.clone());

        Ok(SpaceSite {
            config,
            registry,
            sequencer,
            page,
            triggers,
        })
    }

    /// Run the loading gate. Resolves with `{ ready, reason, elapsedMs, degraded }`
    /// and never rejects for asset failures.
    pub fn start(&self) -> Promise {
        let sequencer = Rc::clone(&self.sequencer);
        Promise::new(&mut |resolve, reject| {
            let sequencer = Rc::clone(&sequencer);
            spawn_local(async move {
                match sequencer.run().await {
                    Ok(outcome) => {
                        let _ = resolve.call1(&JsValue::NULL, &outcome_to_js(&outcome));
                    }
                    Err(err) => {
                        let _ = reject.call1(&JsValue::NULL, &JsValue::from(BindingError::from(err)));
                    }
                }
            });
        })
    }

    /// Whether the loading screen should still be shown.
    #[wasm_bindgen(getter, js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    #[wasm_bindgen(js_name = isAssetLoaded)]
    pub fn is_asset_loaded(&self, key: &str) -> bool {
        self.registry.is_loaded(&AssetKey::from(key))
    }

    /// Shared image load; rejects when the image fails to decode.
    #[wasm_bindgen(js_name = requestImage)]
    pub fn request_image(&self, key: String) -> Promise {
        let request = self.registry.request_image(&AssetKey::from(key));
        wasm_bindgen_futures::future_to_promise(async move {
            let image = request.await.map_err(|err| JsValue::from(BindingError::from(err)))?;
            let result = Object::new();
            set(&result, "key", &JsValue::from_str(image.key.as_str()));
            if let Some((width, height)) = image.dimensions {
                set(&result, "width", &JsValue::from(width));
                set(&result, "height", &JsValue::from(height));
            }
            Ok(result.into())
        })
    }

    /// Shared binary fetch; resolves to `null` on failure.
    #[wasm_bindgen(js_name = requestBinary)]
    pub fn request_binary(&self, key: String) -> Promise {
        let request = self.registry.request_binary(&AssetKey::from(key));
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(match request.await {
                Some(bytes) => Uint8Array::from(bytes.as_ref()).into(),
                None => JsValue::NULL,
            })
        })
    }

    /// Called once when the loading screen goes away.
    #[wasm_bindgen(js_name = onLayoutChange)]
    pub fn on_layout_change(&self, callback: Function) {
        self.sequencer.add_layout_observer(Rc::new(move || {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                console_warn(&format!("layout change callback threw: {}", describe(&err)));
            }
        }));
    }

    /// Register a page timeline by preset name; returns its index.
    ///
    /// Presets: `heroPlanet`, `heroContainer`, `planetLayer`,
    /// `planetLayerContainer`, `blackOverlay`.
    #[wasm_bindgen(js_name = addScrollTimeline)]
    pub fn add_scroll_timeline(&self, preset: &str) -> Result<usize, JsValue> {
        let timeline = match preset {
            "heroPlanet" => hero_planet_drift(self.page.viewport_width()),
            "heroContainer" => hero_container_fade(),
            "planetLayer" => planet_layer_zoom(),
            "planetLayerContainer" => planet_layer_fade(),
            "blackOverlay" => black_overlay(),
            other => return Err(BindingError::UnknownPreset(other.to_string()).into()),
        };
        Ok(self.triggers.add(timeline))
    }

    /// Property values of timeline `index` at the current scroll position,
    /// as `{ progress, x?, y?, scale?, opacity? }`.
    #[wasm_bindgen(js_name = sampleTimeline)]
    pub fn sample_timeline(&self, index: usize) -> JsValue {
        let scroll_y = self.page.scroll_y();
        let (Some(progress), Some(values)) = (
            self.triggers.progress_at(index, scroll_y),
            self.triggers.sample(index, scroll_y),
        ) else {
            return JsValue::UNDEFINED;
        };
        let result = Object::new();
        set(&result, "progress", &JsValue::from_f64(progress));
        for (property, value) in values {
            let name = match property {
                Property::X => "x",
                Property::Y => "y",
                Property::Scale => "scale",
                Property::Opacity => "opacity",
            };
            set(&result, name, &JsValue::from_f64(value));
        }
        result.into()
    }

    #[wasm_bindgen(js_name = refreshScrollTriggers)]
    pub fn refresh_scroll_triggers(&self) {
        self.triggers.refresh();
    }

    /// Attach the scroll-linked controller to the element with `hero_id`.
    #[wasm_bindgen(js_name = mountHero)]
    pub fn mount_hero(&self, hero_id: Option<String>) -> HeroViewport {
        let host = Rc::new(BrowserHost::new(hero_id.as_deref().unwrap_or(DEFAULT_HERO_ID)));
        let mut controller = ScrollViewportController::new(host, self.config.viewport);
        controller.mount();
        HeroViewport::new(controller)
    }

    #[wasm_bindgen(js_name = mountAmbient)]
    pub fn mount_ambient(&self) -> AmbientViewportHandle {
        AmbientViewportHandle::new(AmbientViewport::new(self.page.clone(), self.config.viewport.ambient))
    }

    /// Stop the loading gate if it is still running and drop every timeline.
    pub fn dispose(&self) {
        self.sequencer.cancel();
        self.triggers.kill_all();
    }
}

impl SpaceSite {
    /// The page-wide registry this site loads through.
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }
}

fn parse_config(value: JsValue) -> Result<SiteConfig, BindingError> {
    let config = if value.is_undefined() || value.is_null() {
        SiteConfig::default()
    } else {
        serde_wasm_bindgen::from_value(value)?
    };
    config.validate()?;
    Ok(config)
}

fn set(target: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

fn outcome_to_js(outcome: &BootstrapOutcome) -> JsValue {
    let result = Object::new();
    match outcome {
        BootstrapOutcome::Ready { reason, elapsed } => {
            set(&result, "ready", &JsValue::TRUE);
            set(&result, "elapsedMs", &JsValue::from_f64(elapsed.as_secs_f64() * 1000.0));
            let (name, degraded) = match reason {
                ReadyReason::AssetsSettled(report) => ("assetsSettled", report.degraded().is_some()),
                ReadyReason::FailSafe => ("failSafe", true),
            };
            set(&result, "reason", &JsValue::from_str(name));
            set(&result, "degraded", &JsValue::from_bool(degraded));
        }
        BootstrapOutcome::Cancelled => {
            set(&result, "ready", &JsValue::FALSE);
            set(&result, "reason", &JsValue::from_str("cancelled"));
        }
    }
    result.into()
}
