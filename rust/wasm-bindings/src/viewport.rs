// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript handles for the hero and ambient viewports.

use spacefolio_core::viewport::{AMBIENT_FALLBACK_COLOR, HERO_FALLBACK_COLOR};
use spacefolio_core::{AmbientViewport, ScrollViewportController, ViewportPhase};
use wasm_bindgen::prelude::*;

use crate::error::BindingError;
use crate::scene::{JsSceneNode, JsSceneObject};

/// Scroll-linked hero model. Call `dispose()` on unmount.
#[wasm_bindgen]
pub struct HeroViewport {
    controller: ScrollViewportController,
}

impl HeroViewport {
    pub(crate) fn new(controller: ScrollViewportController) -> Self {
        Self { controller }
    }
}

#[wasm_bindgen]
impl HeroViewport {
    /// Hand over the loaded scene and start the frame loop.
    #[wasm_bindgen(js_name = sceneReady)]
    pub fn scene_ready(&mut self, object: JsSceneObject) -> Result<(), JsValue> {
        self.controller
            .scene_ready(JsSceneNode::new(object))
            .map_err(|err| BindingError::from(err).into())
    }

    /// The scene failed to load; keep the fallback plane.
    #[wasm_bindgen(js_name = sceneFailed)]
    pub fn scene_failed(&mut self, reason: String) {
        self.controller.scene_failed(&reason);
    }

    /// Re-attach after a `dispose()`.
    pub fn mount(&mut self) {
        self.controller.mount();
    }

    pub fn dispose(&mut self) {
        self.controller.dispose();
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        match self.controller.phase() {
            ViewportPhase::Uninitialized => "uninitialized",
            ViewportPhase::Configuring => "configuring",
            ViewportPhase::Active => "active",
            ViewportPhase::Disposed => "disposed",
        }
        .to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.controller.progress()
    }

    #[wasm_bindgen(getter, js_name = showsFallback)]
    pub fn shows_fallback(&self) -> bool {
        self.controller.shows_fallback()
    }

    #[wasm_bindgen(getter, js_name = fallbackColor)]
    pub fn fallback_color(&self) -> String {
        HERO_FALLBACK_COLOR.to_string()
    }
}

/// Non-interactive background copy of the scene.
#[wasm_bindgen(js_name = AmbientViewport)]
pub struct AmbientViewportHandle {
    viewport: AmbientViewport,
}

impl AmbientViewportHandle {
    pub(crate) fn new(viewport: AmbientViewport) -> Self {
        Self { viewport }
    }
}

#[wasm_bindgen(js_class = AmbientViewport)]
impl AmbientViewportHandle {
    /// Clones `object`; the original is left untouched.
    #[wasm_bindgen(js_name = sceneReady)]
    pub fn scene_ready(&mut self, object: JsSceneObject) {
        let source = JsSceneNode::new(object);
        self.viewport.scene_ready(source.as_ref());
    }

    pub fn dispose(&mut self) {
        self.viewport.dispose();
    }

    #[wasm_bindgen(getter, js_name = showsFallback)]
    pub fn shows_fallback(&self) -> bool {
        self.viewport.shows_fallback()
    }

    #[wasm_bindgen(getter, js_name = fallbackColor)]
    pub fn fallback_color(&self) -> String {
        AMBIENT_FALLBACK_COLOR.to_string()
    }
}
