// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spacefolio WebAssembly Bindings
//!
//! Browser backends for the core platform traits and the JavaScript API the
//! page uses to run the loading gate and drive the hero model.

use wasm_bindgen::prelude::*;

#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

mod api;
mod bridge;
mod error;
mod fetch;
mod host;
mod platform;
mod scene;
mod utils;
mod viewport;

pub use api::SpaceSite;
pub use error::BindingError;
pub use fetch::BrowserAssetSource;
pub use host::BrowserHost;
pub use platform::{browser_platform, BrowserClock, BrowserIdleScheduler, LocalSpawner};
pub use scene::{JsSceneNode, JsSceneObject};
pub use utils::set_panic_hook as init_panic_hook;
pub use viewport::{AmbientViewportHandle, HeroViewport};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the version of the bindings
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
