// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced to JavaScript.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("No global window")]
    NoWindow,

    #[error("Invalid site config: {0}")]
    Config(String),

    #[error("Unknown scroll timeline preset: {0}")]
    UnknownPreset(String),

    #[error(transparent)]
    Core(#[from] spacefolio_core::Error),
}

impl From<serde_wasm_bindgen::Error> for BindingError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        BindingError::Config(err.to_string())
    }
}

impl From<BindingError> for JsValue {
    fn from(err: BindingError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
