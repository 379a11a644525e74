// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image decode and binary fetch through the browser.

use std::cell::RefCell;
use std::rc::Rc;

use bytes::Bytes;
use futures_channel::oneshot;
use futures_util::future::{BoxFuture, FutureExt};
use gloo_events::EventListener;
use spacefolio_core::{AssetKey, AssetSource, Error, ImageHandle, Result};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, RequestCache, RequestCredentials, RequestInit, Response};

use crate::bridge::bridge;
use crate::utils::describe;

/// Resolves keys against `base` (empty for same-origin absolute paths).
#[derive(Debug, Clone, Default)]
pub struct BrowserAssetSource {
    base: String,
}

impl BrowserAssetSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, key: &AssetKey) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), key.as_str())
    }
}

impl AssetSource for BrowserAssetSource {
    fn load_image(&self, key: &AssetKey) -> BoxFuture<'static, Result<ImageHandle>> {
        let url = self.url(key);
        let key = key.clone();
        let owned = key.clone();
        bridge(async move { decode_image(&owned, &url).await })
            .map(move |result| result.unwrap_or_else(|| Err(Error::asset(&key, "image task dropped"))))
            .boxed()
    }

    fn fetch_binary(&self, key: &AssetKey) -> BoxFuture<'static, Result<Bytes>> {
        let url = self.url(key);
        let key = key.clone();
        let owned = key.clone();
        bridge(async move { fetch_bytes(&owned, &url).await })
            .map(move |result| result.unwrap_or_else(|| Err(Error::asset(&key, "fetch task dropped"))))
            .boxed()
    }
}

/// Wait for an `<img>` to fire `load` or `error`.
async fn decode_image(key: &AssetKey, url: &str) -> Result<ImageHandle> {
    let image = HtmlImageElement::new().map_err(|err| Error::asset(key, describe(&err)))?;
    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load = {
        let tx = tx.clone();
        EventListener::once(&image, "load", move |_| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        })
    };
    let on_error = EventListener::once(&image, "error", move |_| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(false);
        }
    });
    image.set_src(url);

    let loaded = rx.await.unwrap_or(false);
    drop(on_load);
    drop(on_error);
    if !loaded {
        return Err(Error::asset(key, "image failed to decode"));
    }

    let dimensions = match (image.natural_width(), image.natural_height()) {
        (0, 0) => None,
        size => Some(size),
    };
    Ok(ImageHandle::new(key.clone(), dimensions))
}

/// `fetch` with `cache: 'force-cache'`, read fully into memory.
async fn fetch_bytes(key: &AssetKey, url: &str) -> Result<Bytes> {
    let window = web_sys::window().ok_or_else(|| Error::asset(key, "no window"))?;
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_cache(RequestCache::ForceCache);
    init.set_credentials(RequestCredentials::SameOrigin);

    let response = JsFuture::from(window.fetch_with_str_and_init(url, &init))
        .await
        .map_err(|err| Error::asset(key, describe(&err)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| Error::asset(key, "fetch did not return a Response"))?;
    if !response.ok() {
        return Err(Error::asset(key, format!("HTTP {}", response.status())));
    }

    let buffer = response.array_buffer().map_err(|err| Error::asset(key, describe(&err)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|err| Error::asset(key, describe(&err)))?;
    Ok(Bytes::from(js_sys::Uint8Array::new(&buffer).to_vec()))
}
