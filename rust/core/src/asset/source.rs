// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport seam between the registry and the platform.
//!
//! The browser backend decodes images through `<img>` load events and fetches
//! binaries with `cache: 'force-cache'`; the native preview reads from disk.

use bytes::Bytes;
use futures_core::future::BoxFuture;

use super::AssetKey;
use crate::error::Result;

/// A decoded image, as reported by the platform decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub key: AssetKey,
    /// Natural pixel size, when the decoder can report one (vector images may not).
    pub dimensions: Option<(u32, u32)>,
}

impl ImageHandle {
    pub fn new(key: AssetKey, dimensions: Option<(u32, u32)>) -> Self {
        Self { key, dimensions }
    }
}

/// Performs the actual network / decoder work for a single key.
///
/// Implementations must not cache: deduplication is the registry's job, and
/// every call is expected to start exactly one underlying operation.
pub trait AssetSource: Send + Sync {
    /// Load and decode an image.
    fn load_image(&self, key: &AssetKey) -> BoxFuture<'static, Result<ImageHandle>>;

    /// Fetch an opaque binary payload.
    fn fetch_binary(&self, key: &AssetKey) -> BoxFuture<'static, Result<Bytes>>;
}
