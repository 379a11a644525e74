// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Asset source reading from a local directory.

use std::io::Cursor;
use std::path::PathBuf;

use bytes::Bytes;
use futures_util::future::{BoxFuture, FutureExt};
use spacefolio_core::{AssetKey, AssetSource, Error, ImageHandle, Result};

/// Resolves `/assets/logo.svg` to `<root>/assets/logo.svg`.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &AssetKey) -> PathBuf {
        self.root.join(key.as_str().trim_start_matches('/'))
    }

    async fn read(key: &AssetKey, path: PathBuf) -> Result<Bytes> {
        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|err| Error::asset(key, format!("{}: {err}", path.display())))
    }
}

/// Pixel size from the image header. Vector images have none.
fn image_dimensions(key: &AssetKey, bytes: &[u8]) -> Result<Option<(u32, u32)>> {
    if key.extension().as_deref() == Some("svg") {
        return Ok(None);
    }
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| Error::asset(key, err.to_string()))?
        .into_dimensions()
        .map(Some)
        .map_err(|err| Error::asset(key, format!("decode failed: {err}")))
}

impl AssetSource for FsAssetSource {
    fn load_image(&self, key: &AssetKey) -> BoxFuture<'static, Result<ImageHandle>> {
        let key = key.clone();
        let path = self.path(&key);
        async move {
            let bytes = Self::read(&key, path).await?;
            let dimensions = image_dimensions(&key, &bytes)?;
            tracing::debug!(key = %key, ?dimensions, "Decoded image header");
            Ok(ImageHandle::new(key, dimensions))
        }
        .boxed()
    }

    fn fetch_binary(&self, key: &AssetKey) -> BoxFuture<'static, Result<Bytes>> {
        let key = key.clone();
        let path = self.path(&key);
        async move { Self::read(&key, path).await }.boxed()
    }
}
