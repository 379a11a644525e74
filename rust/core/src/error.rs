// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use thiserror::Error;

use crate::asset::AssetKey;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the asset, bootstrap and viewport layers.
///
/// `Clone` because a single load outcome is handed to every caller sharing
/// the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Failed to load asset {key}: {reason}")]
    AssetLoad { key: AssetKey, reason: String },

    #[error("Critical assets degraded: {failed} of {total} failed")]
    CriticalLoadDegraded { failed: usize, total: usize },

    #[error("Loading fail-safe fired after {0:?}")]
    SequencerTimeout(Duration),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Viewport controller already disposed")]
    Disposed,

    #[error("Bootstrap sequence already started")]
    AlreadyStarted,

    #[error("Failed to spawn task: {0}")]
    Spawn(String),
}

impl Error {
    /// Build an asset failure for `key`.
    pub fn asset(key: &AssetKey, reason: impl Into<String>) -> Self {
        Error::AssetLoad {
            key: key.clone(),
            reason: reason.into(),
        }
    }

    /// Key of the asset this error refers to, if any.
    pub fn asset_key(&self) -> Option<&AssetKey> {
        match self {
            Error::AssetLoad { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<futures_util::task::SpawnError> for Error {
    fn from(err: futures_util::task::SpawnError) -> Self {
        Error::Spawn(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let key = AssetKey::from("/assets/logo.svg");
        let err = Error::asset(&key, "HTTP 404");
        assert_eq!(err.to_string(), "Failed to load asset /assets/logo.svg: HTTP 404");
        assert_eq!(err.asset_key(), Some(&key));
    }

    #[test]
    fn test_non_asset_error_has_no_key() {
        let err = Error::SequencerTimeout(Duration::from_millis(5000));
        assert!(err.asset_key().is_none());
        assert!(err.to_string().contains("5s"));
    }
}
