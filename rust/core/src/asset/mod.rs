// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Load-once asset registry.
//!
//! Deduplicates concurrent requests for the same image or binary across
//! independent call sites and gates first paint on the critical set.

mod key;
mod registry;
mod source;

pub use key::AssetKey;
pub use registry::{AssetRegistry, CriticalReport, LoadState, Settled};
pub use source::{AssetSource, ImageHandle};

/// How an asset is requested. The same key may be tracked once per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AssetKind {
    Image,
    Binary,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Image => f.write_str("image"),
            AssetKind::Binary => f.write_str("binary"),
        }
    }
}
