// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loading-screen gate.

mod sequencer;

pub use sequencer::{BootstrapOutcome, BootstrapSequencer, CancelHandle, ReadyReason};

/// Process-wide UI phase. Flips once, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum LoadingPhase {
    Loading,
    Ready,
}

/// Told when revealed content has changed the document geometry.
pub trait LayoutObserver {
    fn layout_changed(&self);
}

impl<F: Fn()> LayoutObserver for F {
    fn layout_changed(&self) {
        self()
    }
}
