// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scroll-linked 3D viewport.
//!
//! The hero model's transform is a pure function of the current scroll
//! progress and a base configuration picked once per mount. Everything here
//! lives on the render thread, so the host and scene traits are not `Send`.

mod ambient;
mod config;
mod controller;
mod host;
mod progress;
mod scene;

pub use ambient::AmbientViewport;
pub use config::{AmbientTransform, Breakpoint, BreakpointTable, ViewportBaseConfig, ViewportSettings};
pub use controller::{ScrollViewportController, ViewportPhase};
pub use host::{CallbackList, DocumentMetrics, ElementGeometry, HostCallback, Subscription, ViewportHost};
pub use progress::ScrollFrame;
pub use scene::{transform_for, SceneNode, SceneTransform};

/// Flat plane colour shown while the hero scene is absent.
pub const HERO_FALLBACK_COLOR: &str = "#000000";

/// Flat plane colour shown while the ambient scene is absent.
pub const AMBIENT_FALLBACK_COLOR: &str = "#0a0a0a";
