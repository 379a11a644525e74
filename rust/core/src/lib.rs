// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Spacefolio Core
//!
//! Progressive asset loading and a scroll-synchronized 3D viewport for the
//! Spacefolio landing page, written against narrow platform traits so the
//! same logic runs in the browser and in native hosts.
//!
//! ## Overview
//!
//! - **Asset registry**: load-once cache that deduplicates concurrent image
//!   and binary requests and gates first paint on the critical set
//! - **Bootstrap gate**: `Loading -> Ready` after a minimum display time and
//!   the critical load, with a hard fail-safe
//! - **Viewport controller**: hero model transform as a pure function of
//!   scroll progress, recomputed every frame
//! - **Scroll triggers**: document-relative thresholds for the page fades,
//!   refreshed when layout changes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spacefolio_core::{AssetRegistry, BootstrapSequencer, SiteConfig};
//!
//! let config = SiteConfig::default();
//! let registry = AssetRegistry::new(source, platform, config.assets.clone(), config.idle.clone());
//! let sequencer = BootstrapSequencer::new(registry.install().clone(), config.bootstrap.clone());
//!
//! match sequencer.run().await? {
//!     BootstrapOutcome::Ready { elapsed, .. } => println!("ready after {elapsed:?}"),
//!     BootstrapOutcome::Cancelled => {}
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable (de)serialization of the configuration types

pub mod asset;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod platform;
pub mod scroll;
pub mod viewport;

pub use asset::{AssetKey, AssetKind, AssetRegistry, AssetSource, CriticalReport, ImageHandle, LoadState, Settled};
pub use bootstrap::{BootstrapOutcome, BootstrapSequencer, CancelHandle, LayoutObserver, LoadingPhase, ReadyReason};
pub use config::{AssetManifest, BootstrapConfig, IdleConfig, SiteConfig};
pub use error::{Error, Result};
pub use platform::{select_idle_scheduler, Clock, DelayedScheduler, IdleScheduler, IdleTask, Platform, Spawner};
pub use scroll::{Property, ScrollTimeline, ScrollTrigger, TriggerSet, TriggerSpec};
pub use viewport::{
    AmbientViewport, CallbackList, DocumentMetrics, ElementGeometry, SceneNode, SceneTransform, ScrollFrame,
    ScrollViewportController, Subscription, ViewportBaseConfig, ViewportHost, ViewportPhase, ViewportSettings,
};
