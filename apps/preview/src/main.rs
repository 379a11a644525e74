// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spacefolio preview - runs the landing page boot sequence natively.
//!
//! Loads the critical assets from a local directory through the shared
//! registry, holds a simulated loading screen until the gate opens, then
//! replays a scroll session through a headless hero viewport. Every step is
//! logged, so timing and scroll mapping can be checked without a browser.
//!
//! # Environment
//!
//! - `ASSET_ROOT` - directory the asset keys resolve against (default `./public`)
//! - `SITE_CONFIG` - optional JSON site config
//! - `MIN_DISPLAY_MS`, `FAIL_SAFE_MS` - loading gate overrides
//! - `IDLE_TIMEOUT_MS`, `IDLE_FALLBACK_MS` - secondary preload overrides
//! - `VIEWPORT_WIDTH`, `SCROLL_STEPS` - headless page shape
//! - `WORKER_THREADS` - tokio worker threads

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use spacefolio_core::scroll::{
    black_overlay, hero_container_fade, hero_planet_drift, planet_layer_fade, planet_layer_zoom,
};
use spacefolio_core::{
    AssetKind, AssetRegistry, BootstrapOutcome, BootstrapSequencer, ReadyReason,
    ScrollViewportController, SiteConfig, TriggerSet,
};

mod config;
mod error;
mod headless;
mod runtime;
mod source;

use config::PreviewConfig;
use headless::{HeadlessPage, RecordingNode};
use source::FsAssetSource;

/// Height of the simulated browser window, also the hero section height.
const WINDOW_HEIGHT: f64 = 900.0;
/// Document height of the simulated landing page.
const DOCUMENT_HEIGHT: f64 = 6.0 * WINDOW_HEIGHT;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,spacefolio_core=debug,spacefolio_preview=debug".into()),
        )
        .pretty()
        .init();

    let preview = PreviewConfig::from_env();
    let site = preview.site_config()?;

    tracing::info!(
        asset_root = %preview.asset_root.display(),
        min_display_ms = site.bootstrap.min_display_ms,
        fail_safe_ms = site.bootstrap.fail_safe_ms,
        viewport_width = preview.viewport_width,
        worker_threads = preview.worker_threads,
        "Starting Spacefolio preview"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(preview.worker_threads)
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let platform = runtime::tokio_platform(runtime.handle().clone(), &site.idle);
    let registry = AssetRegistry::new(
        Arc::new(FsAssetSource::new(&preview.asset_root)),
        platform,
        site.assets.clone(),
        site.idle.clone(),
    )
    .install()
    .clone();

    runtime.block_on(run(preview, site, registry))
}

async fn run(preview: PreviewConfig, site: SiteConfig, registry: AssetRegistry) -> anyhow::Result<()> {
    shared_request_demo(&registry).await;

    // Only the loading screen is laid out until Ready.
    let page = HeadlessPage::new(preview.viewport_width, WINDOW_HEIGHT, WINDOW_HEIGHT);
    let triggers = Rc::new(TriggerSet::new(page.clone()));
    triggers.add(hero_planet_drift(preview.viewport_width));
    triggers.add(hero_container_fade());
    triggers.add(planet_layer_zoom());
    triggers.add(planet_layer_fade());
    triggers.add(black_overlay());

    let sequencer = BootstrapSequencer::new(registry.clone(), site.bootstrap.clone());
    // Observers run in registration order, so the page grows before triggers re-measure.
    let revealed = page.clone();
    sequencer.add_layout_observer(Rc::new(move || {
        revealed.set_document_height(DOCUMENT_HEIGHT);
        tracing::info!(height = DOCUMENT_HEIGHT, "Loading screen removed, content revealed");
    }));
    sequencer.add_layout_observer(triggers.clone());

    let mut hero = ScrollViewportController::new(page.clone(), site.viewport);
    hero.mount();

    let outcome = sequencer.run().await?;
    let model_loaded = match &outcome {
        BootstrapOutcome::Ready {
            reason: ReadyReason::AssetsSettled(report),
            elapsed,
        } => {
            if let Some(err) = report.degraded() {
                tracing::warn!(error = %err, "Continuing with degraded assets");
            }
            tracing::info!(?elapsed, "Ready after critical assets settled");
            report.model().is_some()
        }
        BootstrapOutcome::Ready {
            reason: ReadyReason::FailSafe,
            elapsed,
        } => {
            tracing::info!(?elapsed, "Ready after fail-safe");
            registry.is_loaded(&registry.manifest().model)
        }
        BootstrapOutcome::Cancelled => {
            tracing::info!("Bootstrap cancelled");
            return Ok(());
        }
    };

    if model_loaded {
        hero.scene_ready(RecordingNode::new())?;
    } else {
        hero.scene_failed("model payload unavailable");
    }
    headless::replay(&page, &hero, &triggers, preview.scroll_steps);
    hero.dispose();

    // Secondary preload runs after the idle fallback.
    tokio::time::sleep(site.idle.fallback_delay() + Duration::from_millis(250)).await;
    for key in registry.manifest().secondary() {
        let state = registry.load_state(key, AssetKind::Image);
        tracing::info!(key = %key, ?state, "Secondary asset");
    }

    Ok(())
}

/// Two tasks ask for the logo at once; the source is read a single time.
async fn shared_request_demo(registry: &AssetRegistry) {
    let logo = registry.manifest().logo.clone();
    let tasks: Vec<_> = (0..2)
        .map(|task| {
            let load = registry.request_image(&logo);
            tokio::spawn(async move { (task, load.await) })
        })
        .collect();

    for handle in tasks {
        match handle.await {
            Ok((task, Ok(image))) => tracing::debug!(task, ?image, "Logo resolved"),
            Ok((task, Err(err))) => tracing::warn!(task, error = %err, "Logo failed"),
            Err(err) => tracing::warn!(error = %err, "Logo task panicked"),
        }
    }
}
