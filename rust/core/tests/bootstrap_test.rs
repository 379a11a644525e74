// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loading gate timelines, asserted on paused tokio time.

mod common;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use common::{assert_elapsed, registry, FakeSource, ManualHost, LOGO, MODEL, POSTERS};
use spacefolio_core::scroll::black_overlay;
use spacefolio_core::{
    AssetKey, BootstrapConfig, BootstrapOutcome, BootstrapSequencer, Error, LoadingPhase, ReadyReason,
    TriggerSet,
};

fn sequencer(source: &Arc<FakeSource>) -> BootstrapSequencer {
    BootstrapSequencer::new(registry(source.clone()), BootstrapConfig::default())
}

fn ready(outcome: BootstrapOutcome) -> (ReadyReason, Duration) {
    match outcome {
        BootstrapOutcome::Ready { reason, elapsed } => (reason, elapsed),
        BootstrapOutcome::Cancelled => panic!("sequence was cancelled"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_fast_assets_wait_for_min_display() {
    let source = Arc::new(FakeSource::new());
    let sequencer = sequencer(&source);
    assert_eq!(sequencer.phase(), LoadingPhase::Loading);

    let (reason, elapsed) = ready(sequencer.run().await.unwrap());

    assert_elapsed(elapsed, 1200);
    assert!(matches!(reason, ReadyReason::AssetsSettled(ref report) if report.degraded().is_none()));
    assert_eq!(sequencer.phase(), LoadingPhase::Ready);
    assert!(!sequencer.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_slow_assets_extend_loading() {
    let source = Arc::new(FakeSource::new().with_delay(Duration::from_millis(3000)));
    let sequencer = sequencer(&source);

    let (reason, elapsed) = ready(sequencer.run().await.unwrap());

    assert_elapsed(elapsed, 3000);
    assert!(matches!(reason, ReadyReason::AssetsSettled(_)));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_assets_hit_fail_safe() {
    let source = Arc::new(FakeSource::new().hanging());
    let sequencer = sequencer(&source);

    let (reason, elapsed) = ready(sequencer.run().await.unwrap());

    assert_elapsed(elapsed, 5000);
    assert!(matches!(reason, ReadyReason::FailSafe));
    assert_eq!(source.image_calls(LOGO), 1);
    assert_eq!(source.binary_calls(MODEL), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_assets_do_not_block() {
    let source = Arc::new(FakeSource::new().failing(LOGO).failing(MODEL));
    let sequencer = sequencer(&source);

    let (reason, elapsed) = ready(sequencer.run().await.unwrap());

    assert_elapsed(elapsed, 1200);
    let ReadyReason::AssetsSettled(report) = reason else {
        panic!("expected settled assets");
    };
    assert_eq!(report.degraded(), Some(Error::CriticalLoadDegraded { failed: 2, total: 2 }));
}

#[tokio::test(start_paused = true)]
async fn test_loads_continue_after_fail_safe() {
    let source = Arc::new(FakeSource::new().with_delay(Duration::from_millis(8000)));
    let registry = registry(source.clone());
    let sequencer = BootstrapSequencer::new(registry.clone(), BootstrapConfig::default());

    let (reason, _) = ready(sequencer.run().await.unwrap());
    assert!(matches!(reason, ReadyReason::FailSafe));
    assert!(!registry.is_loaded(&AssetKey::from(MODEL)));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(registry.is_loaded(&AssetKey::from(MODEL)));
    assert!(registry.is_loaded(&AssetKey::from(LOGO)));
    assert_eq!(source.binary_calls(MODEL), 1);
}

#[tokio::test(start_paused = true)]
async fn test_layout_observers_notified_once() {
    let source = Arc::new(FakeSource::new());
    let sequencer = sequencer(&source);
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    sequencer.add_layout_observer(Rc::new(move || counter.set(counter.get() + 1)));

    let host = ManualHost::new(1440.0, 900.0);
    let triggers = Rc::new(TriggerSet::new(host.clone()));
    let overlay = triggers.add(black_overlay());
    sequencer.add_layout_observer(triggers.clone());

    // Revealed content grows the page before the observers run.
    host.doc_height.set(8000.0);
    sequencer.run().await.unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(triggers.refresh_count(), 1);
    assert_eq!(triggers.progress_at(overlay, 3200.0), Some(0.0));
    assert!(matches!(sequencer.run().await, Err(Error::AlreadyStarted)));
    assert_eq!(calls.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_secondary_preload_follows_ready() {
    let source = Arc::new(FakeSource::new());
    let sequencer = sequencer(&source);

    sequencer.run().await.unwrap();
    assert_eq!(source.image_calls(POSTERS[2]), 0);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    for poster in POSTERS {
        assert_eq!(source.image_calls(poster), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_ready_is_a_no_op() {
    let source = Arc::new(FakeSource::new().with_delay(Duration::from_millis(2000)));
    let sequencer = sequencer(&source);
    let notified = Rc::new(Cell::new(false));
    let flag = notified.clone();
    sequencer.add_layout_observer(Rc::new(move || flag.set(true)));
    let handle = sequencer.cancel_handle();

    let (outcome, ()) = tokio::join!(sequencer.run(), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.cancel();
    });

    assert!(matches!(outcome, Ok(BootstrapOutcome::Cancelled)));
    assert!(handle.is_cancelled());
    assert!(sequencer.is_loading());

    // Let every timer and the critical load run out.
    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert!(sequencer.is_loading());
    assert!(!notified.get());
    assert_eq!(source.image_calls(POSTERS[0]), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_leaves_critical_loads_running() {
    let source = Arc::new(FakeSource::new().with_delay(Duration::from_millis(800)));
    let registry = registry(source.clone());
    let sequencer = BootstrapSequencer::new(registry.clone(), BootstrapConfig::default());
    let handle = sequencer.cancel_handle();

    let (outcome, ()) = tokio::join!(sequencer.run(), async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.cancel();
    });
    assert!(matches!(outcome, Ok(BootstrapOutcome::Cancelled)));
    assert!(!registry.is_loaded(&AssetKey::from(LOGO)));

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(registry.is_loaded(&AssetKey::from(LOGO)));
    assert!(registry.is_loaded(&AssetKey::from(MODEL)));
    assert_eq!(source.image_calls(LOGO), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_start() {
    let source = Arc::new(FakeSource::new());
    let sequencer = sequencer(&source);
    sequencer.cancel();

    let outcome = sequencer.run().await.unwrap();

    assert!(!outcome.is_ready());
    assert_eq!(sequencer.phase(), LoadingPhase::Loading);
}
