// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scroll-threshold mapping for the page-level fades and drifts.
//!
//! Thresholds are fractions of the document height, so they go stale when
//! hidden content appears. [`TriggerSet`] recomputes them on a layout change.

mod presets;
mod timeline;
mod trigger;

pub use presets::{black_overlay, hero_container_fade, hero_planet_drift, planet_layer_fade, planet_layer_zoom};
pub use timeline::{Property, ScrollTimeline, Track};
pub use trigger::{ScrollTrigger, TriggerSpec};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::bootstrap::LayoutObserver;
pub use crate::viewport::DocumentMetrics;

/// Timelines sharing one document, refreshed together.
pub struct TriggerSet {
    metrics: Rc<dyn DocumentMetrics>,
    timelines: RefCell<Vec<ScrollTimeline>>,
    refreshes: Cell<usize>,
}

impl TriggerSet {
    pub fn new(metrics: Rc<dyn DocumentMetrics>) -> Self {
        Self {
            metrics,
            timelines: RefCell::new(Vec::new()),
            refreshes: Cell::new(0),
        }
    }

    /// Register `timeline`, measured against the current document. Returns its index.
    pub fn add(&self, mut timeline: ScrollTimeline) -> usize {
        timeline.refresh(self.metrics.document_height());
        let mut timelines = self.timelines.borrow_mut();
        timelines.push(timeline);
        timelines.len() - 1
    }

    /// Re-measure every trigger against the current document height.
    pub fn refresh(&self) {
        let height = self.metrics.document_height();
        for timeline in self.timelines.borrow_mut().iter_mut() {
            timeline.refresh(height);
        }
        self.refreshes.set(self.refreshes.get() + 1);
        tracing::debug!(height, count = self.len(), "Scroll triggers refreshed");
    }

    /// Property values of timeline `index` at `scroll_y`.
    pub fn sample(&self, index: usize, scroll_y: f64) -> Option<Vec<(Property, f64)>> {
        self.timelines.borrow().get(index).map(|timeline| timeline.sample(scroll_y))
    }

    pub fn progress_at(&self, index: usize, scroll_y: f64) -> Option<f64> {
        self.timelines
            .borrow()
            .get(index)
            .map(|timeline| timeline.trigger().progress_at(scroll_y))
    }

    pub fn len(&self) -> usize {
        self.timelines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times [`refresh`](Self::refresh) ran.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.get()
    }

    /// Drop every timeline.
    pub fn kill_all(&self) {
        self.timelines.borrow_mut().clear();
    }
}

impl LayoutObserver for TriggerSet {
    fn layout_changed(&self) {
        self.refresh();
    }
}
