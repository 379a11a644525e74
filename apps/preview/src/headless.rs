// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Headless page for replaying a scroll session through the viewport.

use std::cell::Cell;
use std::rc::Rc;

use nalgebra::Vector3;
use spacefolio_core::viewport::HostCallback;
use spacefolio_core::{
    CallbackList, DocumentMetrics, ElementGeometry, SceneNode, SceneTransform, ScrollViewportController,
    Subscription, TriggerSet, ViewportHost,
};

/// A page of fixed size whose scroll position is set by the caller.
pub struct HeadlessPage {
    width: f64,
    hero_height: f64,
    document_height: Cell<f64>,
    scroll_y: Cell<f64>,
    frames: Rc<CallbackList>,
    scroll: Rc<CallbackList>,
    resize: Rc<CallbackList>,
}

impl HeadlessPage {
    pub fn new(width: f64, hero_height: f64, document_height: f64) -> Rc<Self> {
        Rc::new(Self {
            width,
            hero_height,
            document_height: Cell::new(document_height),
            scroll_y: Cell::new(0.0),
            frames: Rc::default(),
            scroll: Rc::default(),
            resize: Rc::default(),
        })
    }

    /// Move to `scroll_y`, dispatch scroll listeners, then render one frame.
    pub fn scroll_to(&self, scroll_y: f64) {
        self.scroll_y.set(scroll_y.max(0.0));
        self.scroll.fire();
        self.frames.fire();
    }

    /// Content appearing or collapsing changes the scrollable height.
    pub fn set_document_height(&self, height: f64) {
        self.document_height.set(height);
    }

    /// Live registrations: frames, scroll, resize.
    pub fn registrations(&self) -> (usize, usize, usize) {
        (self.frames.len(), self.scroll.len(), self.resize.len())
    }
}

impl ViewportHost for HeadlessPage {
    fn request_frames(&self, callback: HostCallback) -> Subscription {
        self.frames.register(callback)
    }

    fn on_scroll(&self, callback: HostCallback) -> Subscription {
        self.scroll.register(callback)
    }

    fn on_resize(&self, callback: HostCallback) -> Subscription {
        self.resize.register(callback)
    }

    fn viewport_width(&self) -> f64 {
        self.width
    }

    /// The hero sits at the top of the document.
    fn hero_geometry(&self) -> Option<ElementGeometry> {
        Some(ElementGeometry::new(-self.scroll_y.get(), self.hero_height))
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }
}

impl DocumentMetrics for HeadlessPage {
    fn document_height(&self) -> f64 {
        self.document_height.get()
    }
}

/// Scene node that remembers the last transform written to it.
pub struct RecordingNode {
    last: Cell<SceneTransform>,
}

impl RecordingNode {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            last: Cell::new(SceneTransform {
                scale: 1.0,
                position: Vector3::zeros(),
                rotation: Vector3::zeros(),
                opacity: 1.0,
            }),
        })
    }

    pub fn last(&self) -> SceneTransform {
        self.last.get()
    }

    fn update(&self, f: impl FnOnce(&mut SceneTransform)) {
        let mut transform = self.last.get();
        f(&mut transform);
        self.last.set(transform);
    }
}

impl SceneNode for RecordingNode {
    fn set_scale(&self, scale: f64) {
        self.update(|t| t.scale = scale);
    }

    fn set_position(&self, position: Vector3<f64>) {
        self.update(|t| t.position = position);
    }

    fn set_rotation(&self, rotation: Vector3<f64>) {
        self.update(|t| t.rotation = rotation);
    }

    fn set_opacity(&self, opacity: f64) {
        self.update(|t| t.opacity = opacity);
    }

    fn clone_node(&self) -> Rc<dyn SceneNode> {
        let copy = RecordingNode::new();
        copy.last.set(self.last.get());
        copy
    }
}

/// Scroll from the top to the bottom of the page in `steps` equal moves,
/// logging the hero transform and every timeline at each stop.
///
/// Returns the hero transforms in visiting order.
pub fn replay(
    page: &HeadlessPage,
    hero: &ScrollViewportController,
    triggers: &TriggerSet,
    steps: usize,
) -> Vec<(f64, Option<SceneTransform>)> {
    let max_scroll = page.document_height().max(0.0);
    let steps = steps.max(1);
    let mut visited = Vec::with_capacity(steps + 1);

    for step in 0..=steps {
        let scroll_y = max_scroll * step as f64 / steps as f64;
        page.scroll_to(scroll_y);

        let transform = hero.current_transform();
        match &transform {
            Some(t) => tracing::info!(
                scroll_y,
                progress = hero.progress(),
                scale = t.scale,
                y = t.position.y,
                "Hero frame"
            ),
            None => tracing::info!(scroll_y, fallback = hero.shows_fallback(), "Hero frame without scene"),
        }
        for index in 0..triggers.len() {
            if let Some(values) = triggers.sample(index, scroll_y) {
                tracing::debug!(scroll_y, timeline = index, ?values, "Timeline sample");
            }
        }
        visited.push((scroll_y, transform));
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacefolio_core::scroll::black_overlay;
    use spacefolio_core::{Property, ViewportSettings};

    #[test]
    fn test_replay_reaches_full_zoom() {
        let page = HeadlessPage::new(1440.0, 900.0, 5400.0);
        let node = RecordingNode::new();
        let mut viewport = ScrollViewportController::new(page.clone(), ViewportSettings::default());
        viewport.scene_ready(node.clone()).unwrap();

        page.scroll_to(450.0);
        assert!((node.last().scale - 52.0).abs() < 1e-9);
        page.scroll_to(2000.0);
        assert!((node.last().scale - 64.0).abs() < 1e-9);
        assert_eq!(node.last().rotation, Vector3::zeros());

        drop(viewport);
        assert_eq!(page.registrations(), (0, 0, 0));
    }

    #[test]
    fn test_replay_visits_every_stop() {
        let page = HeadlessPage::new(1440.0, 900.0, 4000.0);
        let triggers = TriggerSet::new(page.clone());
        let overlay = triggers.add(black_overlay());
        let mut hero = ScrollViewportController::new(page.clone(), ViewportSettings::default());
        hero.scene_ready(RecordingNode::new()).unwrap();

        let visited = replay(&page, &hero, &triggers, 4);
        let stops: Vec<f64> = visited.iter().map(|(y, _)| *y).collect();
        assert_eq!(stops, vec![0.0, 1000.0, 2000.0, 3000.0, 4000.0]);
        assert!((visited[0].1.unwrap().scale - 40.0).abs() < 1e-9);
        assert!((visited[4].1.unwrap().scale - 64.0).abs() < 1e-9);

        let opacity = |y| {
            triggers
                .sample(overlay, y)
                .and_then(|values| values.into_iter().find(|(p, _)| *p == Property::Opacity))
                .map(|(_, v)| v)
        };
        assert_eq!(opacity(1000.0), Some(0.0));
        assert_eq!(opacity(3000.0), Some(1.0));
    }

    #[test]
    fn test_replay_without_scene() {
        let page = HeadlessPage::new(390.0, 700.0, 2000.0);
        let triggers = TriggerSet::new(page.clone());
        let mut hero = ScrollViewportController::new(page.clone(), ViewportSettings::default());
        hero.scene_failed("missing model");

        let visited = replay(&page, &hero, &triggers, 2);
        assert_eq!(visited.len(), 3);
        assert!(visited.iter().all(|(_, t)| t.is_none()));
        assert!(hero.shows_fallback());
    }

    #[test]
    fn test_revealed_content_moves_thresholds_after_refresh() {
        let page = HeadlessPage::new(1440.0, 900.0, 900.0);
        let triggers = TriggerSet::new(page.clone());
        let overlay = triggers.add(black_overlay());
        let opacity = |y| triggers.sample(overlay, y).map(|values| values[0].1);

        assert_eq!(opacity(1000.0), Some(1.0));

        page.set_document_height(4000.0);
        assert_eq!(opacity(1000.0), Some(1.0));
        triggers.refresh();
        assert_eq!(opacity(1000.0), Some(0.0));
        assert_eq!(opacity(3000.0), Some(1.0));
    }
}
