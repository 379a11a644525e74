// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::Rc;

use super::{AmbientTransform, SceneNode, SceneTransform, Subscription, ViewportHost};

/// Non-interactive background instance of the shared scene.
///
/// Works on its own clone of the scene node and rewrites a fixed transform
/// every frame. It never listens to scroll.
pub struct AmbientViewport {
    host: Rc<dyn ViewportHost>,
    transform: SceneTransform,
    node: Rc<RefCell<Option<Rc<dyn SceneNode>>>>,
    frames: Option<Subscription>,
}

impl AmbientViewport {
    pub fn new(host: Rc<dyn ViewportHost>, transform: AmbientTransform) -> Self {
        Self {
            host,
            transform: transform.into(),
            node: Rc::new(RefCell::new(None)),
            frames: None,
        }
    }

    /// Clone `source` and start rendering the copy.
    pub fn scene_ready(&mut self, source: &dyn SceneNode) {
        let copy = source.clone_node();
        self.transform.apply(copy.as_ref());
        *self.node.borrow_mut() = Some(copy);

        if self.frames.is_none() {
            let node = Rc::downgrade(&self.node);
            let transform = self.transform;
            self.frames = Some(self.host.request_frames(Box::new(move || {
                if let Some(node) = node.upgrade() {
                    if let Some(node) = node.borrow().as_ref() {
                        transform.apply(node.as_ref());
                    }
                }
            })));
        }
    }

    pub fn transform(&self) -> SceneTransform {
        self.transform
    }

    pub fn is_active(&self) -> bool {
        self.frames.is_some()
    }

    pub fn shows_fallback(&self) -> bool {
        self.node.borrow().is_none()
    }

    pub fn dispose(&mut self) {
        self.frames = None;
        self.node.borrow_mut().take();
    }
}

impl Drop for AmbientViewport {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::test_host::{FakeHost, RecordingNode};
    use crate::viewport::{transform_for, ElementGeometry, ScrollViewportController, ViewportBaseConfig, ViewportSettings};
    use nalgebra::Vector3;

    #[test]
    fn test_ambient_uses_clone() {
        let host = FakeHost::new(1440.0, Some(ElementGeometry::new(-800.0, 800.0)));
        let shared = RecordingNode::new();

        let mut hero = ScrollViewportController::new(host.clone(), ViewportSettings::default());
        hero.scene_ready(shared.clone()).unwrap();

        let mut ambient = AmbientViewport::new(host.clone(), AmbientTransform::default());
        assert!(ambient.shows_fallback());
        ambient.scene_ready(shared.as_ref());
        host.tick();

        let copy = shared.clones.borrow()[0].clone();
        assert_eq!(copy.scale(), 35.0);
        assert_eq!(copy.position(), Vector3::new(-50.0, -60.0, 1.5));
        assert_eq!(copy.rotation(), Vector3::zeros());
        // The hero keeps its own transform.
        assert_eq!(shared.scale(), transform_for(&ViewportBaseConfig::hero(), 1.0, 3.5).scale);
        assert_eq!(host.scroll.len(), 1);
    }

    #[test]
    fn test_dispose_releases_frames() {
        let host = FakeHost::new(1440.0, None);
        let mut ambient = AmbientViewport::new(host.clone(), AmbientTransform::default());
        ambient.scene_ready(RecordingNode::new().as_ref());
        assert_eq!(host.frames.len(), 1);
        ambient.dispose();
        assert_eq!(host.frames.len(), 0);
        assert!(ambient.shows_fallback());
    }
}
