// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{
    transform_for, ScrollFrame, SceneNode, SceneTransform, Subscription, ViewportBaseConfig,
    ViewportHost, ViewportSettings,
};
use crate::error::{Error, Result};

/// Lifecycle of a [`ScrollViewportController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportPhase {
    /// Not mounted yet.
    Uninitialized,
    /// Base selected and listeners attached; waiting for the scene.
    Configuring,
    /// Frame loop running.
    Active,
    /// All registrations released.
    Disposed,
}

struct State {
    phase: ViewportPhase,
    base: Option<ViewportBaseConfig>,
    frame: ScrollFrame,
    node: Option<Rc<dyn SceneNode>>,
    last_applied: Option<SceneTransform>,
    scene_failed: bool,
}

impl State {
    fn new() -> Self {
        Self {
            phase: ViewportPhase::Uninitialized,
            base: None,
            frame: ScrollFrame::default(),
            node: None,
            last_applied: None,
            scene_failed: false,
        }
    }

    fn refresh_progress(&mut self, host: &dyn ViewportHost) {
        // A missing hero keeps the previous value.
        if let Some(geometry) = host.hero_geometry() {
            self.frame = ScrollFrame::from_geometry(geometry);
        }
    }

    fn render(&mut self, vertical_drift: f64) {
        let (Some(base), Some(node)) = (self.base, self.node.as_ref()) else {
            return;
        };
        let transform = transform_for(&base, self.frame.progress, vertical_drift);
        transform.apply(node.as_ref());
        self.last_applied = Some(transform);
    }
}

/// Drives the hero model's scale and position from scroll progress.
///
/// `mount` selects the breakpoint base once and attaches scroll and resize
/// listeners; `scene_ready` starts the per-frame loop. Every frame writes an
/// absolute transform computed from the current progress, so dropped frames
/// and scrollbar jumps cannot accumulate error. Dropping the controller
/// disposes it.
pub struct ScrollViewportController {
    host: Rc<dyn ViewportHost>,
    settings: ViewportSettings,
    state: Rc<RefCell<State>>,
    listeners: Vec<Subscription>,
    frames: Option<Subscription>,
}

impl ScrollViewportController {
    pub fn new(host: Rc<dyn ViewportHost>, settings: ViewportSettings) -> Self {
        Self {
            host,
            settings,
            state: Rc::new(RefCell::new(State::new())),
            listeners: Vec::new(),
            frames: None,
        }
    }

    /// Attach to the page. No-op while already mounted; a disposed
    /// controller starts over from a clean state.
    pub fn mount(&mut self) {
        match self.phase() {
            ViewportPhase::Configuring | ViewportPhase::Active => return,
            ViewportPhase::Disposed => *self.state.borrow_mut() = State::new(),
            ViewportPhase::Uninitialized => {}
        }

        let width = self.host.viewport_width();
        let base = self.settings.breakpoints.select(width);
        {
            let mut state = self.state.borrow_mut();
            state.base = Some(base);
            state.refresh_progress(self.host.as_ref());
            state.phase = ViewportPhase::Configuring;
        }
        tracing::debug!(width, scale = base.scale, "Viewport configuring");

        self.listeners.push(self.host.on_scroll(self.progress_callback()));
        // Resize only moves the progress; the base stays what mount picked.
        self.listeners.push(self.host.on_resize(self.progress_callback()));
    }

    /// The scene finished loading: apply the first transform and start the
    /// frame loop. Mounts first if needed.
    pub fn scene_ready(&mut self, node: Rc<dyn SceneNode>) -> Result<()> {
        match self.phase() {
            ViewportPhase::Disposed => return Err(Error::Disposed),
            ViewportPhase::Uninitialized => self.mount(),
            ViewportPhase::Configuring | ViewportPhase::Active => {}
        }

        {
            let mut state = self.state.borrow_mut();
            state.node = Some(node);
            state.scene_failed = false;
            state.phase = ViewportPhase::Active;
            state.render(self.settings.vertical_drift);
        }

        if self.frames.is_none() {
            let state = Rc::downgrade(&self.state);
            let drift = self.settings.vertical_drift;
            self.frames = Some(self.host.request_frames(Box::new(move || {
                if let Some(state) = state.upgrade() {
                    state.borrow_mut().render(drift);
                }
            })));
            tracing::debug!("Viewport active");
        }
        Ok(())
    }

    /// The scene could not be loaded. The controller keeps waiting in
    /// `Configuring` and the fallback plane stays up.
    pub fn scene_failed(&mut self, reason: &str) {
        match self.phase() {
            ViewportPhase::Disposed => return,
            ViewportPhase::Uninitialized => self.mount(),
            ViewportPhase::Configuring | ViewportPhase::Active => {}
        }
        tracing::warn!(reason, "Hero scene failed to load, showing fallback");
        self.state.borrow_mut().scene_failed = true;
    }

    /// Release every listener and the frame registration.
    pub fn dispose(&mut self) {
        if self.phase() == ViewportPhase::Disposed {
            return;
        }
        self.frames = None;
        self.listeners.clear();
        let mut state = self.state.borrow_mut();
        state.node = None;
        state.phase = ViewportPhase::Disposed;
        tracing::debug!("Viewport disposed");
    }

    pub fn phase(&self) -> ViewportPhase {
        self.state.borrow().phase
    }

    pub fn progress(&self) -> f64 {
        self.state.borrow().frame.progress
    }

    /// Base picked at mount time.
    pub fn base(&self) -> Option<ViewportBaseConfig> {
        self.state.borrow().base
    }

    /// Last transform written to the scene.
    pub fn current_transform(&self) -> Option<SceneTransform> {
        self.state.borrow().last_applied
    }

    /// Whether the flat placeholder plane should be drawn instead of the scene.
    pub fn shows_fallback(&self) -> bool {
        let state = self.state.borrow();
        state.node.is_none() || state.scene_failed
    }

    /// Whether the scene failed to load since the last mount.
    pub fn scene_has_failed(&self) -> bool {
        self.state.borrow().scene_failed
    }

    fn progress_callback(&self) -> Box<dyn FnMut()> {
        let state: Weak<RefCell<State>> = Rc::downgrade(&self.state);
        let host: Weak<dyn ViewportHost> = Rc::downgrade(&self.host);
        Box::new(move || {
            if let (Some(state), Some(host)) = (state.upgrade(), host.upgrade()) {
                state.borrow_mut().refresh_progress(host.as_ref());
            }
        })
    }
}

impl Drop for ScrollViewportController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ScrollViewportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ScrollViewportController")
            .field("phase", &state.phase)
            .field("progress", &state.frame.progress)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
