// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The page as a [`ViewportHost`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use spacefolio_core::viewport::HostCallback;
use spacefolio_core::{DocumentMetrics, ElementGeometry, Subscription, ViewportHost};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

/// Window-level listeners plus geometry of the element with `hero_id`.
#[derive(Debug, Clone)]
pub struct BrowserHost {
    hero_id: String,
}

impl BrowserHost {
    pub fn new(hero_id: impl Into<String>) -> Self {
        Self {
            hero_id: hero_id.into(),
        }
    }

    fn window() -> Option<Window> {
        web_sys::window()
    }

    fn listen(event: &'static str, mut callback: HostCallback) -> Subscription {
        let Some(window) = Self::window() else {
            return Subscription::noop();
        };
        // Default options register a passive bubble-phase listener.
        let listener = EventListener::new(&window, event, move |_| callback());
        Subscription::holding(listener)
    }
}

/// Self-rescheduling `requestAnimationFrame` chain.
struct FrameLoop {
    callback: RefCell<HostCallback>,
    pending: RefCell<Option<AnimationFrame>>,
    stopped: Cell<bool>,
}

impl FrameLoop {
    fn schedule(self: &Rc<Self>) {
        if self.stopped.get() {
            return;
        }
        let frame_loop = Rc::clone(self);
        let handle = request_animation_frame(move |_timestamp| {
            if frame_loop.stopped.get() {
                return;
            }
            (frame_loop.callback.borrow_mut())();
            frame_loop.schedule();
        });
        *self.pending.borrow_mut() = Some(handle);
    }

    fn stop(&self) {
        self.stopped.set(true);
        self.pending.borrow_mut().take();
    }
}

impl ViewportHost for BrowserHost {
    fn request_frames(&self, callback: HostCallback) -> Subscription {
        let frame_loop = Rc::new(FrameLoop {
            callback: RefCell::new(callback),
            pending: RefCell::new(None),
            stopped: Cell::new(false),
        });
        frame_loop.schedule();
        Subscription::new(move || frame_loop.stop())
    }

    fn on_scroll(&self, callback: HostCallback) -> Subscription {
        Self::listen("scroll", callback)
    }

    fn on_resize(&self, callback: HostCallback) -> Subscription {
        Self::listen("resize", callback)
    }

    fn viewport_width(&self) -> f64 {
        Self::window()
            .and_then(|window| window.inner_width().ok())
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn hero_geometry(&self) -> Option<ElementGeometry> {
        let element = Self::window()?.document()?.get_element_by_id(&self.hero_id)?;
        let rect = element.get_bounding_client_rect();
        let height = element
            .dyn_ref::<HtmlElement>()
            .map(|element| f64::from(element.offset_height()))
            .unwrap_or_else(|| rect.height());
        Some(ElementGeometry::new(rect.top(), height))
    }

    fn scroll_y(&self) -> f64 {
        Self::window()
            .and_then(|window| window.scroll_y().ok())
            .unwrap_or(0.0)
    }
}

impl DocumentMetrics for BrowserHost {
    fn document_height(&self) -> f64 {
        Self::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or(0.0)
    }
}
