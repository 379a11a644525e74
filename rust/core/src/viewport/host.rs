// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Callback registered with the host for frames, scroll or resize events.
pub type HostCallback = Box<dyn FnMut()>;

/// Bounding geometry of the tracked hero element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    /// Distance from the viewport top to the element top; negative once
    /// the element has scrolled past.
    pub top: f64,
    pub height: f64,
}

impl ElementGeometry {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// RAII handle for a host registration.
///
/// The release closure runs exactly once, on `cancel()` or on drop.
#[must_use = "dropping a Subscription releases the registration immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Ties the registration to the lifetime of `guard`, e.g. an event
    /// listener handle that unregisters itself on drop.
    pub fn holding<T: 'static>(guard: T) -> Self {
        Self::new(move || drop(guard))
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// In-process callback registry for hosts that dispatch their own events,
/// such as a headless page or a test double.
#[derive(Default)]
pub struct CallbackList {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, HostCallback)>>,
    /// Ids released while their callback was out for dispatch.
    released: RefCell<Vec<u64>>,
}

impl CallbackList {
    pub fn new() -> Rc<Self> {
        Rc::default()
    }

    /// Add `callback`; it stays registered until the subscription is released.
    pub fn register(self: &Rc<Self>, callback: HostCallback) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, callback));
        let list: Weak<Self> = Rc::downgrade(self);
        Subscription::new(move || {
            let Some(list) = list.upgrade() else {
                return;
            };
            let mut entries = list.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|(entry, _)| *entry != id);
            if entries.len() == before {
                list.released.borrow_mut().push(id);
            }
        })
    }

    /// Invoke every callback once, in registration order. Callbacks added
    /// during dispatch first run on the next call.
    pub fn fire(&self) {
        let mut running = std::mem::take(&mut *self.entries.borrow_mut());
        for (_, callback) in running.iter_mut() {
            callback();
        }
        let released = std::mem::take(&mut *self.released.borrow_mut());
        running.retain(|(id, _)| !released.contains(id));
        let mut entries = self.entries.borrow_mut();
        running.append(&mut entries);
        *entries = running;
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Height of the scrollable document, used to resolve scroll thresholds.
pub trait DocumentMetrics {
    fn document_height(&self) -> f64;
}

/// Display-side capabilities of the page hosting the viewport.
pub trait ViewportHost: DocumentMetrics {
    /// Invoke `callback` once per rendered frame until the subscription is released.
    fn request_frames(&self, callback: HostCallback) -> Subscription;

    fn on_scroll(&self, callback: HostCallback) -> Subscription;

    fn on_resize(&self, callback: HostCallback) -> Subscription;

    fn viewport_width(&self) -> f64;

    /// `None` when the hero element is not in the document.
    fn hero_geometry(&self) -> Option<ElementGeometry>;

    fn scroll_y(&self) -> f64;
}
