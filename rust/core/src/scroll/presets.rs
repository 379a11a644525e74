// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timelines used by the landing page.

use super::{Property, ScrollTimeline, TriggerSpec};
use crate::viewport::Breakpoint;

/// Hero planet drifts right and up while fading out over the first 60%.
pub fn hero_planet_drift(viewport_width: f64) -> ScrollTimeline {
    let (x, y) = if Breakpoint::is_narrow(viewport_width) {
        (5.0, -15.0)
    } else {
        (10.0, -25.0)
    };
    ScrollTimeline::new("hero-planet", TriggerSpec::from_top(0.6, 0.5))
        .track(Property::X, 0.0, x)
        .track(Property::Y, 0.0, y)
        .track(Property::Opacity, 1.0, 0.0)
}

pub fn hero_container_fade() -> ScrollTimeline {
    ScrollTimeline::new("hero-container", TriggerSpec::from_top(0.4, 0.5))
        .track(Property::Opacity, 1.0, 0.0)
}

/// Background planet layer grows slightly and rises as it fades.
pub fn planet_layer_zoom() -> ScrollTimeline {
    ScrollTimeline::new("planet-layer", TriggerSpec::from_top(0.8, 0.8))
        .track(Property::Scale, 1.0, 1.15)
        .track(Property::Y, 0.0, -8.0)
        .track(Property::Opacity, 1.0, 0.0)
}

pub fn planet_layer_fade() -> ScrollTimeline {
    ScrollTimeline::new("planet-layer-container", TriggerSpec::from_top(0.5, 0.5))
        .track(Property::Opacity, 1.0, 0.0)
}

/// Full-page black overlay between 40% and 70% of the document.
pub fn black_overlay() -> ScrollTimeline {
    ScrollTimeline::new("black-overlay", TriggerSpec::new(0.4, 0.7, 1.0))
        .track(Property::Opacity, 0.0, 1.0)
}
