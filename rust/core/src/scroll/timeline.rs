// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ScrollTrigger, TriggerSpec};

/// Animated property. `X` and `Y` are percentages of the element size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Property {
    X,
    Y,
    Scale,
    Opacity,
}

/// Linear interpolation of one property over trigger progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub property: Property,
    pub from: f64,
    pub to: f64,
}

impl Track {
    pub fn value_at(&self, progress: f64) -> f64 {
        self.from + (self.to - self.from) * progress
    }
}

/// Trigger plus the property tracks it scrubs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTimeline {
    name: &'static str,
    trigger: ScrollTrigger,
    tracks: Vec<Track>,
}

impl ScrollTimeline {
    pub fn new(name: &'static str, spec: TriggerSpec) -> Self {
        Self {
            name,
            trigger: ScrollTrigger::new(spec),
            tracks: Vec::new(),
        }
    }

    pub fn track(mut self, property: Property, from: f64, to: f64) -> Self {
        self.tracks.push(Track { property, from, to });
        self
    }

    pub fn refresh(&mut self, document_height: f64) {
        self.trigger.refresh(document_height);
    }

    /// Every property value at `scroll_y`, in track order.
    pub fn sample(&self, scroll_y: f64) -> Vec<(Property, f64)> {
        let progress = self.trigger.progress_at(scroll_y);
        self.tracks
            .iter()
            .map(|track| (track.property, track.value_at(progress)))
            .collect()
    }

    pub fn value_at(&self, property: Property, scroll_y: f64) -> Option<f64> {
        let progress = self.trigger.progress_at(scroll_y);
        self.tracks
            .iter()
            .find(|track| track.property == property)
            .map(|track| track.value_at(progress))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
