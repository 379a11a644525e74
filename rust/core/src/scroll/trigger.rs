// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Where a scroll-linked animation starts and ends.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerSpec {
    /// Fraction of the document height at the viewport top when progress is 0.
    pub start: f64,
    /// Fraction of the document height at the viewport top when progress is 1.
    pub end: f64,
    /// Smoothing, in seconds, applied by the animation collaborator.
    pub scrub: f64,
}

impl TriggerSpec {
    pub fn new(start: f64, end: f64, scrub: f64) -> Self {
        Self { start, end, scrub }
    }

    /// Starts with the document top at the viewport top.
    pub fn from_top(end: f64, scrub: f64) -> Self {
        Self::new(0.0, end, scrub)
    }
}

/// A [`TriggerSpec`] resolved to pixel thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTrigger {
    spec: TriggerSpec,
    start_px: f64,
    end_px: f64,
}

impl ScrollTrigger {
    /// Unmeasured until the first [`refresh`](Self::refresh).
    pub fn new(spec: TriggerSpec) -> Self {
        Self {
            spec,
            start_px: 0.0,
            end_px: 0.0,
        }
    }

    pub fn refresh(&mut self, document_height: f64) {
        let height = document_height.max(0.0);
        self.start_px = self.spec.start * height;
        self.end_px = self.spec.end * height;
    }

    /// Clamped progress at `scroll_y`.
    pub fn progress_at(&self, scroll_y: f64) -> f64 {
        let span = self.end_px - self.start_px;
        if span <= 0.0 {
            return if scroll_y >= self.end_px { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start_px) / span).clamp(0.0, 1.0)
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.start_px, self.end_px)
    }

    pub fn spec(&self) -> TriggerSpec {
        self.spec
    }

    pub fn scrub(&self) -> f64 {
        self.spec.scrub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_between_thresholds() {
        let mut trigger = ScrollTrigger::new(TriggerSpec::new(0.4, 0.7, 1.0));
        trigger.refresh(1000.0);
        assert_eq!(trigger.thresholds(), (400.0, 700.0));
        assert_eq!(trigger.progress_at(100.0), 0.0);
        assert!((trigger.progress_at(550.0) - 0.5).abs() < 1e-12);
        assert_eq!(trigger.progress_at(900.0), 1.0);
    }

    #[test]
    fn test_unmeasured_trigger_is_a_step() {
        let trigger = ScrollTrigger::new(TriggerSpec::from_top(0.6, 0.5));
        assert_eq!(trigger.progress_at(-1.0), 0.0);
        assert_eq!(trigger.progress_at(0.0), 1.0);
    }
}
