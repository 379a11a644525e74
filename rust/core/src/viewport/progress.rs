// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::ElementGeometry;

/// Normalized scroll position through the hero section.
///
/// Recomputed from geometry on demand, never accumulated or smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollFrame {
    /// In `[0, 1]`.
    pub progress: f64,
}

impl ScrollFrame {
    /// `clamp(-top, 0, height) / height`, treating a zero height as 1.
    pub fn from_geometry(geometry: ElementGeometry) -> Self {
        let height = if geometry.height.is_finite() && geometry.height > 0.0 {
            geometry.height
        } else {
            1.0
        };
        // f64::max drops NaN, so a garbage top reads as "not scrolled".
        let traveled = (-geometry.top).max(0.0).min(height);
        Self {
            progress: traveled / height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_progress_clamps() {
        assert_eq!(ScrollFrame::from_geometry(ElementGeometry::new(120.0, 800.0)).progress, 0.0);
        assert_relative_eq!(ScrollFrame::from_geometry(ElementGeometry::new(-200.0, 800.0)).progress, 0.25);
        assert_eq!(ScrollFrame::from_geometry(ElementGeometry::new(-5000.0, 800.0)).progress, 1.0);
    }

    #[test]
    fn test_zero_height_is_one() {
        let frame = ScrollFrame::from_geometry(ElementGeometry::new(-0.5, 0.0));
        assert_relative_eq!(frame.progress, 0.5);
        let frame = ScrollFrame::from_geometry(ElementGeometry::new(-10.0, 0.0));
        assert_eq!(frame.progress, 1.0);
    }

    #[test]
    fn test_nan_top() {
        let frame = ScrollFrame::from_geometry(ElementGeometry::new(f64::NAN, 800.0));
        assert_eq!(frame.progress, 0.0);
    }
}
