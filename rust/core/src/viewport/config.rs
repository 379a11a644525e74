// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-breakpoint base transforms for the hero model.

use nalgebra::Vector3;

/// Base transform the scroll mapping starts from.
///
/// Selected once per mount from the viewport breakpoint and never mutated by
/// the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ViewportBaseConfig {
    pub scale: f64,
    pub position: Vector3<f64>,
    /// Extra relative scale reached at progress 1.
    pub zoom_range: f64,
}

impl ViewportBaseConfig {
    pub fn new(scale: f64, position: Vector3<f64>, zoom_range: f64) -> Self {
        Self {
            scale,
            position,
            zoom_range,
        }
    }

    /// Heavily zoomed-in default that keeps the model's edges off screen.
    pub fn hero() -> Self {
        Self::new(40.0, Vector3::new(-55.0, -65.0, 1.5), 0.6)
    }
}

impl Default for ViewportBaseConfig {
    fn default() -> Self {
        Self::hero()
    }
}

/// Responsive breakpoints, by viewport width in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Breakpoint {
    /// width <= 480
    SmallMobile,
    /// width <= 768
    Mobile,
    /// width <= 1024
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn from_width(width: f64) -> Self {
        if width <= 480.0 {
            Breakpoint::SmallMobile
        } else if width <= 768.0 {
            Breakpoint::Mobile
        } else if width <= 1024.0 {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    /// Phones and small tablets (< 768px) get the gentler scroll drift presets.
    pub fn is_narrow(width: f64) -> bool {
        width < 768.0
    }
}

/// Base configuration for every breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BreakpointTable {
    pub small_mobile: ViewportBaseConfig,
    pub mobile: ViewportBaseConfig,
    pub tablet: ViewportBaseConfig,
    pub desktop: ViewportBaseConfig,
}

impl BreakpointTable {
    /// Same base for every breakpoint.
    pub fn uniform(base: ViewportBaseConfig) -> Self {
        Self {
            small_mobile: base,
            mobile: base,
            tablet: base,
            desktop: base,
        }
    }

    pub fn get(&self, breakpoint: Breakpoint) -> ViewportBaseConfig {
        match breakpoint {
            Breakpoint::SmallMobile => self.small_mobile,
            Breakpoint::Mobile => self.mobile,
            Breakpoint::Tablet => self.tablet,
            Breakpoint::Desktop => self.desktop,
        }
    }

    pub fn set(&mut self, breakpoint: Breakpoint, base: ViewportBaseConfig) {
        match breakpoint {
            Breakpoint::SmallMobile => self.small_mobile = base,
            Breakpoint::Mobile => self.mobile = base,
            Breakpoint::Tablet => self.tablet = base,
            Breakpoint::Desktop => self.desktop = base,
        }
    }

    pub fn select(&self, viewport_width: f64) -> ViewportBaseConfig {
        self.get(Breakpoint::from_width(viewport_width))
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::uniform(ViewportBaseConfig::hero())
    }
}

/// Fixed transform of the non-interactive ambient instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AmbientTransform {
    pub scale: f64,
    pub position: Vector3<f64>,
}

impl Default for AmbientTransform {
    fn default() -> Self {
        Self {
            scale: 35.0,
            position: Vector3::new(-50.0, -60.0, 1.5),
        }
    }
}

/// Everything the hero and ambient viewports need besides the host.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ViewportSettings {
    pub breakpoints: BreakpointTable,
    /// World units the model drifts down over the full hero scroll.
    pub vertical_drift: f64,
    pub ambient: AmbientTransform,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            breakpoints: BreakpointTable::default(),
            vertical_drift: 3.5,
            ambient: AmbientTransform::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_edges() {
        assert_eq!(Breakpoint::from_width(320.0), Breakpoint::SmallMobile);
        assert_eq!(Breakpoint::from_width(480.0), Breakpoint::SmallMobile);
        assert_eq!(Breakpoint::from_width(481.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(768.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(1024.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1440.0), Breakpoint::Desktop);
    }

    #[test]
    fn test_table_select_uses_override() {
        let mut table = BreakpointTable::default();
        let phone = ViewportBaseConfig::new(55.0, Vector3::new(-22.0, -32.0, 1.5), 0.7);
        table.set(Breakpoint::SmallMobile, phone);

        assert_eq!(table.select(375.0), phone);
        assert_eq!(table.select(1920.0), ViewportBaseConfig::hero());
    }
}
