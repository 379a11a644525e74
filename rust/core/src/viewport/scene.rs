// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use nalgebra::Vector3;

use super::{AmbientTransform, ViewportBaseConfig};

/// Mutable transform node of a loaded scene.
///
/// Implementations wrap whatever the renderer uses for a group; the
/// controllers only ever write absolute values.
pub trait SceneNode {
    /// Uniform scale.
    fn set_scale(&self, scale: f64);

    fn set_position(&self, position: Vector3<f64>);

    /// Euler angles in radians.
    fn set_rotation(&self, rotation: Vector3<f64>);

    fn set_opacity(&self, opacity: f64);

    /// Independent copy with its own transform state.
    fn clone_node(&self) -> Rc<dyn SceneNode>;
}

/// Absolute transform written to a node in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub scale: f64,
    pub position: Vector3<f64>,
    pub rotation: Vector3<f64>,
    pub opacity: f64,
}

impl SceneTransform {
    pub fn apply(&self, node: &dyn SceneNode) {
        node.set_scale(self.scale);
        node.set_position(self.position);
        node.set_rotation(self.rotation);
        node.set_opacity(self.opacity);
    }
}

impl From<AmbientTransform> for SceneTransform {
    fn from(ambient: AmbientTransform) -> Self {
        Self {
            scale: ambient.scale,
            position: ambient.position,
            rotation: Vector3::zeros(),
            opacity: 1.0,
        }
    }
}

/// Hero transform at `progress`.
///
/// Zooms in by up to `zoom_range` and drifts down by `vertical_drift`;
/// rotation stays pinned at zero.
pub fn transform_for(base: &ViewportBaseConfig, progress: f64, vertical_drift: f64) -> SceneTransform {
    let progress = progress.clamp(0.0, 1.0);
    SceneTransform {
        scale: base.scale * (1.0 + progress * base.zoom_range),
        position: Vector3::new(
            base.position.x,
            base.position.y - progress * vertical_drift,
            base.position.z,
        ),
        rotation: Vector3::zeros(),
        opacity: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_form() {
        let base = ViewportBaseConfig::hero();
        let cases = [(0.0, 40.0, -65.0), (0.25, 46.0, -65.875), (0.5, 52.0, -66.75), (1.0, 64.0, -68.5)];
        for (progress, scale, y) in cases {
            let t = transform_for(&base, progress, 3.5);
            assert_relative_eq!(t.scale, scale, epsilon = 1e-9);
            assert_relative_eq!(t.position.y, y, epsilon = 1e-9);
            assert_eq!(t.position.x, -55.0);
            assert_eq!(t.position.z, 1.5);
            assert_eq!(t.rotation, Vector3::zeros());
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        let base = ViewportBaseConfig::hero();
        assert_eq!(transform_for(&base, 3.0, 3.5), transform_for(&base, 1.0, 3.5));
        assert_eq!(transform_for(&base, -1.0, 3.5), transform_for(&base, 0.0, 3.5));
    }

    #[test]
    fn test_ambient_transform() {
        let t = SceneTransform::from(AmbientTransform::default());
        assert_eq!(t.scale, 35.0);
        assert_eq!(t.position, Vector3::new(-50.0, -60.0, 1.5));
        assert_eq!(t.rotation, Vector3::zeros());
    }
}
