//! Position / rotation / scale triple owned by every scene object.

use cgmath::{Deg, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// One of the three coordinate axes.
///
/// Input code historically addresses axes with unit-vector tags such as
/// `(1, 0, 0)`; [`Axis::from_unit`] accepts exactly those three tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Maps `(1,0,0)`, `(0,1,0)` and `(0,0,1)` to an axis; anything else is `None`.
    pub fn from_unit(tag: [i32; 3]) -> Option<Self> {
        match tag {
            [1, 0, 0] => Some(Axis::X),
            [0, 1, 0] => Some(Axis::Y),
            [0, 0, 1] => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    /// Euler angles in degrees, applied X then Y then Z
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    pub fn new(position: [f32; 3], rotation: [f32; 3], scale: [f32; 3]) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn rotate(&mut self, degrees: f32, axis: Axis) {
        self.rotation[axis.index()] += degrees;
    }

    pub fn translate(&mut self, distance: f32, axis: Axis) {
        self.position[axis.index()] += distance;
    }

    /// Adds `delta` to one scale component, never going below `floor`.
    pub fn scale(&mut self, delta: f32, axis: Axis, floor: f32) {
        let i = axis.index();
        self.scale[i] = (self.scale[i] + delta).max(floor);
    }

    pub fn scale_uniform(&mut self, delta: f32, floor: f32) {
        for axis in Axis::ALL {
            self.scale(delta, axis, floor);
        }
    }

    /// Raises every scale component to at least `floor`.
    pub fn clamp_scale(&mut self, floor: f32) {
        for s in self.scale.iter_mut() {
            if !(*s >= floor) {
                *s = floor;
            }
        }
    }

    /// Rotation folded into `[0, 360)` for display. The stored angles are left alone.
    pub fn display_rotation(&self) -> [f32; 3] {
        self.rotation.map(|angle| angle.rem_euclid(360.0))
    }

    /// `T * Rx * Ry * Rz * S`
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let [x, y, z] = self.position;
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;

        Matrix4::from_translation(Vector3::new(x, y, z))
            * Matrix4::from_angle_x(Deg(rx))
            * Matrix4::from_angle_y(Deg(ry))
            * Matrix4::from_angle_z(Deg(rz))
            * Matrix4::from_nonuniform_scale(sx, sy, sz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Point3, Transform as _};
    use rand::Rng;

    #[test]
    fn unit_tags_map_to_axes() {
        assert_eq!(Axis::from_unit([1, 0, 0]), Some(Axis::X));
        assert_eq!(Axis::from_unit([0, 1, 0]), Some(Axis::Y));
        assert_eq!(Axis::from_unit([0, 0, 1]), Some(Axis::Z));
        assert_eq!(Axis::from_unit([1, 1, 0]), None);
        assert_eq!(Axis::from_unit([0, 0, 0]), None);
    }

    #[test]
    fn deltas_touch_only_one_component() {
        let mut t = Transform::default();
        t.rotate(5.0, Axis::Y);
        t.translate(-0.1, Axis::Z);
        t.scale(0.05, Axis::X, 0.1);

        assert_eq!(t.rotation, [0.0, 5.0, 0.0]);
        assert_eq!(t.position, [0.0, 0.0, -0.1]);
        assert_relative_eq!(t.scale[0], 1.05);
        assert_eq!(&t.scale[1..], &[1.0, 1.0]);
    }

    #[test]
    fn scale_never_drops_below_floor() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let floor = rng.random_range(0.05..=0.1);
            let mut t = Transform::default();
            for _ in 0..20 {
                let delta = rng.random_range(-3.0..3.0);
                let axis = Axis::ALL[rng.random_range(0..3)];
                t.scale(delta, axis, floor);
                assert!(t.scale.iter().all(|&s| s >= floor), "{:?} < {}", t.scale, floor);
            }
        }
    }

    #[test]
    fn rotation_accumulates_without_wrapping() {
        let mut t = Transform::default();
        for _ in 0..80 {
            t.rotate(5.0, Axis::X);
        }
        assert_eq!(t.rotation[0], 400.0);
        assert_relative_eq!(t.display_rotation()[0], 40.0);

        t.rotate(-450.0, Axis::X);
        assert_relative_eq!(t.display_rotation()[0], 310.0);
    }

    #[test]
    fn model_matrix_applies_scale_before_translation() {
        let t = Transform::new([1.0, 2.0, 3.0], [0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        let p = t.model_matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 3.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 3.0);
    }

    #[test]
    fn clamp_scale_repairs_loaded_values() {
        let mut t = Transform::new([0.0; 3], [0.0; 3], [0.0, -1.0, 2.0]);
        t.clamp_scale(0.1);
        assert_eq!(t.scale, [0.1, 0.1, 2.0]);
    }
}
