//! Planar projected shadows.

use cgmath::{Matrix4, Vector4};

/// Height of the ground plane shadows are flattened onto, just under the
/// axes so the two do not z-fight.
pub const SHADOW_PLANE_Y: f32 = -0.01;

/// Matrix that squashes geometry onto the plane `y = plane_y` along rays from
/// a point light at `light`.
pub fn planar_shadow_matrix(light: [f32; 3], plane_y: f32) -> Matrix4<f32> {
    let plane = Vector4::new(0.0, 1.0, 0.0, -plane_y);
    let light = Vector4::new(light[0], light[1], light[2], 1.0);
    let dot = plane.x * light.x + plane.y * light.y + plane.z * light.z + plane.w * light.w;

    let column = |j: usize| {
        let mut col = -light * plane[j];
        col[j] += dot;
        col
    };
    Matrix4::from_cols(column(0), column(1), column(2), column(3))
}
