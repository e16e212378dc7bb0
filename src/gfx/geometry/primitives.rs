//! # Primitive Shape Generation
//!
//! Functions that turn a handful of shape parameters into triangles. All
//! shapes are Y-up with counter-clockwise outward faces.

use super::GeometryData;
use std::f32::consts::{FRAC_PI_2, PI};

/// Corners of the default box, a 2x2x2 cube centred at the origin
pub const UNIT_BOX_CORNERS: [[f32; 3]; 8] = [
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Faces of the box as indices into the corner list (outward, counter-clockwise)
const BOX_FACES: [[usize; 4]; 6] = [
    [3, 2, 1, 0],
    [6, 7, 2, 3],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [2, 7, 5, 1],
    [6, 3, 0, 4],
];

/// A coloured line segment, used for the axes and light direction markers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub color: [f32; 3],
}

/// Generate a box from its eight corners (see [`UNIT_BOX_CORNERS`] for the order).
///
/// Each face gets its own four vertices so normals stay flat, even after the
/// corners have been sheared.
pub fn generate_box(corners: &[[f32; 3]; 8]) -> GeometryData {
    let mut data = GeometryData::new();
    for face in BOX_FACES {
        data.push_flat_quad(face.map(|i| corners[i]));
    }
    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    generate_sphere_band(radius, longitude_segments, latitude_segments, PI)
}

/// Generate the upper half of a UV sphere (dome over the XZ plane)
pub fn generate_half_sphere(radius: f32, slices: u32, stacks: u32) -> GeometryData {
    generate_sphere_band(radius, slices, stacks, FRAC_PI_2)
}

/// Sphere surface from the north pole down to polar angle `max_theta`
fn generate_sphere_band(
    radius: f32,
    longitude_segments: u32,
    latitude_segments: u32,
    max_theta: f32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * max_theta / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
            data.tex_coords
                .push([long as f32 / long_segs as f32, lat as f32 / lat_segs as f32]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Generate a cone with its base disc on the XZ plane and apex at `(0, height, 0)`
pub fn generate_cone(base_radius: f32, height: f32, slices: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let slices = slices.max(3);
    let ring = ring_points(base_radius, 0.0, slices);
    let apex = [0.0, height, 0.0];
    let center = [0.0, 0.0, 0.0];

    for i in 0..ring.len() {
        let current = ring[i];
        let next = ring[(i + 1) % ring.len()];
        data.push_flat_triangle(apex, next, current);
        data.push_flat_triangle(center, current, next);
    }

    data
}

/// Generate a cylinder standing on the XZ plane, from `y = 0` to `y = height`
pub fn generate_cylinder(radius: f32, height: f32, slices: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = slices.max(3);

    // Side: shared seam column so texture coordinates wrap cleanly
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let u = i as f32 / segs as f32;

        data.vertices.push([radius * cos_a, 0.0, radius * sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([radius * cos_a, height, radius * sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;

        data.indices.extend_from_slice(&[bottom, top, next_bottom]);
        data.indices.extend_from_slice(&[top, next_top, next_bottom]);
    }

    // Caps
    let bottom_ring = ring_points(radius, 0.0, segs);
    let top_ring = ring_points(radius, height, segs);
    for i in 0..segs as usize {
        let next = (i + 1) % segs as usize;
        data.push_flat_triangle([0.0, 0.0, 0.0], bottom_ring[i], bottom_ring[next]);
        data.push_flat_triangle([0.0, height, 0.0], top_ring[next], top_ring[i]);
    }

    data
}

/// Generate the square pyramid: base corners at `(±1, 0, ±1)`, apex at `(0, 2, 0)`
pub fn generate_pyramid() -> GeometryData {
    let mut data = GeometryData::new();

    let apex = [0.0, 2.0, 0.0];
    let front_left = [-1.0, 0.0, 1.0];
    let front_right = [1.0, 0.0, 1.0];
    let back_right = [1.0, 0.0, -1.0];
    let back_left = [-1.0, 0.0, -1.0];

    data.push_flat_triangle(apex, front_left, front_right);
    data.push_flat_triangle(apex, front_right, back_right);
    data.push_flat_triangle(apex, back_right, back_left);
    data.push_flat_triangle(apex, back_left, front_left);
    data.push_flat_quad([front_left, back_left, back_right, front_right]);

    data
}

/// Red/green/blue axis lines from `-extent` to `extent` with unit tick marks
pub fn generate_axes(extent: i32) -> Vec<LineSegment> {
    const RED: [f32; 3] = [1.0, 0.0, 0.0];
    const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
    const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

    let e = extent as f32;
    let mut lines = vec![
        LineSegment { from: [-e, 0.0, 0.0], to: [e, 0.0, 0.0], color: RED },
        LineSegment { from: [0.0, -e, 0.0], to: [0.0, e, 0.0], color: GREEN },
        LineSegment { from: [0.0, 0.0, -e], to: [0.0, 0.0, e], color: BLUE },
    ];

    for i in (-extent..=extent).filter(|&i| i != 0) {
        let t = i as f32;
        lines.push(LineSegment { from: [t, 0.1, 0.0], to: [t, -0.1, 0.0], color: RED });
        lines.push(LineSegment { from: [0.1, t, 0.0], to: [-0.1, t, 0.0], color: GREEN });
        lines.push(LineSegment { from: [0.0, 0.1, t], to: [0.0, -0.1, t], color: BLUE });
    }

    lines
}

fn ring_points(radius: f32, y: f32, slices: u32) -> Vec<[f32; 3]> {
    (0..slices)
        .map(|i| {
            let angle = i as f32 * 2.0 * PI / slices as f32;
            [radius * angle.cos(), y, radius * angle.sin()]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(tri: &[[f32; 3]; 3]) -> [f32; 3] {
        let mut c = [0.0; 3];
        for p in tri {
            for i in 0..3 {
                c[i] += p[i] / 3.0;
            }
        }
        c
    }

    #[test]
    fn box_faces_point_outward() {
        let data = generate_box(&UNIT_BOX_CORNERS);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);

        for (tri_index, tri) in data.triangles().enumerate() {
            let normal = data.normals[data.indices[tri_index * 3] as usize];
            let c = centroid(&tri);
            let dot = normal[0] * c[0] + normal[1] * c[1] + normal[2] * c[2];
            assert!(dot > 0.0, "face {tri_index} points inward");
        }
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let sphere = generate_sphere(2.0, 8, 6);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn half_sphere_stays_above_ground() {
        let dome = generate_half_sphere(1.0, 12, 6);
        assert!(dome.vertices.iter().all(|v| v[1] >= -1e-5));
    }

    #[test]
    fn cone_and_cylinder_bounds_match_parameters() {
        let (min, max) = generate_cone(1.0, 2.0, 20).bounds().unwrap();
        assert!((max[1] - 2.0).abs() < 1e-6);
        assert!(min[1].abs() < 1e-6);

        let (min, max) = generate_cylinder(0.5, 3.0, 16).bounds().unwrap();
        assert!((max[1] - 3.0).abs() < 1e-6);
        assert!((max[0] - 0.5).abs() < 1e-6);
        assert!((min[0] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn pyramid_has_four_sides_and_a_base() {
        let pyramid = generate_pyramid();
        assert_eq!(pyramid.triangle_count(), 6);
        let (_, max) = pyramid.bounds().unwrap();
        assert_eq!(max[1], 2.0);
    }

    #[test]
    fn axes_have_ticks_on_every_unit() {
        let axes = generate_axes(10);
        assert_eq!(axes.len(), 3 + 20 * 3);
    }
}
