//! # Procedural Geometry Generation
//!
//! Every scene object hands the renderer and the picking pass a [`GeometryData`]
//! built deterministically from a few parameters (radius, slices, ...). Objects
//! never persist their triangles; saving the parameters is enough to rebuild the
//! exact same mesh on load.
//!
//! ## Supported Shapes
//!
//! - **Box**: eight corners, so a sheared cube is still a box topologically
//! - **Sphere**, **Half sphere**: UV spheres
//! - **Cone**, **Cylinder**: Y-up, base on the XZ plane
//! - **Pyramid**: square base, apex at `y = 2`
//! - **OBJ meshes** through [`obj::load_obj`]

pub mod obj;
pub mod primitives;

pub use primitives::*;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as three corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Appends a flat-shaded triangle with its own three vertices.
    pub(crate) fn push_flat_triangle(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
        let normal = face_normal(a, b, c);
        let base = self.vertices.len() as u32;
        for (p, uv) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (c, [0.5, 1.0])] {
            self.vertices.push(p);
            self.normals.push(normal);
            self.tex_coords.push(uv);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Appends a flat-shaded quad (two triangles) with its own four vertices.
    pub(crate) fn push_flat_quad(&mut self, corners: [[f32; 3]; 4]) {
        let normal = face_normal(corners[0], corners[1], corners[2]);
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for (p, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(p);
            self.normals.push(normal);
            self.tex_coords.push(uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Axis-aligned bounds of the vertex positions, `None` when empty.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().skip(1).fold((first, first), |(mut min, mut max), v| {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
            (min, max)
        }))
    }
}

/// Unit normal of a counter-clockwise triangle, `+Y` for degenerate input.
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > f32::EPSILON {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}
