//! Select-mode rendering on the CPU.

use cgmath::{Matrix4, SquareMatrix, Vector4};

use super::pick_matrix;
use crate::gfx::context::{
    GraphicsContext, HitRecord, MaterialState, PickRegion, SelectOutcome, SelectionContext,
};
use crate::gfx::geometry::{GeometryData, LineSegment};

const MIN_W: f32 = 1e-6;

/// Runs draw calls in select mode and reports which names covered the pick
/// window centre, with the window-space depth range each name spanned.
///
/// Only triangles are hit-tested; lines never produce hits. Outside
/// `begin_select`/`end_select` every draw call is ignored.
pub struct SoftwareSelector {
    active: bool,
    pick: Matrix4<f32>,
    projection: Matrix4<f32>,
    modelview: Matrix4<f32>,
    stack: Vec<Matrix4<f32>>,
    name: u32,
    capacity: usize,
    used: usize,
    pending: Option<HitRecord>,
    outcome: SelectOutcome,
}

impl SoftwareSelector {
    pub fn new() -> Self {
        Self {
            active: false,
            pick: Matrix4::identity(),
            projection: Matrix4::identity(),
            modelview: Matrix4::identity(),
            stack: Vec::new(),
            name: 0,
            capacity: 0,
            used: 0,
            pending: None,
            outcome: SelectOutcome::default(),
        }
    }

    pub fn is_selecting(&self) -> bool {
        self.active
    }

    fn flush(&mut self) {
        let Some(record) = self.pending.take() else {
            return;
        };
        if self.used + record.word_len() > self.capacity {
            self.outcome.overflowed = true;
            return;
        }
        self.used += record.word_len();
        self.outcome.hits.push(record);
    }

    fn record_depth(&mut self, depth: f32) {
        match &mut self.pending {
            Some(record) => {
                record.min_depth = record.min_depth.min(depth);
                record.max_depth = record.max_depth.max(depth);
            }
            None => {
                self.pending = Some(HitRecord {
                    min_depth: depth,
                    max_depth: depth,
                    names: vec![self.name],
                })
            }
        }
    }
}

impl Default for SoftwareSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Clips a clip-space triangle to the near plane (`z >= -w`).
///
/// Returns the visible part as a convex polygon of 0, 3 or 4 vertices, the
/// same part the rasteriser keeps for geometry reaching behind the eye.
fn clip_near(triangle: [Vector4<f32>; 3]) -> Vec<Vector4<f32>> {
    let mut polygon = Vec::with_capacity(4);
    for i in 0..3 {
        let a = triangle[i];
        let b = triangle[(i + 1) % 3];
        let (da, db) = (a.z + a.w, b.z + b.w);
        if da >= 0.0 {
            polygon.push(a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            polygon.push(a + (b - a) * (da / (da - db)));
        }
    }
    polygon
}

/// Window depth at NDC `(0, 0)` if the projected triangle covers it.
fn centre_depth(ndc: [[f32; 3]; 3]) -> Option<f32> {
    let edge = |a: [f32; 3], b: [f32; 3]| {
        // Edge function of the origin against a->b
        a[0] * b[1] - a[1] * b[0]
    };
    let area = (ndc[1][0] - ndc[0][0]) * (ndc[2][1] - ndc[0][1])
        - (ndc[1][1] - ndc[0][1]) * (ndc[2][0] - ndc[0][0]);
    if area.abs() <= f32::EPSILON {
        return None;
    }

    let w0 = edge(ndc[1], ndc[2]) / area;
    let w1 = edge(ndc[2], ndc[0]) / area;
    let w2 = edge(ndc[0], ndc[1]) / area;
    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
        return None;
    }

    let z = w0 * ndc[0][2] + w1 * ndc[1][2] + w2 * ndc[2][2];
    let depth = (z + 1.0) * 0.5;
    (0.0..=1.0).contains(&depth).then_some(depth)
}

impl GraphicsContext for SoftwareSelector {
    fn push_matrix(&mut self) {
        self.stack.push(self.modelview);
    }

    fn pop_matrix(&mut self) {
        if let Some(m) = self.stack.pop() {
            self.modelview = m;
        }
    }

    fn mul_matrix(&mut self, matrix: Matrix4<f32>) {
        self.modelview = self.modelview * matrix;
    }

    fn load_name(&mut self, name: u32) {
        if name != self.name {
            self.flush();
            self.name = name;
        }
    }

    fn set_material(&mut self, _material: MaterialState) {}

    fn draw_geometry(&mut self, geometry: &GeometryData) {
        if !self.active {
            return;
        }
        let clip = self.pick * self.projection * self.modelview;

        for tri in geometry.triangles() {
            let polygon = clip_near(tri.map(|p| clip * Vector4::new(p[0], p[1], p[2], 1.0)));
            if polygon.len() < 3 || polygon.iter().any(|v| v.w <= MIN_W) {
                continue;
            }
            let ndc: Vec<[f32; 3]> = polygon
                .iter()
                .map(|v| [v.x / v.w, v.y / v.w, v.z / v.w])
                .collect();

            let hit = (1..ndc.len() - 1)
                .find_map(|i| centre_depth([ndc[0], ndc[i], ndc[i + 1]]));
            if let Some(depth) = hit {
                self.record_depth(depth);
            }
        }
    }

    fn draw_lines(&mut self, _lines: &[LineSegment]) {}
}

impl SelectionContext for SoftwareSelector {
    fn begin_select(&mut self, region: PickRegion, capacity: usize) {
        self.active = true;
        self.pick = pick_matrix(&region);
        self.projection = Matrix4::identity();
        self.modelview = Matrix4::identity();
        self.stack.clear();
        self.name = 0;
        self.capacity = capacity;
        self.used = 0;
        self.pending = None;
        self.outcome = SelectOutcome::default();
    }

    fn set_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection;
    }

    fn end_select(&mut self) -> SelectOutcome {
        self.flush();
        self.active = false;
        self.stack.clear();
        std::mem::take(&mut self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> PickRegion {
        PickRegion {
            center: [50.0, 50.0],
            size: [1.0, 1.0],
            viewport: [0.0, 0.0, 100.0, 100.0],
        }
    }

    fn quad_at(z: f32, offset_x: f32) -> GeometryData {
        let mut data = GeometryData::new();
        data.push_flat_quad([
            [-0.5 + offset_x, -0.5, z],
            [0.5 + offset_x, -0.5, z],
            [0.5 + offset_x, 0.5, z],
            [-0.5 + offset_x, 0.5, z],
        ]);
        data
    }

    #[test]
    fn records_one_hit_per_name() {
        let mut selector = SoftwareSelector::new();
        selector.begin_select(region(), 64);

        selector.load_name(1);
        selector.draw_geometry(&quad_at(0.5, 0.0));
        selector.load_name(2);
        selector.draw_geometry(&quad_at(-0.5, 0.0));
        selector.load_name(3);
        selector.draw_geometry(&quad_at(0.0, 3.0));

        let outcome = selector.end_select();
        assert!(!outcome.overflowed);
        assert_eq!(outcome.hits.len(), 2);
        assert_eq!(outcome.hits[0].names, vec![1]);
        assert!((outcome.hits[0].min_depth - 0.75).abs() < 1e-6);
        assert_eq!(outcome.hits[1].names, vec![2]);
        assert!((outcome.hits[1].min_depth - 0.25).abs() < 1e-6);
    }

    #[test]
    fn overflow_is_flagged_not_truncated() {
        let mut selector = SoftwareSelector::new();
        selector.begin_select(region(), 5);

        selector.load_name(1);
        selector.draw_geometry(&quad_at(0.0, 0.0));
        selector.load_name(2);
        selector.draw_geometry(&quad_at(0.1, 0.0));

        let outcome = selector.end_select();
        assert_eq!(outcome.hits.len(), 1);
        assert!(outcome.overflowed);
    }

    #[test]
    fn geometry_outside_depth_range_is_ignored() {
        let mut selector = SoftwareSelector::new();
        selector.begin_select(region(), 16);
        selector.load_name(1);
        selector.draw_geometry(&quad_at(1.5, 0.0));
        assert!(selector.end_select().hits.is_empty());
    }

    #[test]
    fn floor_reaching_behind_the_eye_is_clipped_not_dropped() {
        let mut selector = SoftwareSelector::new();
        // Below the centre of the view, looking down -Z from the origin
        selector.begin_select(
            PickRegion {
                center: [50.0, 20.0],
                ..region()
            },
            16,
        );
        selector.set_projection(cgmath::perspective(cgmath::Deg(45.0), 1.0, 0.1, 100.0));

        let mut floor = GeometryData::new();
        floor.push_flat_quad([
            [-50.0, -1.0, 5.0],
            [50.0, -1.0, 5.0],
            [50.0, -1.0, -50.0],
            [-50.0, -1.0, -50.0],
        ]);
        selector.load_name(1);
        selector.draw_geometry(&floor);

        let outcome = selector.end_select();
        assert_eq!(outcome.hits.len(), 1);
        let depth = outcome.hits[0].min_depth;
        assert!(depth > 0.0 && depth < 1.0, "{depth}");
    }

    #[test]
    fn triangle_entirely_behind_the_eye_is_ignored() {
        let mut selector = SoftwareSelector::new();
        selector.begin_select(region(), 16);
        selector.set_projection(cgmath::perspective(cgmath::Deg(45.0), 1.0, 0.1, 100.0));

        selector.load_name(1);
        selector.draw_geometry(&quad_at(5.0, 0.0));
        assert!(selector.end_select().hits.is_empty());
    }

    #[test]
    fn draws_outside_select_mode_are_ignored() {
        let mut selector = SoftwareSelector::new();
        selector.load_name(1);
        selector.draw_geometry(&quad_at(0.0, 0.0));
        selector.begin_select(region(), 16);
        assert!(selector.end_select().hits.is_empty());
    }
}
