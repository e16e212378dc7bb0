//! Render-mode [`GraphicsContext`]: records draw calls as baked vertices.

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Transform, Vector3};

use crate::gfx::context::{GraphicsContext, MaterialState};
use crate::gfx::geometry::{GeometryData, LineSegment};
use crate::gfx::scene::Vertex3D;

/// Everything one viewport draws in a frame, positions in eye space
#[derive(Debug, Clone, Default)]
pub struct RecordedFrame {
    pub triangles: Vec<Vertex3D>,
    pub indices: Vec<u32>,
    /// Line list, two vertices per segment
    pub lines: Vec<Vertex3D>,
}

impl RecordedFrame {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.indices.clear();
        self.lines.clear();
    }
}

/// Applies the model-view matrix on the CPU and bakes material colours into
/// the vertices, so the GPU side needs a single projection uniform.
pub struct FrameRecorder {
    modelview: Matrix4<f32>,
    stack: Vec<Matrix4<f32>>,
    material: MaterialState,
    frame: RecordedFrame,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self {
            modelview: Matrix4::identity(),
            stack: Vec::new(),
            material: MaterialState::default(),
            frame: RecordedFrame::default(),
        }
    }

    pub fn frame(&self) -> &RecordedFrame {
        &self.frame
    }

    /// Returns the recorded frame and resets the recorder for the next one.
    pub fn finish(&mut self) -> RecordedFrame {
        self.modelview = Matrix4::identity();
        self.stack.clear();
        self.material = MaterialState::default();
        std::mem::take(&mut self.frame)
    }

    fn color(&self) -> [f32; 4] {
        let [r, g, b] = self.material.color;
        [r, g, b, if self.material.lit { 1.0 } else { 0.0 }]
    }

    fn normal_matrix(&self) -> Matrix3<f32> {
        let m = &self.modelview;
        let upper = Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate());
        upper
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or(upper)
    }
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext for FrameRecorder {
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

    fn load_name(&mut self, _name: u32) {}

    fn set_material(&mut self, material: MaterialState) {
        self.material = material;
    }

    fn draw_geometry(&mut self, geometry: &GeometryData) {
        let normal_matrix = self.normal_matrix();
        let color = self.color();
        let base = self.frame.triangles.len() as u32;

        for (i, p) in geometry.vertices.iter().enumerate() {
            let position = self.modelview.transform_point(Point3::from(*p));
            let n = geometry.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
            let normal = normal_matrix * Vector3::from(n);
            let normal = if normal.magnitude2() > f32::EPSILON {
                normal.normalize()
            } else {
                Vector3::unit_y()
            };
            self.frame.triangles.push(Vertex3D {
                position: position.into(),
                normal: normal.into(),
                color,
            });
        }
        self.frame
            .indices
            .extend(geometry.indices.iter().map(|i| base + i));
    }

    fn draw_lines(&mut self, lines: &[LineSegment]) {
        for line in lines {
            let [r, g, b] = line.color;
            for p in [line.from, line.to] {
                let position = self.modelview.transform_point(Point3::from(p));
                self.frame.lines.push(Vertex3D {
                    position: position.into(),
                    normal: [0.0, 1.0, 0.0],
                    color: [r, g, b, 0.0],
                });
            }
        }
    }
}
