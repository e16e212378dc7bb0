use cgmath::{perspective, Deg, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM: f32 = -20.0;

/// Fixed viewpoints bound to the number keys `1` to `6`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    Front,
    Left,
    Right,
    Back,
    Top,
    Bottom,
}

impl CameraPreset {
    /// Preset for keys 1..=6, in that order.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(CameraPreset::Front),
            2 => Some(CameraPreset::Left),
            3 => Some(CameraPreset::Right),
            4 => Some(CameraPreset::Back),
            5 => Some(CameraPreset::Top),
            6 => Some(CameraPreset::Bottom),
            _ => None,
        }
    }

    /// `(pitch, yaw)` in degrees
    pub fn rotation(self) -> [f32; 2] {
        match self {
            CameraPreset::Front => [0.0, 0.0],
            CameraPreset::Left => [0.0, 90.0],
            CameraPreset::Right => [0.0, -90.0],
            CameraPreset::Back => [0.0, 180.0],
            CameraPreset::Top => [90.0, 0.0],
            CameraPreset::Bottom => [-90.0, 0.0],
        }
    }
}

/// Turntable camera: the world is panned, pushed back by `zoom`, then
/// pitched and yawed around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset
    pub position: [f32; 3],
    /// `(pitch, yaw)` in degrees
    pub rotation: [f32; 2],
    /// Distance along Z, negative pushes the scene away
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0],
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Camera {
    pub fn set_preset(&mut self, preset: CameraPreset) {
        self.position = [0.0, 0.0, 0.0];
        self.zoom = DEFAULT_ZOOM;
        self.rotation = preset.rotation();
    }

    /// Adds mouse deltas (already scaled to degrees) to pitch and yaw.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.rotation[0] += dy;
        self.rotation[1] += dx;
    }

    pub fn pan(&mut self, dx: f32, dy: f32, speed: f32) {
        self.position[0] += dx * speed;
        self.position[1] -= dy * speed;
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom += delta;
    }

    /// `T(x, y, z + zoom) * Rx(pitch) * Ry(yaw)`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let [x, y, z] = self.position;
        let [pitch, yaw] = self.rotation;
        Matrix4::from_translation(Vector3::new(x, y, z + self.zoom))
            * Matrix4::from_angle_x(Deg(pitch))
            * Matrix4::from_angle_y(Deg(yaw))
    }
}

/// Perspective parameters shared by rendering and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 10000.0,
        }
    }
}

impl Projection {
    /// OpenGL-style clip space (`z` in `[-1, 1]`).
    pub fn matrix(&self, aspect: f32) -> Matrix4<f32> {
        perspective(self.fovy, aspect, self.znear, self.zfar)
    }
}

/// Pixel rectangle, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Whether window pixel `(x, y)`, origin top-left, lies inside this
    /// bottom-left-origin rectangle of a `window_height` tall window.
    pub fn contains(&self, x: f32, y: f32, window_height: f32) -> bool {
        let y = window_height - y;
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// 320x180 inset in the top-right corner of a `width` x `height` window
    pub fn overview_inset(width: f32, height: f32) -> Self {
        Self {
            x: width - 330.0,
            y: height - 190.0,
            width: 320.0,
            height: 180.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Point3, Transform};

    #[test]
    fn presets_reset_pan_and_zoom() {
        let mut camera = Camera {
            position: [3.0, -1.0, 2.0],
            rotation: [12.0, 34.0],
            zoom: -7.5,
        };
        camera.set_preset(CameraPreset::Back);
        assert_eq!(camera.position, [0.0, 0.0, 0.0]);
        assert_eq!(camera.rotation, [0.0, 180.0]);
        assert_eq!(camera.zoom, DEFAULT_ZOOM);

        let rotations: Vec<_> = (1..=6)
            .map(|n| CameraPreset::from_number(n).unwrap().rotation())
            .collect();
        assert_eq!(
            rotations,
            vec![[0.0, 0.0], [0.0, 90.0], [0.0, -90.0], [0.0, 180.0], [90.0, 0.0], [-90.0, 0.0]]
        );
        assert_eq!(CameraPreset::from_number(7), None);
    }

    #[test]
    fn origin_sits_zoom_units_in_front() {
        let camera = Camera::default();
        let p = camera.view_matrix().transform_point(Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(p.z, -20.0);
    }

    #[test]
    fn pan_moves_opposite_on_y() {
        let mut camera = Camera::default();
        camera.pan(10.0, 10.0, 0.01);
        assert_relative_eq!(camera.position[0], 0.1);
        assert_relative_eq!(camera.position[1], -0.1);
    }

    #[test]
    fn inset_contains_top_left_pixels() {
        let inset = Viewport::overview_inset(1920.0, 1030.0);
        assert!(inset.contains(1750.0, 100.0, 1030.0));
        assert!(inset.contains(1590.0, 10.0, 1030.0));
        assert!(!inset.contains(1750.0, 195.0, 1030.0));
        assert!(!inset.contains(1000.0, 100.0, 1030.0));
    }

    #[test]
    fn serde_round_trip_is_exact() {
        let camera = Camera {
            position: [0.5, 1.25, 0.0],
            rotation: [30.0, -45.0],
            zoom: -12.5,
        };
        let text = serde_json::to_string(&camera).unwrap();
        let restored: Camera = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, camera);
    }
}
