//! Scene objects: a [`Transform`], a selection flag and a [`Shape`].
//!
//! Geometry is derived data. Every shape rebuilds its triangles from the few
//! parameters it stores, which is also what gets written to the scene file.

use std::fmt;
use std::path::{Path, PathBuf};

use cgmath::{Deg, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::lights::{LightSlot, LightSource};
use super::transform::{Axis, Transform};
use crate::error::{EditorError, Result};
use crate::gfx::context::{GraphicsContext, MaterialState};
use crate::gfx::geometry::{self, GeometryData, LineSegment, UNIT_BOX_CORNERS};

pub const SELECTED_COLOR: [f32; 3] = [1.0, 0.5, 0.0];
pub const DEFAULT_COLOR: [f32; 3] = [0.5, 0.5, 0.5];
pub const SHADOW_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
const DIRECTION_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// The closed set of object types, keyed by their scene-file tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    #[serde(rename = "cube")]
    Cube,
    #[serde(rename = "sphere")]
    Sphere,
    #[serde(rename = "cone")]
    Cone,
    #[serde(rename = "cylinder")]
    Cylinder,
    #[serde(rename = "halfsphere")]
    HalfSphere,
    #[serde(rename = "pyramid")]
    Pyramid,
    #[serde(rename = "light_sphere")]
    Light,
    #[serde(rename = "mesh")]
    Mesh,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::Cube,
        ObjectKind::Sphere,
        ObjectKind::Cone,
        ObjectKind::Cylinder,
        ObjectKind::HalfSphere,
        ObjectKind::Pyramid,
        ObjectKind::Light,
        ObjectKind::Mesh,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ObjectKind::Cube => "cube",
            ObjectKind::Sphere => "sphere",
            ObjectKind::Cone => "cone",
            ObjectKind::Cylinder => "cylinder",
            ObjectKind::HalfSphere => "halfsphere",
            ObjectKind::Pyramid => "pyramid",
            ObjectKind::Light => "light_sphere",
            ObjectKind::Mesh => "mesh",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Smallest value any scale component may take
    pub fn scale_floor(self) -> f32 {
        match self {
            ObjectKind::Pyramid | ObjectKind::Mesh => 0.05,
            _ => 0.1,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeParams {
    /// Corner positions, only written once the cube has been sheared
    #[serde(skip_serializing_if = "is_unit_box")]
    pub vertices: [[f32; 3]; 8],
}

impl Default for CubeParams {
    fn default() -> Self {
        Self {
            vertices: UNIT_BOX_CORNERS,
        }
    }
}

fn is_unit_box(vertices: &[[f32; 3]; 8]) -> bool {
    *vertices == UNIT_BOX_CORNERS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereParams {
    pub radius: f32,
    pub subdivisions: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            subdivisions: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConeParams {
    pub base_radius: f32,
    pub height: f32,
    pub slices: u32,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            base_radius: 1.0,
            height: 2.0,
            slices: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderParams {
    pub radius: f32,
    pub height: f32,
    pub slices: u32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 2.0,
            slices: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfSphereParams {
    pub radius: f32,
    pub stacks: u32,
    pub slices: u32,
}

impl Default for HalfSphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            stacks: 20,
            slices: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    /// Radius of the marker sphere
    pub radius: f32,
    pub intensity: f32,
    pub color: [f32; 3],
    /// Unit spot direction in world space
    pub direction: [f32; 3],
    #[serde(skip)]
    pub slot: Option<LightSlot>,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            radius: 0.3,
            intensity: 10.0,
            color: [1.0, 1.0, 1.0],
            direction: [0.0, 0.0, -1.0],
            slot: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshParams {
    pub filename: PathBuf,
    #[serde(default)]
    pub swap_yz: bool,
}

/// Variant-specific parameters, internally tagged with the scene-file `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    #[serde(rename = "cube")]
    Cube(CubeParams),
    #[serde(rename = "sphere")]
    Sphere(SphereParams),
    #[serde(rename = "cone")]
    Cone(ConeParams),
    #[serde(rename = "cylinder")]
    Cylinder(CylinderParams),
    #[serde(rename = "halfsphere")]
    HalfSphere(HalfSphereParams),
    #[serde(rename = "pyramid")]
    Pyramid,
    #[serde(rename = "light_sphere")]
    Light(LightParams),
    #[serde(rename = "mesh")]
    Mesh(MeshParams),
}

impl Shape {
    /// Default parameters for `kind`. Meshes have no default and need a file.
    pub fn default_for(kind: ObjectKind) -> Result<Self> {
        Ok(match kind {
            ObjectKind::Cube => Shape::Cube(CubeParams::default()),
            ObjectKind::Sphere => Shape::Sphere(SphereParams::default()),
            ObjectKind::Cone => Shape::Cone(ConeParams::default()),
            ObjectKind::Cylinder => Shape::Cylinder(CylinderParams::default()),
            ObjectKind::HalfSphere => Shape::HalfSphere(HalfSphereParams::default()),
            ObjectKind::Pyramid => Shape::Pyramid,
            ObjectKind::Light => Shape::Light(LightParams::default()),
            ObjectKind::Mesh => return Err(EditorError::MissingSource(kind)),
        })
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Shape::Cube(_) => ObjectKind::Cube,
            Shape::Sphere(_) => ObjectKind::Sphere,
            Shape::Cone(_) => ObjectKind::Cone,
            Shape::Cylinder(_) => ObjectKind::Cylinder,
            Shape::HalfSphere(_) => ObjectKind::HalfSphere,
            Shape::Pyramid => ObjectKind::Pyramid,
            Shape::Light(_) => ObjectKind::Light,
            Shape::Mesh(_) => ObjectKind::Mesh,
        }
    }

    /// Builds the triangles for the current parameters.
    pub fn build_geometry(&self) -> Result<GeometryData> {
        Ok(match self {
            Shape::Cube(p) => geometry::generate_box(&p.vertices),
            Shape::Sphere(p) => {
                let rings = 1u32 << p.subdivisions.clamp(1, 6);
                geometry::generate_sphere(p.radius, rings * 4, rings * 2)
            }
            Shape::Cone(p) => geometry::generate_cone(p.base_radius, p.height, p.slices),
            Shape::Cylinder(p) => geometry::generate_cylinder(p.radius, p.height, p.slices),
            Shape::HalfSphere(p) => geometry::generate_half_sphere(p.radius, p.slices, p.stacks),
            Shape::Pyramid => geometry::generate_pyramid(),
            Shape::Light(p) => geometry::generate_sphere(p.radius, 16, 16),
            Shape::Mesh(p) => geometry::obj::load_obj(&p.filename, p.swap_yz)?,
        })
    }

    fn base_color(&self) -> [f32; 3] {
        match self {
            Shape::Pyramid => [1.0, 1.0, 1.0],
            Shape::Light(p) => p.color,
            _ => DEFAULT_COLOR,
        }
    }
}

/// Plane of a shear deformation. `Xy` moves X proportionally to Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShearPlane {
    Xy,
    Xz,
    Yz,
}

/// On-disk form of one object: the shape's tag and parameters plus the
/// common fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ObjectRecord {
    #[serde(flatten)]
    shape: Shape,
    position: [f32; 3],
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    scale: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    texture: Option<String>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    transform: Transform,
    pub selected: bool,
    texture: Option<String>,
    shape: Shape,
    geometry: GeometryData,
}

impl SceneObject {
    pub fn new(shape: Shape) -> Result<Self> {
        let geometry = shape.build_geometry()?;
        Ok(Self {
            transform: Transform::default(),
            selected: false,
            texture: None,
            shape,
            geometry,
        })
    }

    /// Object of `kind` with default parameters at the origin.
    pub fn from_kind(kind: ObjectKind) -> Result<Self> {
        Self::new(Shape::default_for(kind)?)
    }

    pub fn mesh(filename: impl Into<PathBuf>, swap_yz: bool) -> Result<Self> {
        Self::new(Shape::Mesh(MeshParams {
            filename: filename.into(),
            swap_yz,
        }))
    }

    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.transform.position = position;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    pub fn scale_floor(&self) -> f32 {
        self.kind().scale_floor()
    }

    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    /// Stores a texture path. Textures are never sampled; a path that does not
    /// exist is reported and kept so it survives a save.
    pub fn set_texture(&mut self, texture: Option<String>) {
        if let Some(path) = &texture {
            if !Path::new(path).exists() {
                log::warn!("Texture {path} not found, {} renders untextured", self.kind());
            }
        }
        self.texture = texture;
    }

    pub fn light_slot(&self) -> Option<LightSlot> {
        match &self.shape {
            Shape::Light(p) => p.slot,
            _ => None,
        }
    }

    /// Attaches a pool slot to a light. Ignored for other shapes.
    pub fn set_light_slot(&mut self, slot: Option<LightSlot>) {
        if let Shape::Light(p) = &mut self.shape {
            p.slot = slot;
        }
    }

    /// Shading data for an active light, `None` for other shapes or lights without a slot.
    pub fn light_source(&self) -> Option<LightSource> {
        match &self.shape {
            Shape::Light(p) => p.slot.map(|slot| LightSource {
                slot,
                position: self.transform.position,
                color: p.color,
                intensity: p.intensity,
                direction: p.direction,
            }),
            _ => None,
        }
    }

    pub fn rotate(&mut self, degrees: f32, axis: Axis) {
        self.transform.rotate(degrees, axis);
        if let Shape::Light(p) = &mut self.shape {
            let rotation = Matrix3::from_axis_angle(axis.unit(), Deg(degrees));
            let d = rotation * Vector3::from(p.direction);
            p.direction = d.into();
        }
    }

    pub fn translate(&mut self, distance: f32, axis: Axis) {
        self.transform.translate(distance, axis);
    }

    pub fn scale(&mut self, delta: f32, axis: Axis) {
        let floor = self.scale_floor();
        self.transform.scale(delta, axis, floor);
    }

    pub fn scale_uniform(&mut self, delta: f32) {
        let floor = self.scale_floor();
        self.transform.scale_uniform(delta, floor);
    }

    /// Deforms a cube's corners on one side of the plane. Other shapes ignore it.
    pub fn shear(&mut self, factor: f32, plane: ShearPlane) {
        let Shape::Cube(params) = &mut self.shape else {
            return;
        };

        for v in params.vertices.iter_mut() {
            match plane {
                ShearPlane::Xy if v[1] > 0.0 => v[0] += factor * v[1],
                ShearPlane::Xz if v[2] > 0.0 => v[0] += factor * v[2],
                ShearPlane::Yz if v[2] > 0.0 => v[1] += factor * v[2],
                _ => {}
            }
        }
        self.geometry = geometry::generate_box(&params.vertices);
    }

    pub fn draw<G: GraphicsContext + ?Sized>(&self, ctx: &mut G, shadow_pass: bool) {
        let material = if shadow_pass {
            MaterialState::unlit(SHADOW_COLOR)
        } else if self.selected {
            MaterialState::lit(SELECTED_COLOR)
        } else if self.kind() == ObjectKind::Light {
            MaterialState::unlit(self.shape.base_color())
        } else {
            MaterialState::lit(self.shape.base_color())
        };

        ctx.push_matrix();
        ctx.mul_matrix(self.transform.model_matrix());
        ctx.set_material(material);
        ctx.draw_geometry(&self.geometry);
        ctx.pop_matrix();

        if let (Shape::Light(p), false) = (&self.shape, shadow_pass) {
            let [x, y, z] = self.transform.position;
            let reach = p.radius * 2.0;
            let [dx, dy, dz] = p.direction;
            ctx.draw_lines(&[LineSegment {
                from: [x, y, z],
                to: [x + dx * reach, y + dy * reach, z + dz * reach],
                color: DIRECTION_COLOR,
            }]);
        }
    }

    pub(crate) fn to_record(&self) -> ObjectRecord {
        ObjectRecord {
            shape: self.shape.clone(),
            position: self.transform.position,
            rotation: self.transform.rotation,
            scale: self.transform.scale,
            texture: self.texture.clone(),
        }
    }

    /// Scene-file entry for this object.
    ///
    /// Goes through JSON text: `serde_json::to_value` widens every `f32` to
    /// `f64`, turning `0.1` into `0.10000000149011612`.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        let text = serde_json::to_string(&self.to_record())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Rebuilds an object from its scene-file entry.
    ///
    /// The `type` tag is checked first so an unknown type is reported as such
    /// rather than as a generic parse failure.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if ObjectKind::from_tag(tag).is_none() {
            return Err(EditorError::UnknownObjectType(tag.to_string()));
        }

        let record: ObjectRecord = serde_json::from_value(value)?;
        let mut object = SceneObject::new(record.shape)?;
        object.transform = Transform::new(record.position, record.rotation, record.scale);
        object.transform.clamp_scale(object.scale_floor());
        object.set_texture(record.texture);
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Matrix4;
    use serde_json::json;

    #[derive(Default)]
    struct CallLog {
        depth: i32,
        materials: Vec<MaterialState>,
        triangles: usize,
        lines: usize,
    }

    impl GraphicsContext for CallLog {
        fn push_matrix(&mut self) {
            self.depth += 1;
        }
        fn pop_matrix(&mut self) {
            self.depth -= 1;
        }
        fn mul_matrix(&mut self, _matrix: Matrix4<f32>) {}
        fn load_name(&mut self, _name: u32) {}
        fn set_material(&mut self, material: MaterialState) {
            self.materials.push(material);
        }
        fn draw_geometry(&mut self, geometry: &GeometryData) {
            self.triangles += geometry.triangle_count();
        }
        fn draw_lines(&mut self, lines: &[LineSegment]) {
            self.lines += lines.len();
        }
    }

    #[test]
    fn every_buildable_kind_has_geometry() {
        for kind in ObjectKind::ALL {
            match SceneObject::from_kind(kind) {
                Ok(object) => assert!(object.geometry().triangle_count() > 0, "{kind}"),
                Err(e) => {
                    assert_eq!(kind, ObjectKind::Mesh);
                    assert!(matches!(e, EditorError::MissingSource(ObjectKind::Mesh)));
                }
            }
        }
    }

    #[test]
    fn scale_respects_variant_floor() {
        let mut pyramid = SceneObject::from_kind(ObjectKind::Pyramid).unwrap();
        let mut cube = SceneObject::from_kind(ObjectKind::Cube).unwrap();
        for _ in 0..100 {
            pyramid.scale(-0.05, Axis::Y);
            cube.scale_uniform(-0.05);
        }
        assert_relative_eq!(pyramid.transform().scale[1], 0.05);
        assert!(cube.transform().scale.iter().all(|&s| s >= 0.1));
    }

    #[test]
    fn draw_uses_selection_and_shadow_colors() {
        let mut cube = SceneObject::from_kind(ObjectKind::Cube).unwrap();
        let mut log = CallLog::default();

        cube.draw(&mut log, false);
        cube.selected = true;
        cube.draw(&mut log, false);
        cube.draw(&mut log, true);

        assert_eq!(log.depth, 0);
        assert_eq!(log.triangles, 36);
        assert_eq!(log.materials[0].color, DEFAULT_COLOR);
        assert_eq!(log.materials[1].color, SELECTED_COLOR);
        assert_eq!(log.materials[2], MaterialState::unlit(SHADOW_COLOR));
    }

    #[test]
    fn light_draws_direction_line_and_rotates_it() {
        let mut light = SceneObject::from_kind(ObjectKind::Light).unwrap();
        let mut log = CallLog::default();
        light.draw(&mut log, false);
        assert_eq!(log.lines, 1);

        light.rotate(90.0, Axis::Y);
        let Shape::Light(p) = light.shape() else {
            unreachable!()
        };
        // -Z rotated 90 degrees about +Y points along -X
        assert_relative_eq!(p.direction[0], -1.0, epsilon = 1e-6);
        assert_relative_eq!(p.direction[2], 0.0, epsilon = 1e-6);
        assert_eq!(light.transform().rotation, [0.0, 90.0, 0.0]);
    }

    #[test]
    fn common_fields_round_trip() {
        let entry = json!({
            "type": "cone",
            "position": [1.5, -2.0, 0.25],
            "rotation": [10.0, 370.0, -5.0],
            "scale": [1.25, 0.5, 2.0],
        });
        let object = SceneObject::from_value(entry.clone()).unwrap();
        let value = object.to_value().unwrap();

        for field in ["type", "position", "rotation", "scale"] {
            assert_eq!(value[field], entry[field], "{field}");
        }
        assert_eq!(value["slices"], json!(20));
    }

    #[test]
    fn decimal_fields_survive_round_trip_unchanged() {
        let entries = [
            json!({
                "type": "cube",
                "position": [0.1, 0.2, 0.3],
                "rotation": [1.1, -0.3, 45.7],
                "scale": [1.05, 0.3, 2.2],
                "texture": "brick.png",
            }),
            json!({
                "type": "light_sphere",
                "position": [0.1, 2.7, -0.3],
                "rotation": [0.0, 0.0, 0.0],
                "scale": [1.1, 1.1, 1.1],
                "radius": 0.3,
                "intensity": 10.0,
                "color": [0.9, 0.8, 0.7],
                "direction": [0.0, 0.0, -1.0],
            }),
        ];

        for entry in entries {
            let object = SceneObject::from_value(entry.clone()).unwrap();
            assert_eq!(object.to_value().unwrap(), entry);
        }
    }

    #[test]
    fn scaled_cube_keeps_short_decimal_form() {
        let mut cube = SceneObject::from_kind(ObjectKind::Cube).unwrap();
        cube.scale(0.05, Axis::X);
        assert_eq!(cube.to_value().unwrap()["scale"], json!([1.05, 1.0, 1.0]));
    }

    #[test]
    fn pyramid_entry_needs_no_parameters() {
        let object = SceneObject::from_value(json!({"type": "pyramid", "position": [0, 1, 0]}))
            .unwrap();
        assert_eq!(object.kind(), ObjectKind::Pyramid);
        assert_eq!(object.transform().scale, [1.0, 1.0, 1.0]);
        assert_eq!(object.to_value().unwrap()["type"], json!("pyramid"));
    }

    #[test]
    fn unknown_type_is_reported() {
        let result = SceneObject::from_value(json!({"type": "torus", "position": [0, 0, 0]}));
        assert!(matches!(result, Err(EditorError::UnknownObjectType(t)) if t == "torus"));
    }

    #[test]
    fn loaded_scale_below_floor_is_clamped() {
        let object = SceneObject::from_value(json!({
            "type": "sphere", "position": [0, 0, 0], "scale": [0.0, 1.0, 1.0]
        }))
        .unwrap();
        assert_eq!(object.transform().scale, [0.1, 1.0, 1.0]);
    }

    #[test]
    fn shear_moves_only_the_upper_half() {
        let mut cube = SceneObject::from_kind(ObjectKind::Cube).unwrap();
        cube.shear(0.5, ShearPlane::Xy);

        let Shape::Cube(p) = cube.shape() else {
            unreachable!()
        };
        for (sheared, original) in p.vertices.iter().zip(UNIT_BOX_CORNERS) {
            if original[1] > 0.0 {
                assert_eq!(sheared[0], original[0] + 0.5);
            } else {
                assert_eq!(*sheared, original);
            }
        }
        assert!(cube.to_value().unwrap().get("vertices").is_some());
    }

    #[test]
    fn untouched_cube_omits_vertices() {
        let cube = SceneObject::from_kind(ObjectKind::Cube).unwrap();
        assert!(cube.to_value().unwrap().get("vertices").is_none());
    }

    #[test]
    fn shear_is_ignored_by_other_shapes() {
        let mut sphere = SceneObject::from_kind(ObjectKind::Sphere).unwrap();
        let before = sphere.geometry().clone();
        sphere.shear(0.5, ShearPlane::Xz);
        assert_eq!(sphere.geometry(), &before);
    }

    #[test]
    fn light_slot_is_not_persisted() {
        let mut light = SceneObject::from_kind(ObjectKind::Light).unwrap();
        light.set_light_slot(Some(LightSlot(3)));
        let value = light.to_value().unwrap();
        assert!(value.get("slot").is_none());

        let restored = SceneObject::from_value(value).unwrap();
        assert_eq!(restored.light_slot(), None);
        assert!(restored.light_source().is_none());
    }

    #[test]
    fn texture_survives_round_trip_even_when_missing() {
        let mut cube = SceneObject::from_kind(ObjectKind::Cube).unwrap();
        cube.set_texture(Some("textures/missing.png".into()));
        let restored = SceneObject::from_value(cube.to_value().unwrap()).unwrap();
        assert_eq!(restored.texture(), Some("textures/missing.png"));
    }
}
