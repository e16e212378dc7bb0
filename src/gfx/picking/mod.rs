//! # Object Picking System
//!
//! Picking re-runs the scene's draw calls in select mode instead of casting
//! rays against bounding boxes, so the hit test covers exactly the triangles the
//! user sees.
//!
//! ## How it works
//!
//! 1. **Pick matrix**: narrow the projection to a 1x1 pixel window at the cursor
//! 2. **Named draw**: draw every object with name `index + 1` under the main camera
//! 3. **Selection**: the hit record with the smallest near depth wins

pub mod selector;

pub use selector::SoftwareSelector;

use cgmath::{Matrix4, Vector3};

use crate::gfx::camera::{Camera, Projection, Viewport};
use crate::gfx::context::{PickRegion, SelectionContext};
use crate::gfx::scene::SceneObject;

/// Buffer words reserved per object
const WORDS_PER_OBJECT: usize = 4;

/// Matrix mapping `region` to the full clip volume, applied after the projection.
pub fn pick_matrix(region: &PickRegion) -> Matrix4<f32> {
    let [x, y] = region.center;
    let [w, h] = region.size;
    let [vx, vy, vw, vh] = region.viewport;
    if w <= 0.0 || h <= 0.0 {
        return Matrix4::from_scale(1.0);
    }

    Matrix4::from_translation(Vector3::new(
        (vw - 2.0 * (x - vx)) / w,
        (vh - 2.0 * (y - vy)) / h,
        0.0,
    )) * Matrix4::from_nonuniform_scale(vw / w, vh / h, 1.0)
}

/// Answers "which object is under this pixel".
#[derive(Debug, Clone, Default)]
pub struct PickingService {
    projection: Projection,
}

impl PickingService {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }

    /// Index of the closest object under window pixel `cursor` (origin
    /// top-left), seen through `camera` in `viewport`.
    pub fn pick<S: SelectionContext + ?Sized>(
        &self,
        ctx: &mut S,
        objects: &[SceneObject],
        camera: &Camera,
        viewport: Viewport,
        window_height: f32,
        cursor: [f32; 2],
    ) -> Option<usize> {
        if objects.is_empty() {
            return None;
        }

        let region = PickRegion {
            center: [cursor[0], window_height - cursor[1]],
            size: [1.0, 1.0],
            viewport: viewport.as_array(),
        };
        ctx.begin_select(region, WORDS_PER_OBJECT * objects.len());
        ctx.set_projection(self.projection.matrix(viewport.aspect()));

        ctx.push_matrix();
        ctx.mul_matrix(camera.view_matrix());
        for (index, object) in objects.iter().enumerate() {
            ctx.load_name(index as u32 + 1);
            object.draw(ctx, false);
        }
        ctx.pop_matrix();

        let outcome = ctx.end_select();
        if outcome.overflowed {
            log::warn!(
                "Pick buffer overflowed with {} objects, some hits were dropped",
                objects.len()
            );
        }

        outcome
            .hits
            .iter()
            .filter_map(|hit| {
                let name = *hit.names.last()?;
                (name > 0).then_some((hit.min_depth, name as usize - 1))
            })
            .filter(|&(_, index)| index < objects.len())
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, index)| index)
    }
}
