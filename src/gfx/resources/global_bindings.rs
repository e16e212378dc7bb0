//! Global uniform bindings for projection and lighting
//!
//! One [`GlobalUniform`] is uploaded per viewport. Positions are in the eye
//! space of that viewport's camera, matching the vertices baked by the frame
//! recorder. MUST match the `Globals` struct in `shader.wgsl` exactly.

use cgmath::{Matrix4, Point3, Transform};

use crate::gfx::camera::CameraUniform;
use crate::gfx::scene::LightSource;
use crate::wgpu_utils::UniformBuffer;

pub const MAX_LIGHTS: usize = 8;

/// Brightness factor per unit of light intensity
const INTENSITY_SCALE: f32 = 0.1;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// Eye-space position, `w = 1`
    pub position: [f32; 4],
    /// RGB already multiplied by intensity, `a` unused
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
    pub light_count: u32,
    pub ambient: f32,
    _padding: [f32; 2],
}
// 64 + 8 * 32 + 16 = 336 bytes

impl GlobalUniform {
    /// Builds the uniform for one viewport. `view` moves world-space light
    /// positions into the same eye space as the recorded vertices.
    pub fn new(camera: CameraUniform, view: Matrix4<f32>, lights: &[LightSource]) -> Self {
        let mut gpu_lights = [GpuLight::default(); MAX_LIGHTS];
        if lights.len() > MAX_LIGHTS {
            log::warn!("{} lights active, shading only the first {MAX_LIGHTS}", lights.len());
        }

        let mut count = 0;
        for (slot, light) in gpu_lights.iter_mut().zip(lights) {
            let eye = view.transform_point(Point3::from(light.position));
            let k = light.intensity * INTENSITY_SCALE;
            slot.position = [eye.x, eye.y, eye.z, 1.0];
            slot.color = [light.color[0] * k, light.color[1] * k, light.color[2] * k, 1.0];
            count += 1;
        }

        Self {
            view_proj: camera.view_proj,
            lights: gpu_lights,
            light_count: count,
            ambient: 0.25,
            _padding: [0.0; 2],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Layout shared by every viewport's global bind group
pub fn global_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Global Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// A global uniform buffer together with its bind group
pub struct GlobalBindings {
    pub ubo: GlobalUBO,
    pub bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let ubo = GlobalUBO::new(device, label);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });
        Self { ubo, bind_group }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::LightSlot;
    use cgmath::Vector3;

    fn light(position: [f32; 3]) -> LightSource {
        LightSource {
            slot: LightSlot(0),
            position,
            color: [1.0, 0.5, 0.0],
            intensity: 10.0,
            direction: [0.0, 0.0, -1.0],
        }
    }

    #[test]
    fn uniform_size_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 336);
    }

    #[test]
    fn lights_are_moved_into_eye_space() {
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -20.0));
        let uniform = GlobalUniform::new(CameraUniform::default(), view, &[light([1.0, 2.0, 3.0])]);

        assert_eq!(uniform.light_count, 1);
        assert_eq!(uniform.lights[0].position, [1.0, 2.0, -17.0, 1.0]);
        assert_eq!(uniform.lights[0].color, [1.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn light_count_is_capped() {
        let lights = vec![light([0.0; 3]); MAX_LIGHTS + 3];
        let uniform = GlobalUniform::new(CameraUniform::default(), Matrix4::from_scale(1.0), &lights);
        assert_eq!(uniform.light_count as usize, MAX_LIGHTS);
    }
}
