use std::marker::PhantomData;

/// A uniform buffer sized for exactly one `T`.
///
/// Keeps a copy of the last upload; the per-viewport globals rarely change
/// between frames while the camera is still.
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    last_upload: Option<Vec<u8>>,
    _content: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<T>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            last_upload: None,
            _content: PhantomData,
        }
    }

    /// Queues `content` for upload. Returns `false` when it matches the
    /// previous upload and nothing was written.
    pub fn write(&mut self, queue: &wgpu::Queue, content: &T) -> bool {
        let bytes = bytemuck::bytes_of(content);
        if self.last_upload.as_deref() == Some(bytes) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.last_upload = Some(bytes.to_vec());
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
