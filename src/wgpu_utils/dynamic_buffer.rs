use std::marker::PhantomData;

/// Vertex or index buffer rewritten every frame, grown on demand
pub struct DynamicBuffer<Content> {
    buffer: wgpu::Buffer,
    usage: wgpu::BufferUsages,
    label: &'static str,
    capacity: usize,
    len: usize,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> DynamicBuffer<Content> {
    pub fn new(
        device: &wgpu::Device,
        usage: wgpu::BufferUsages,
        capacity: usize,
        label: &'static str,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, usage, capacity, label),
            usage,
            label,
            capacity,
            len: 0,
            content_type: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        usage: wgpu::BufferUsages,
        capacity: usize,
        label: &str,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<Content>()) as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Uploads `data`, reallocating at twice the size when it does not fit.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[Content]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.usage, self.capacity, self.label);
            log::debug!("Grew {} to {} elements", self.label, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slice covering the elements written last.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        let end = (self.len * std::mem::size_of::<Content>()) as u64;
        self.buffer.slice(..end)
    }
}
