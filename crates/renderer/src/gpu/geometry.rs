use wgpu::util::DeviceExt;

use crate::compile::AttributeLocation;

/// Two triangles covering clip space.
pub(crate) const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Tightly packed `vec2` positions.
pub(crate) const VERTEX_STRIDE: wgpu::BufferAddress = std::mem::size_of::<[f32; 2]>() as u64;

/// Static full-screen quad. The buffer has no `COPY_DST` usage, so its
/// contents cannot change after upload.
pub(crate) struct QuadGeometry {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl QuadGeometry {
    pub fn upload(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fullscreen quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: QUAD_VERTICES.len() as u32,
        }
    }
}

/// `position` as two unnormalised floats at the reflected location.
pub(crate) fn vertex_attributes(position: AttributeLocation) -> [wgpu::VertexAttribute; 1] {
    [wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: position.location,
    }]
}
