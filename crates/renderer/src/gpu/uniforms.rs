use bytemuck::{Pod, Zeroable};

use crate::compile::{ProgramInterface, UniformLocation};

/// Host-side copy of the fragment shader's `Params` block (std140).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct ShaderUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub _padding: f32,
}

impl ShaderUniforms {
    pub fn new(resolution: [f32; 2]) -> Self {
        Self {
            resolution,
            time: 0.0,
            _padding: 0.0,
        }
    }

    /// Size of the GPU buffer backing the block.
    pub fn buffer_size(interface: &ProgramInterface) -> u64 {
        (interface.uniform_block_size as u64).max(std::mem::size_of::<Self>() as u64)
    }

    /// Uploads the whole block.
    pub fn write_all(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(self));
    }

    /// Records and uploads a new `time` value at its reflected location.
    pub fn write_time(
        &mut self,
        queue: &wgpu::Queue,
        buffer: &wgpu::Buffer,
        location: UniformLocation,
        seconds: f32,
    ) {
        self.time = seconds;
        queue.write_buffer(
            buffer,
            u64::from(location.offset),
            bytemuck::bytes_of(&self.time),
        );
    }
}
