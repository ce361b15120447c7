use anyhow::Result;
use wgpu::naga::ShaderStage;

use crate::compile::{
    create_shader_module, CompiledProgram, ProgramInterface, ShaderError, FRAGMENT_SHADER_GLSL,
    VERTEX_SHADER_GLSL,
};

use super::geometry::{vertex_attributes, VERTEX_STRIDE};
use super::uniforms::ShaderUniforms;

/// The linked Mandelbrot program: render pipeline, its uniform buffer, and
/// the reflected locations used to feed it.
pub(crate) struct ShaderProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_bind_group: wgpu::BindGroup,
    pub uniform_buffer: wgpu::Buffer,
    pub interface: ProgramInterface,
}

impl ShaderProgram {
    /// Compiles, links and reflects the fixed shader pair.
    ///
    /// Compile errors come from naga before anything touches the device; link
    /// errors are whatever wgpu validation reports while building the pipeline.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Result<Self> {
        let compiled = CompiledProgram::compile()?;
        let interface = compiled.interface()?;
        tracing::debug!(
            resolution_offset = interface.resolution.offset,
            time_offset = interface.time.offset,
            position_location = interface.position.location,
            block_size = interface.uniform_block_size,
            "resolved shader program interface"
        );

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = create_shader_module(device, ShaderStage::Vertex, VERTEX_SHADER_GLSL);
        let fragment_module =
            create_shader_module(device, ShaderStage::Fragment, FRAGMENT_SHADER_GLSL);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: interface.time.binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: ShaderUniforms::buffer_size(&interface),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: interface.time.binding,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mandelbrot pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let attributes = vertex_attributes(interface.position);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mandelbrot pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: VERTEX_STRIDE,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link(err.to_string()).into());
        }

        Ok(Self {
            pipeline,
            uniform_bind_group,
            uniform_buffer,
            interface,
        })
    }
}
