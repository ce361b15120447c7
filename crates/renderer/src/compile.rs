use std::borrow::Cow;

use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::{
    AddressSpace, Binding, Module, ResourceBinding, Scalar, ShaderStage, TypeInner, VectorSize,
};

/// Pass-through vertex stage for the full-screen quad.
pub const VERTEX_SHADER_GLSL: &str = include_str!("../shaders/fullscreen_quad.vert");

/// Rotating Mandelbrot fragment stage.
pub const FRAGMENT_SHADER_GLSL: &str = include_str!("../shaders/mandelbrot.frag");

pub(crate) const RESOLUTION_UNIFORM: &str = "resolution";
pub(crate) const TIME_UNIFORM: &str = "time";
pub(crate) const POSITION_ATTRIBUTE: &str = "position";

/// Failures raised while turning the fixed GLSL sources into a GPU program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader:\n{diagnostic}")]
    Compile {
        stage: &'static str,
        diagnostic: String,
    },
    #[error("failed to link shader program: {0}")]
    Link(String),
    #[error("shader program has no active uniform `{0}`")]
    MissingUniform(&'static str),
    #[error("shader program has no active attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("`{name}` is declared with an unexpected type (expected {expected})")]
    UnexpectedType {
        name: &'static str,
        expected: &'static str,
    },
}

/// Byte offset of a uniform inside the program's std140 uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    pub offset: u32,
}

/// Vertex input slot of a per-vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLocation {
    pub location: u32,
}

/// Everything the host needs to know about the linked program's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramInterface {
    pub resolution: UniformLocation,
    pub time: UniformLocation,
    pub position: AttributeLocation,
    /// Size in bytes of the uniform block, including std140 tail padding.
    pub uniform_block_size: u32,
}

/// Parsed and validated vertex + fragment modules.
pub(crate) struct CompiledProgram {
    pub vertex: Module,
    pub fragment: Module,
}

impl CompiledProgram {
    /// Compiles both fixed stages, failing on the first stage with errors.
    pub fn compile() -> Result<Self, ShaderError> {
        Ok(Self {
            vertex: compile_stage(ShaderStage::Vertex, VERTEX_SHADER_GLSL)?,
            fragment: compile_stage(ShaderStage::Fragment, FRAGMENT_SHADER_GLSL)?,
        })
    }

    /// Resolves the uniform and attribute locations the host writes to.
    pub fn interface(&self) -> Result<ProgramInterface, ShaderError> {
        let block = find_uniform_block(&self.fragment)?;
        let resolution = block.member(&self.fragment, RESOLUTION_UNIFORM, Expected::Vec2)?;
        let time = block.member(&self.fragment, TIME_UNIFORM, Expected::Float)?;
        let position = find_attribute(&self.vertex, POSITION_ATTRIBUTE, Expected::Vec2)?;

        Ok(ProgramInterface {
            resolution,
            time,
            position,
            uniform_block_size: block.span,
        })
    }
}

/// Parses one GLSL stage with naga's frontend and validates the result.
pub(crate) fn compile_stage(stage: ShaderStage, source: &str) -> Result<Module, ShaderError> {
    let stage_name = stage_name(stage);
    let module = Frontend::default()
        .parse(&Options::from(stage), source)
        .map_err(|errors| ShaderError::Compile {
            stage: stage_name,
            diagnostic: errors.emit_to_string(source),
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| ShaderError::Compile {
            stage: stage_name,
            diagnostic: err.emit_to_string(source),
        })?;

    tracing::debug!(
        stage = stage_name,
        types = module.types.len(),
        globals = module.global_variables.len(),
        "compiled shader stage"
    );
    Ok(module)
}

/// Creates the wgpu shader module for a stage that already passed [`compile_stage`].
pub(crate) fn create_shader_module(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &'static str,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "fullscreen quad vertex",
            _ => "mandelbrot fragment",
        }),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    })
}

fn stage_name(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "vertex",
        ShaderStage::Fragment => "fragment",
        _ => "compute",
    }
}

#[derive(Clone, Copy)]
enum Expected {
    Vec2,
    Float,
}

impl Expected {
    fn matches(self, inner: &TypeInner) -> bool {
        match (self, inner) {
            (
                Expected::Vec2,
                TypeInner::Vector {
                    size: VectorSize::Bi,
                    scalar,
                },
            ) => *scalar == Scalar::F32,
            (Expected::Float, TypeInner::Scalar(scalar)) => *scalar == Scalar::F32,
            _ => false,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Expected::Vec2 => "vec2",
            Expected::Float => "float",
        }
    }
}

struct UniformBlock {
    binding: ResourceBinding,
    ty: wgpu::naga::Handle<wgpu::naga::Type>,
    span: u32,
}

impl UniformBlock {
    fn member(
        &self,
        module: &Module,
        name: &'static str,
        expected: Expected,
    ) -> Result<UniformLocation, ShaderError> {
        let TypeInner::Struct { members, .. } = &module.types[self.ty].inner else {
            return Err(ShaderError::MissingUniform(name));
        };
        let member = members
            .iter()
            .find(|member| member.name.as_deref() == Some(name))
            .ok_or(ShaderError::MissingUniform(name))?;
        if !expected.matches(&module.types[member.ty].inner) {
            return Err(ShaderError::UnexpectedType {
                name,
                expected: expected.describe(),
            });
        }
        Ok(UniformLocation {
            group: self.binding.group,
            binding: self.binding.binding,
            offset: member.offset,
        })
    }
}

fn find_uniform_block(module: &Module) -> Result<UniformBlock, ShaderError> {
    module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == AddressSpace::Uniform)
        .find_map(|(_, var)| {
            let binding = var.binding.clone()?;
            match &module.types[var.ty].inner {
                TypeInner::Struct { span, .. } => Some(UniformBlock {
                    binding,
                    ty: var.ty,
                    span: *span,
                }),
                _ => None,
            }
        })
        .ok_or(ShaderError::MissingUniform(RESOLUTION_UNIFORM))
}

fn find_attribute(
    module: &Module,
    name: &'static str,
    expected: Expected,
) -> Result<AttributeLocation, ShaderError> {
    let entry = module
        .entry_points
        .iter()
        .find(|entry| entry.stage == ShaderStage::Vertex)
        .ok_or(ShaderError::MissingAttribute(name))?;
    let argument = entry
        .function
        .arguments
        .iter()
        .find(|argument| argument.name.as_deref() == Some(name))
        .ok_or(ShaderError::MissingAttribute(name))?;
    let Some(Binding::Location { location, .. }) = &argument.binding else {
        return Err(ShaderError::MissingAttribute(name));
    };
    let location = *location;
    if !expected.matches(&module.types[argument.ty].inner) {
        return Err(ShaderError::UnexpectedType {
            name,
            expected: expected.describe(),
        });
    }
    Ok(AttributeLocation { location })
}
