//! GPU side of the renderer.
//!
//! - `context` owns the wgpu instance/device/surface wiring and reconfigures
//!   the swapchain when the window changes size.
//! - `program` links the fixed GLSL pair into a render pipeline and owns the
//!   uniform buffer the reflected `resolution`/`time` locations point into.
//! - `geometry` uploads the immutable full-screen quad.
//! - `uniforms` mirrors the shader's uniform block on the host.
//! - `state` glues everything together behind `GpuState`, the API `window`
//!   drives once per frame.

mod context;
mod geometry;
mod program;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
