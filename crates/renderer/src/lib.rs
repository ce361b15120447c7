//! Renderer crate for mandelswirl.
//!
//! Opens a fixed 800×800 window and draws an animated, rotating Mandelbrot
//! fractal with a GLSL fragment shader over a full-screen quad. The overall
//! flow is:
//!
//! ```text
//!   mandelswirl (CLI)
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          │                                      │
//!          └─▶ compile + link + reflect           └─▶ write `time` ─▶ GPU UBO ─▶ draw quad
//! ```
//!
//! `WindowState` owns all GPU resources (surface, device, pipeline, uniforms)
//! and `Renderer` is the thin entry point the binary calls. A test-only
//! `shading` module mirrors the fragment shader's math so the image can be
//! checked without a GPU.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

mod compile;
mod gpu;
mod runtime;
#[cfg(test)]
mod shading;
mod types;
mod window;

pub use compile::{AttributeLocation, ProgramInterface, ShaderError, UniformLocation};
pub use runtime::{
    FrameClock, FramePacer, LoopInput, LoopState, SystemTimeSource, TimeSample, TimeSource,
    EXIT_KEY,
};
pub use types::{RendererConfig, TARGET_FPS, WINDOW_HEIGHT, WINDOW_WIDTH};

use window::WindowState;

/// High-level entry point that owns the configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and drives the render loop until the user quits.
    ///
    /// Setup failures (no display, no adapter, shader compile or link errors)
    /// are returned before the first frame. A fatal surface error mid-loop
    /// stops the loop and is returned after resources are released.
    pub fn run(&mut self) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to initialize event loop")?;
        let (width, height) = self.config.surface_size;
        let window = WindowBuilder::new()
            .with_title(self.config.title.as_str())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false)
            .build(&event_loop)
            .context("failed to create window")?;
        let window = Arc::new(window);

        let state = WindowState::new(window, &self.config)?;
        info!(
            width,
            height,
            fps = self.config.target_fps,
            "starting render loop; press Escape or close the window to quit"
        );
        window::run_event_loop(event_loop, state, &self.config)?;
        info!("render loop finished");
        Ok(())
    }
}
