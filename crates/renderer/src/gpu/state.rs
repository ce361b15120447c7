use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;

use super::context::GpuContext;
use super::geometry::QuadGeometry;
use super::program::ShaderProgram;
use super::uniforms::ShaderUniforms;

/// Every GPU resource needed to present a frame.
///
/// Field order is drop order: the program and quad go before the context
/// that created them.
pub(crate) struct GpuState {
    program: ShaderProgram,
    geometry: QuadGeometry,
    uniforms: ShaderUniforms,
    stats: FrameStats,
    frame_budget: Duration,
    context: GpuContext,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        resolution: [f32; 2],
        target_fps: f32,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let program = ShaderProgram::new(&context.device, context.surface_format)?;
        let geometry = QuadGeometry::upload(&context.device);

        let uniforms = ShaderUniforms::new(resolution);
        uniforms.write_all(&context.queue, &program.uniform_buffer);
        debug!(
            adapter = %context.adapter_name,
            resolution = ?uniforms.resolution,
            vertices = geometry.vertex_count,
            "GPU state ready"
        );

        Ok(Self {
            program,
            geometry,
            uniforms,
            stats: FrameStats::new(Instant::now()),
            frame_budget: Duration::from_secs_f32(1.0 / target_fps.max(1.0)),
            context,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Current value of the `resolution` uniform.
    pub(crate) fn resolution(&self) -> [f32; 2] {
        self.uniforms.resolution
    }

    /// Resizes the swapchain only; `resolution` stays what it was at setup.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Pushes `time`, draws the quad, and presents.
    pub(crate) fn render(&mut self, time_seconds: f32) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.write_time(
            &self.context.queue,
            &self.program.uniform_buffer,
            self.program.interface.time,
            time_seconds,
        );

        let acquire_start = Instant::now();
        let frame = self.context.surface.get_current_texture()?;
        let acquire_duration = acquire_start.elapsed();
        if acquire_duration > self.frame_budget {
            warn!(
                "acquiring frame took {}ms, which is over the frame budget of {}ms",
                acquire_duration.as_millis(),
                self.frame_budget.as_millis(),
            );
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.program.pipeline);
            render_pass.set_bind_group(
                self.program.interface.time.group,
                &self.program.uniform_bind_group,
                &[],
            );
            render_pass.set_vertex_buffer(0, self.geometry.buffer.slice(..));
            render_pass.draw(0..self.geometry.vertex_count, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        let now = Instant::now();
        if let Some(fps) = self.stats.record(now) {
            debug!(
                fps = fps.round(),
                frame_count = self.stats.frame_count,
                time = self.uniforms.time,
                "render stats"
            );
        }
        Ok(())
    }

    /// Releases the program, then the quad, then the device and surface.
    pub(crate) fn shutdown(self) {
        let Self {
            program,
            geometry,
            context,
            stats,
            ..
        } = self;
        drop(program);
        debug!("released shader program");
        drop(geometry);
        drop(context);
        debug!(frames = stats.frame_count, "released GPU context");
    }
}

/// Rolling once-per-second frame rate measurement.
#[derive(Debug, Clone)]
struct FrameStats {
    frame_count: u64,
    frames_since_last_update: u32,
    last_update: Instant,
}

impl FrameStats {
    fn new(now: Instant) -> Self {
        Self {
            frame_count: 0,
            frames_since_last_update: 0,
            last_update: now,
        }
    }

    /// Counts a presented frame; yields the measured rate once a second.
    fn record(&mut self, now: Instant) -> Option<f32> {
        self.frame_count += 1;
        self.frames_since_last_update += 1;
        let elapsed = now.saturating_duration_since(self.last_update);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames_since_last_update as f32 / elapsed.as_secs_f32();
        self.frames_since_last_update = 0;
        self.last_update = now;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_report_once_per_second() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        for frame in 1..60 {
            let at = start + Duration::from_millis(frame * 16);
            assert!(stats.record(at).is_none());
        }
        let fps = stats
            .record(start + Duration::from_secs(1))
            .expect("a second has passed");
        assert!((fps - 60.0).abs() < 1e-3);
        assert_eq!(stats.frame_count, 60);
        assert!(stats.record(start + Duration::from_millis(1010)).is_none());
    }
}
