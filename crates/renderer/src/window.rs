use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::Window;

use crate::gpu::GpuState;
use crate::runtime::{FrameClock, FramePacer, LoopInput, LoopState, TimeSample};
use crate::types::RendererConfig;

/// Owns the window and the GPU state rendering into it.
///
/// `gpu` is declared first so it is always released before the window whose
/// handles it borrowed.
pub(crate) struct WindowState {
    gpu: Option<GpuState>,
    clock: FrameClock,
    window: Arc<Window>,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(
            window.as_ref(),
            size,
            config.resolution(),
            config.target_fps,
        )?;
        info!(
            width = size.width,
            height = size.height,
            resolution = ?gpu.resolution(),
            "renderer initialised"
        );

        Ok(Self {
            gpu: Some(gpu),
            clock: FrameClock::start(),
            window,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn gpu_mut(&mut self) -> Result<&mut GpuState> {
        self.gpu
            .as_mut()
            .ok_or_else(|| anyhow!("GPU state already released"))
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) -> Result<()> {
        let gpu = self.gpu_mut()?;
        if gpu.size() != new_size {
            debug!(
                width = new_size.width,
                height = new_size.height,
                "window resized; reconfiguring swapchain"
            );
            gpu.resize(new_size);
        }
        Ok(())
    }

    /// Samples the clock and renders one frame.
    ///
    /// A swapchain timeout skips the frame and an outdated swapchain is
    /// reconfigured; every other surface error is fatal.
    pub(crate) fn render_frame(&mut self) -> Result<TimeSample> {
        let sample = self.clock.sample();
        let gpu = self.gpu_mut()?;
        match gpu.render(sample.seconds) {
            Ok(()) => Ok(sample),
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout; skipping frame");
                Ok(sample)
            }
            Err(wgpu::SurfaceError::Outdated) => {
                debug!("surface outdated; reconfiguring");
                gpu.reconfigure();
                Ok(sample)
            }
            Err(other) => Err(anyhow!("surface error: {other}")),
        }
    }

    /// Releases GPU resources, then the window.
    pub(crate) fn shutdown(mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.shutdown();
        }
        drop(self);
        debug!("window released");
    }
}

/// Runs the frame loop until the user quits or a frame fails.
///
/// Each iteration: winit delivers pending events (close/Escape stop the loop),
/// then `RedrawRequested` pushes `time`, draws, and presents. `AboutToWait`
/// schedules the next redraw on the 60 Hz pacer deadline.
pub(crate) fn run_event_loop(
    event_loop: EventLoop<()>,
    state: WindowState,
    config: &RendererConfig,
) -> Result<()> {
    let failure: Rc<RefCell<Option<anyhow::Error>>> = Rc::new(RefCell::new(None));
    let loop_failure = Rc::clone(&failure);
    let mut pacer = FramePacer::new(config.target_fps);
    let mut loop_state = LoopState::Running;

    state.window().request_redraw();
    let mut state = Some(state);

    event_loop
        .run(move |event, elwt| {
            if let Event::LoopExiting = event {
                if let Some(state) = state.take() {
                    state.shutdown();
                }
                return;
            }
            if !loop_state.is_running() {
                return;
            }
            let Some(active) = state.as_mut() else {
                return;
            };

            match event {
                Event::WindowEvent { window_id, event } if window_id == active.window().id() => {
                    let input = match &event {
                        WindowEvent::CloseRequested => LoopInput::CloseRequested,
                        WindowEvent::KeyboardInput { event, .. } => LoopInput::Key {
                            key: &event.logical_key,
                            state: event.state,
                        },
                        _ => LoopInput::Other,
                    };
                    let previous = loop_state;
                    loop_state = previous.advance(input);
                    if previous.stops_at(loop_state) {
                        info!("quit requested; stopping render loop");
                        elwt.exit();
                        return;
                    }

                    match event {
                        WindowEvent::Resized(new_size) => {
                            if let Err(err) = active.resize(new_size) {
                                error!("failed to resize surface: {err:?}");
                            }
                        }
                        WindowEvent::RedrawRequested => match active.render_frame() {
                            Ok(sample) => {
                                pacer.mark_rendered(Instant::now());
                                tracing::trace!(
                                    frame = sample.frame_index,
                                    time = sample.seconds,
                                    "frame presented"
                                );
                            }
                            Err(err) => {
                                error!("render loop failed: {err:?}");
                                *loop_failure.borrow_mut() = Some(err);
                                loop_state = LoopState::Stopped;
                                elwt.exit();
                            }
                        },
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    if pacer.ready_for_frame(now) {
                        active.window().request_redraw();
                        elwt.set_control_flow(ControlFlow::Wait);
                    } else if let Some(deadline) = pacer.next_deadline() {
                        elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                    } else {
                        elwt.set_control_flow(ControlFlow::Wait);
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))?;

    loop_outcome(&failure)
}

/// Turns the error recorded by the event-loop closure, if any, into the
/// result of the run.
fn loop_outcome(failure: &RefCell<Option<anyhow::Error>>) -> Result<()> {
    match failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
