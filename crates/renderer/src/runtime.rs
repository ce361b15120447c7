use std::time::{Duration, Instant};

use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

/// Key that stops the render loop.
pub const EXIT_KEY: NamedKey = NamedKey::Escape;

/// Abstraction over where time values originate from.
pub trait TimeSource {
    /// Seconds elapsed since the source started.
    fn elapsed_seconds(&mut self) -> f32;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    /// Creates a system time source initialised to `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn elapsed_seconds(&mut self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

/// Snapshot of the time state supplied to the `time` uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock time in seconds.
    pub seconds: f32,
    /// Frame counter for the running session.
    pub frame_index: u64,
}

/// Drives the `time` uniform.
///
/// Samples are wall-clock elapsed time, never smoothed, and never decrease
/// even if the underlying source does.
pub struct FrameClock<S = SystemTimeSource> {
    source: S,
    last_seconds: f32,
    frame: u64,
}

impl FrameClock<SystemTimeSource> {
    /// Clock starting now, backed by the monotonic system clock.
    pub fn start() -> Self {
        Self::with_source(SystemTimeSource::new())
    }
}

impl<S: TimeSource> FrameClock<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            last_seconds: 0.0,
            frame: 0,
        }
    }

    /// Produces the time sample for the next frame.
    pub fn sample(&mut self) -> TimeSample {
        let seconds = self.source.elapsed_seconds().max(self.last_seconds);
        self.last_seconds = seconds;
        let sample = TimeSample {
            seconds,
            frame_index: self.frame,
        };
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Best-effort frame-rate cap.
///
/// Deadlines advance by a fixed interval so the cadence holds steady; if the
/// loop falls more than one interval behind, the schedule restarts from the
/// current instant instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next_frame: Option<Instant>,
}

impl FramePacer {
    pub fn new(target_fps: f32) -> Self {
        let fps = if target_fps.is_finite() && target_fps > 0.0 {
            target_fps
        } else {
            tracing::warn!(target_fps, "invalid frame rate; falling back to 60 FPS");
            60.0
        };
        Self {
            interval: Duration::from_secs_f32(1.0 / fps),
            next_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        self.next_frame.is_none_or(|deadline| now >= deadline)
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        let base = match self.next_frame {
            Some(deadline) if now.saturating_duration_since(deadline) < self.interval => deadline,
            _ => now,
        };
        self.next_frame = Some(base + self.interval);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_frame
    }
}

/// Render loop state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// The subset of window events the loop reacts to.
#[derive(Debug, Clone, Copy)]
pub enum LoopInput<'a> {
    CloseRequested,
    Key { key: &'a Key, state: ElementState },
    Other,
}

impl LoopState {
    pub fn advance(self, input: LoopInput<'_>) -> Self {
        match (self, input) {
            (LoopState::Stopped, _) => LoopState::Stopped,
            (LoopState::Running, LoopInput::CloseRequested) => LoopState::Stopped,
            (
                LoopState::Running,
                LoopInput::Key {
                    key: Key::Named(named),
                    state: ElementState::Pressed,
                },
            ) if *named == EXIT_KEY => LoopState::Stopped,
            (LoopState::Running, _) => LoopState::Running,
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, LoopState::Running)
    }

    /// True only for the Running → Stopped transition.
    pub fn stops_at(self, next: LoopState) -> bool {
        self.is_running() && !next.is_running()
    }
}
