/// Fixed window width in physical pixels.
pub const WINDOW_WIDTH: u32 = 800;

/// Fixed window height in physical pixels.
pub const WINDOW_HEIGHT: u32 = 800;

/// Frame-rate cap for the render loop.
pub const TARGET_FPS: f32 = 60.0;

/// Immutable configuration passed to the renderer at start-up.
///
/// There is exactly one supported configuration; [`Default`] produces it.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Window size in physical pixels. Also the value of the `resolution` uniform.
    pub surface_size: (u32, u32),
    /// Frames per second the loop is paced to.
    pub target_fps: f32,
    /// Window title.
    pub title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (WINDOW_WIDTH, WINDOW_HEIGHT),
            target_fps: TARGET_FPS,
            title: "Mandelbrot".to_string(),
        }
    }
}

impl RendererConfig {
    /// Value pushed to the `resolution` uniform once at setup.
    pub fn resolution(&self) -> [f32; 2] {
        [self.surface_size.0 as f32, self.surface_size.1 as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_800_square_at_60_fps() {
        let config = RendererConfig::default();
        assert_eq!(config.surface_size, (800, 800));
        assert_eq!(config.target_fps, 60.0);
        assert_eq!(config.resolution(), [800.0, 800.0]);
    }
}
