//! CPU mirror of `shaders/mandelbrot.frag`.
//!
//! Test-only. The GPU evaluates the fragment shader; these functions spell
//! the same per-pixel maths out in Rust so its behaviour (escape counts,
//! colour cycle, swirl) can be checked without a device. The constants are
//! matched against the literals in the compiled shader.

use glam::{vec2, vec3, Vec2, Vec3, Vec4};

/// Iteration cap of the escape-time loop.
pub const MAX_ITERATIONS: u32 = 256;

/// `|z|` above this counts as escaped.
pub const ESCAPE_RADIUS: f32 = 2.0;

/// Uniform scale applied to the centred plane coordinate.
pub const ZOOM: f32 = 1.5;

/// Length of one full colour cycle.
pub const COLOR_PERIOD_SECONDS: f32 = 10.0;

pub const ROTATION_SPEED: f32 = 0.1;
pub const SWIRL_PER_PIXEL: f32 = 0.01;
pub const GREEN_PHASE: f32 = 0.333;
pub const BLUE_PHASE: f32 = 0.666;

/// Standard counter-clockwise 2D rotation.
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sina, cosa) = angle.sin_cos();
    vec2(cosa * v.x - sina * v.y, sina * v.x + cosa * v.y)
}

/// Maps a bottom-left-origin pixel coordinate into the zoomed complex plane,
/// before any rotation.
pub fn plane_coordinate(frag_coord: Vec2, resolution: Vec2) -> Vec2 {
    let mut uv = frag_coord / resolution;
    uv = uv * 2.0 - 1.0;
    uv.x *= resolution.x / resolution.y;
    uv * ZOOM
}

/// Applies the two position-dependent rotations.
pub fn swirl(uv: Vec2, frag_coord: Vec2, time: f32) -> Vec2 {
    let spin = time * ROTATION_SPEED;
    let uv = rotate(uv, spin + frag_coord.x * SWIRL_PER_PIXEL);
    rotate(uv, spin + frag_coord.y * SWIRL_PER_PIXEL)
}

/// Number of iterations of `z = z² + c` (starting at `z = c`) completed
/// before `|z|` exceeded [`ESCAPE_RADIUS`]; [`MAX_ITERATIONS`] if it never did.
pub fn escape_iterations(c: Vec2) -> u32 {
    let mut z = c;
    for i in 0..MAX_ITERATIONS {
        if z.length() > ESCAPE_RADIUS {
            return i;
        }
        z = vec2(z.x * z.x - z.y * z.y, 2.0 * z.x * z.y) + c;
    }
    MAX_ITERATIONS
}

/// Position within the colour cycle, in `[0, 1)`.
pub fn cycle_phase(time: f32) -> f32 {
    time.rem_euclid(COLOR_PERIOD_SECONDS) / COLOR_PERIOD_SECONDS
}

/// Unscaled colour for the given time. Channels range over `[-4, 4]`; the
/// framebuffer clamps them.
pub fn palette(time: f32) -> Vec3 {
    let t = cycle_phase(time);
    vec3(
        t * 8.0 - 4.0,
        (t + GREEN_PHASE).fract() * 8.0 - 4.0,
        (t + BLUE_PHASE).fract() * 8.0 - 4.0,
    )
}

/// Full fragment colour for a pixel.
pub fn shade(frag_coord: Vec2, resolution: Vec2, time: f32) -> Vec4 {
    let uv = plane_coordinate(frag_coord, resolution);
    let c = swirl(uv, frag_coord, time);
    let escape = escape_iterations(c) as f32 / MAX_ITERATIONS as f32;
    (palette(time) * escape).extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLUTION: Vec2 = Vec2::new(800.0, 800.0);

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_iterations(Vec2::ZERO), MAX_ITERATIONS);
    }

    #[test]
    fn period_two_cycle_never_escapes() {
        assert_eq!(escape_iterations(vec2(-1.0, 0.0)), MAX_ITERATIONS);
    }

    #[test]
    fn points_outside_radius_escape_immediately() {
        assert_eq!(escape_iterations(vec2(3.0, 0.0)), 0);
        assert_eq!(escape_iterations(vec2(0.0, -2.5)), 0);
    }

    #[test]
    fn reports_first_escape_index() {
        // z: 1 -> 2 -> 5; |2| is not > 2, so escape is seen at index 2.
        assert_eq!(escape_iterations(vec2(1.0, 0.0)), 2);
        // z: 0.5 -> 0.75 -> 1.0625 -> 1.6289 -> 3.1533
        assert_eq!(escape_iterations(vec2(0.5, 0.0)), 4);
    }

    #[test]
    fn escape_count_is_bounded() {
        for step in 0..=40 {
            let x = -2.0 + step as f32 * 0.1;
            for row in 0..=40 {
                let y = -2.0 + row as f32 * 0.1;
                assert!(escape_iterations(vec2(x, y)) <= MAX_ITERATIONS);
            }
        }
    }

    #[test]
    fn colour_cycle_repeats_every_ten_seconds() {
        assert_eq!(palette(0.0), palette(10.0));
        assert_eq!(palette(2.5), palette(12.5));
        assert_eq!(cycle_phase(5.0), 0.5);
        assert_eq!(cycle_phase(10.0), 0.0);
    }

    #[test]
    fn palette_channels_are_phase_shifted() {
        let colour = palette(0.0);
        assert_eq!(colour.x, -4.0);
        assert!((colour.y - (0.333 * 8.0 - 4.0)).abs() < 1e-5);
        assert!((colour.z - (0.666 * 8.0 - 4.0)).abs() < 1e-5);
    }

    #[test]
    fn zero_rotation_is_identity() {
        let v = vec2(0.3, -1.2);
        assert_eq!(rotate(v, 0.0), v);
        assert_eq!(swirl(v, Vec2::ZERO, 0.0), v);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = vec2(1.5, -0.25);
        let rotated = swirl(v, vec2(123.0, 456.0), 7.0);
        assert!((rotated.length() - v.length()).abs() < 1e-5);
    }

    #[test]
    fn plane_coordinate_centres_and_zooms() {
        assert_eq!(plane_coordinate(vec2(400.0, 400.0), RESOLUTION), Vec2::ZERO);
        assert_eq!(plane_coordinate(vec2(800.0, 800.0), RESOLUTION), vec2(1.5, 1.5));
        assert_eq!(plane_coordinate(Vec2::ZERO, RESOLUTION), vec2(-1.5, -1.5));
    }

    #[test]
    fn plane_coordinate_corrects_aspect() {
        let wide = vec2(1600.0, 800.0);
        assert_eq!(plane_coordinate(vec2(1600.0, 400.0), wide), vec2(3.0, 0.0));
    }

    #[test]
    fn centre_pixel_shows_full_palette() {
        let colour = shade(vec2(400.0, 400.0), RESOLUTION, 5.0);
        assert_eq!(colour.truncate(), palette(5.0));
        assert_eq!(colour.w, 1.0);
    }

    #[test]
    fn corner_pixel_escapes_to_black() {
        for time in [0.0, 3.0, 9.9, 42.0] {
            let colour = shade(vec2(0.5, 0.5), RESOLUTION, time);
            assert_eq!(colour.truncate(), Vec3::ZERO);
            assert_eq!(colour.w, 1.0);
        }
    }
}
