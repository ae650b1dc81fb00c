//! Escape-time Mandelbrot evaluation.
//!
//! The GPU program in `compile.rs` is the only render path. The functions here
//! mirror its arithmetic on the CPU so the coordinate mapping and colouring
//! policy can be checked without a device.

use crate::animation::AnimationParams;

/// Squared magnitude past which an orbit is considered escaped.
pub const ESCAPE_RADIUS_SQUARED: f32 = 4.0;

/// Two triangles covering normalized device coordinates.
pub const FULLSCREEN_QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
];

/// Maps a normalized device coordinate onto the complex plane.
///
/// Only the horizontal axis is stretched by the aspect ratio, which keeps the
/// set circularly symmetric on non-square viewports.
pub fn complex_point(ndc: [f32; 2], params: &AnimationParams) -> [f32; 2] {
    let uv = [ndc[0] * params.aspect_ratio, ndc[1]];
    [
        uv[0] * params.zoom + params.center[0],
        uv[1] * params.zoom + params.center[1],
    ]
}

/// Iterates `z <- z^2 + c` from zero and returns the number of steps taken
/// before the orbit escaped, or `max_iterations` if it never did.
pub fn escape_iterations(c: [f32; 2], max_iterations: i32) -> i32 {
    let (mut x, mut y) = (0.0f32, 0.0f32);
    let mut i = 0;
    while i < max_iterations {
        if x * x + y * y > ESCAPE_RADIUS_SQUARED {
            break;
        }
        let next_x = x * x - y * y + c[0];
        y = 2.0 * x * y + c[1];
        x = next_x;
        i += 1;
    }
    i
}

/// Colour the fragment program writes for `ndc`.
pub fn shade(ndc: [f32; 2], params: &AnimationParams) -> [f32; 4] {
    let c = complex_point(ndc, params);
    let budget = params.max_iterations.max(1);
    let t = escape_iterations(c, budget) as f32 / budget as f32;
    [
        params.base_color[0] * t,
        params.base_color[1] * t,
        params.base_color[2] * t,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::compute_params;

    fn params(center: [f32; 2], zoom: f32, aspect_ratio: f32) -> AnimationParams {
        AnimationParams {
            center,
            zoom,
            base_color: [1.0, 0.5, 0.25],
            max_iterations: 300,
            aspect_ratio,
        }
    }

    #[test]
    fn mirrored_points_are_symmetric_about_center() {
        let view = params([-0.2, 0.1], 0.5, 1.0);
        for &(x, y) in &[(0.3, 0.2), (0.9, -0.7), (1.0, 1.0), (0.01, -0.5)] {
            let right = complex_point([x, y], &view);
            let left = complex_point([-x, y], &view);
            assert!(((right[0] - view.center[0]) + (left[0] - view.center[0])).abs() < 1e-6);
            assert_eq!(right[1], left[1]);
        }
    }

    #[test]
    fn aspect_ratio_scales_horizontal_extent_only() {
        let square = params([-0.5, 0.0], 0.5, 1.0);
        let wide = params([-0.5, 0.0], 0.5, 2.0);
        let corner = [1.0, 1.0];
        let a = complex_point(corner, &square);
        let b = complex_point(corner, &wide);
        let square_half_width = a[0] - square.center[0];
        let wide_half_width = b[0] - wide.center[0];
        assert!((wide_half_width - 2.0 * square_half_width).abs() < 1e-6);
        assert_eq!(a[1], b[1]);
    }

    #[test]
    fn interior_points_use_full_budget() {
        assert_eq!(escape_iterations([0.0, 0.0], 300), 300);
        assert_eq!(escape_iterations([-1.0, 0.0], 300), 300);
    }

    #[test]
    fn exterior_points_escape_quickly() {
        assert!(escape_iterations([2.0, 2.0], 300) <= 2);
        assert!(escape_iterations([1.0, 1.0], 300) < 10);
    }

    #[test]
    fn shading_brightens_towards_the_set() {
        let view = params([0.0, 0.0], 1.0, 1.0);
        let inside = shade([0.0, 0.0], &view);
        let outside = shade([1.0, 1.0], &view);
        assert_eq!(inside, [1.0, 0.5, 0.25, 1.0]);
        assert!(outside[0] < 0.1);
        assert_eq!(outside[3], 1.0);
    }

    #[test]
    fn animated_view_shades_every_pixel_opaque() {
        let view = compute_params(12.5, 16.0 / 9.0);
        for vertex in FULLSCREEN_QUAD {
            let color = shade(vertex, &view);
            assert_eq!(color[3], 1.0);
            for channel in &color[..3] {
                assert!((0.0..=1.0).contains(channel));
            }
        }
    }
}
