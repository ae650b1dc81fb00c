//! Per-frame view parameters for the animated fractal.
//!
//! Everything here is a pure function of elapsed time so the animation can be
//! evaluated (and tested) without a window or GPU.

/// Escape-iteration budget per pixel. Fixed regardless of zoom depth, so deep
/// zooms under-resolve the set boundary.
pub const MAX_ITERATIONS: i32 = 300;

/// Angular frequency and phase for each colour channel.
const COLOR_WAVES: [(f64, f64); 3] = [(0.7, 0.0), (0.9, 2.0), (1.1, 4.0)];

/// View parameters handed to the fractal program for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParams {
    /// Complex-plane point shown at the middle of the viewport.
    pub center: [f32; 2],
    /// Half-height of the visible region in complex units.
    pub zoom: f32,
    /// Tint reached by points that exhaust the iteration budget.
    pub base_color: [f32; 3],
    /// Escape-iteration budget.
    pub max_iterations: i32,
    /// Framebuffer width divided by height.
    pub aspect_ratio: f32,
}

/// Evaluates the animation at `elapsed_seconds`.
///
/// Zoom oscillates within `[0.25, 0.75]`, the centre drifts along a slow
/// Lissajous curve and each colour channel cycles within `[0, 1]`.
pub fn compute_params(elapsed_seconds: f64, aspect_ratio: f32) -> AnimationParams {
    let t = elapsed_seconds;
    let zoom = 0.5 + 0.25 * (0.5 * t).sin();
    let center = [
        -0.5 + 0.3 * (0.2 * t).cos(),
        0.3 * (0.3 * t).sin(),
    ];
    let base_color = COLOR_WAVES.map(|(frequency, phase)| {
        (0.5 + 0.5 * (frequency * t + phase).sin()) as f32
    });

    AnimationParams {
        center: [center[0] as f32, center[1] as f32],
        zoom: zoom as f32,
        base_color,
        max_iterations: MAX_ITERATIONS,
        aspect_ratio,
    }
}

/// Width over height, treating a zero height as one pixel.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn params_at_time_zero() {
        let params = compute_params(0.0, 1.0);
        assert!(close(params.zoom, 0.5));
        assert!(close(params.center[0], -0.2));
        assert!(close(params.center[1], 0.0));
        assert!(close(params.base_color[0], 0.5));
        assert!(close(params.base_color[1], (0.5 + 0.5 * 2.0f64.sin()) as f32));
        assert!(close(params.base_color[2], (0.5 + 0.5 * 4.0f64.sin()) as f32));
        assert_eq!(params.max_iterations, 300);
        assert_eq!(params.aspect_ratio, 1.0);
    }

    #[test]
    fn zoom_and_color_stay_bounded() {
        let samples = (-4000..4000).map(|step| step as f64 * 0.37);
        let extremes = [-1.0e9, 1.0e9, 123_456.789];
        for t in samples.chain(extremes) {
            let params = compute_params(t, 1.6);
            assert!(
                (0.25..=0.75).contains(&params.zoom),
                "zoom {} out of range at t={t}",
                params.zoom
            );
            for channel in params.base_color {
                assert!((0.0..=1.0).contains(&channel), "channel {channel} at t={t}");
            }
        }
    }

    #[test]
    fn zoom_never_reaches_zero() {
        for step in 0..10_000 {
            let params = compute_params(step as f64 * 0.01, 1.0);
            assert!(params.zoom > 0.0);
        }
    }

    #[test]
    fn aspect_ratio_guards_zero_height() {
        assert_eq!(aspect_ratio(800, 0), 800.0);
        assert!(close(aspect_ratio(1600, 900), 16.0 / 9.0));
    }
}
