use std::time::{Duration, Instant};

use image::imageops::flip_vertical_in_place;
use image::RgbaImage;
use tracing::debug;

use crate::text::LabelRasterizer;

/// Length of one frame-counting window.
pub const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Frames counted over one-second wall-clock windows.
#[derive(Debug, Clone, Copy)]
pub struct FpsSample {
    frame_count: u32,
    window_start: Instant,
    last_computed_fps: u32,
}

impl FpsSample {
    pub fn new(window_start: Instant) -> Self {
        Self {
            frame_count: 0,
            window_start,
            last_computed_fps: 0,
        }
    }

    /// Records one rendered frame. Returns the completed window's frame count
    /// when `now` closes the current window.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frame_count = self.frame_count.saturating_add(1);
        if now.saturating_duration_since(self.window_start) < SAMPLE_WINDOW {
            return None;
        }
        self.last_computed_fps = self.frame_count;
        self.frame_count = 0;
        self.window_start = now;
        Some(self.last_computed_fps)
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn last_computed_fps(&self) -> u32 {
        self.last_computed_fps
    }

    pub fn window_start(&self) -> Instant {
        self.window_start
    }
}

/// Turns completed sampling windows into label bitmaps ready for upload.
pub struct FpsOverlay {
    sample: FpsSample,
    rasterizer: LabelRasterizer,
}

impl FpsOverlay {
    pub fn new(rasterizer: LabelRasterizer, start: Instant) -> Self {
        Self {
            sample: FpsSample::new(start),
            rasterizer,
        }
    }

    pub fn sample(&self) -> &FpsSample {
        &self.sample
    }

    pub fn bitmap_size(&self) -> (u32, u32) {
        self.rasterizer.bitmap_size()
    }

    /// Counts a frame. When a window completes while the overlay is shown,
    /// returns the new label already flipped to bottom-up row order.
    ///
    /// Glyphs are rasterized at most once per window, never per frame.
    pub fn tick(&mut self, now: Instant, overlay_enabled: bool) -> Option<RgbaImage> {
        let fps = self.sample.tick(now)?;
        debug!(fps, overlay = overlay_enabled, "fps window completed");
        if !overlay_enabled {
            return None;
        }
        let mut bitmap = self.rasterizer.rasterize(&fps_label(fps));
        flip_vertical_in_place(&mut bitmap);
        Some(bitmap)
    }
}

/// Text drawn into the overlay bitmap for a completed window.
pub fn fps_label(fps: u32) -> String {
    format!("FPS: {fps}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OverlaySettings;

    fn builtin_overlay(start: Instant) -> FpsOverlay {
        let settings = OverlaySettings {
            font_path: None,
            ..OverlaySettings::default()
        };
        FpsOverlay::new(LabelRasterizer::load(&settings), start)
    }

    #[test]
    fn counts_ticks_within_a_window() {
        let start = Instant::now();
        let mut sample = FpsSample::new(start);
        for i in 0..57u64 {
            let now = start + Duration::from_millis(i * 17);
            assert_eq!(sample.tick(now), None);
        }
        assert_eq!(sample.frame_count(), 57);
        assert_eq!(sample.last_computed_fps(), 0);
    }

    #[test]
    fn boundary_tick_closes_the_window() {
        let start = Instant::now();
        let mut sample = FpsSample::new(start);
        for _ in 0..56 {
            sample.tick(start + Duration::from_millis(500));
        }
        let boundary = start + Duration::from_secs(1);
        assert_eq!(sample.tick(boundary), Some(57));
        assert_eq!(sample.last_computed_fps(), 57);
        assert_eq!(sample.frame_count(), 0);
        assert_eq!(sample.window_start(), boundary);
    }

    #[test]
    fn late_boundary_restarts_window_at_now() {
        let start = Instant::now();
        let mut sample = FpsSample::new(start);
        let late = start + Duration::from_millis(1_750);
        assert_eq!(sample.tick(late), Some(1));
        assert_eq!(sample.window_start(), late);
        assert_eq!(sample.tick(late + Duration::from_millis(999)), None);
    }

    #[test]
    fn label_formats_count() {
        assert_eq!(fps_label(57), "FPS: 57");
        assert_eq!(fps_label(0), "FPS: 0");
    }

    #[test]
    fn hidden_overlay_skips_rasterization() {
        let start = Instant::now();
        let mut overlay = builtin_overlay(start);
        assert!(overlay.tick(start, false).is_none());
        assert!(overlay
            .tick(start + Duration::from_secs(1), false)
            .is_none());
        assert_eq!(overlay.sample().last_computed_fps(), 2);
    }

    #[test]
    fn visible_overlay_produces_bitmap_once_per_window() {
        let start = Instant::now();
        let mut overlay = builtin_overlay(start);
        let mut produced = 0;
        for i in 0..120u64 {
            let now = start + Duration::from_millis(i * 25);
            if overlay.tick(now, true).is_some() {
                produced += 1;
            }
        }
        // 120 frames at 25ms span 2.975s: windows close at 1.0s and 2.0s.
        assert_eq!(produced, 2);
    }

    #[test]
    fn produced_bitmap_matches_configured_size() {
        let start = Instant::now();
        let mut overlay = builtin_overlay(start);
        let bitmap = overlay
            .tick(start + SAMPLE_WINDOW, true)
            .expect("window completed");
        assert_eq!(bitmap.dimensions(), (256, 64));
        assert_eq!(overlay.bitmap_size(), (256, 64));
    }
}
