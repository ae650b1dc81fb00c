use std::path::PathBuf;

/// Presentation pacing requested for the swapchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VsyncMode {
    /// Present on vertical blank (`Fifo`).
    #[default]
    On,
    /// Present as fast as possible, preferring `Immediate`, then `Mailbox`.
    Off,
}

impl std::fmt::Display for VsyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VsyncMode::On => f.write_str("on"),
            VsyncMode::Off => f.write_str("off"),
        }
    }
}

/// How the frames-per-second label is rasterized.
///
/// The bitmap always has the same logical size in texels regardless of the
/// window size or display scale; the compositor maps it 1:1 onto framebuffer
/// pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    /// Bitmap width and height in texels.
    pub bitmap_size: (u32, u32),
    /// Top-left pen position of the label inside the bitmap.
    pub text_origin: (i32, i32),
    /// Glyph height in pixels.
    pub glyph_height: f32,
    /// RGBA fill used for glyph coverage.
    pub fill: [u8; 4],
    /// TrueType/OpenType font to load. `None` uses the built-in bitmap font.
    pub font_path: Option<PathBuf>,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            bitmap_size: (256, 64),
            text_origin: (10, 10),
            glyph_height: 24.0,
            fill: [255, 255, 255, 255],
            font_path: Some(PathBuf::from("arial.ttf")),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub window_size: (u32, u32),
    /// Initial outer window position in physical pixels.
    pub window_position: (i32, i32),
    /// Window title.
    pub title: String,
    /// Swapchain pacing.
    pub vsync: VsyncMode,
    /// FPS label rasterization.
    pub overlay: OverlaySettings,
}

impl Default for RendererConfig {
    /// An 800x600 window at (100, 100) with vsync and the default overlay.
    fn default() -> Self {
        Self {
            window_size: (800, 600),
            window_position: (100, 100),
            title: "Mandelbrot".to_string(),
            vsync: VsyncMode::default(),
            overlay: OverlaySettings::default(),
        }
    }
}
