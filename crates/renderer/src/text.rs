use std::path::{Path, PathBuf};

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use tracing::{debug, warn};

use crate::types::OverlaySettings;

/// Side length of a built-in bitmap glyph in texels.
const BUILTIN_GLYPH_SIZE: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} does not contain a usable TrueType/OpenType font")]
    InvalidData(PathBuf),
}

/// Reads and parses a font file.
pub fn load_font(path: &Path) -> Result<Font<'static>, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| FontError::InvalidData(path.to_path_buf()))
}

enum Typeface {
    TrueType(Font<'static>),
    Builtin,
}

/// Draws single-line labels onto fixed-size transparent bitmaps.
pub struct LabelRasterizer {
    typeface: Typeface,
    bitmap_size: (u32, u32),
    origin: (i32, i32),
    glyph_height: f32,
    fill: Rgba<u8>,
}

impl LabelRasterizer {
    /// Loads the configured font, degrading to the built-in bitmap font when it
    /// is unset, missing, or unreadable.
    pub fn load(settings: &OverlaySettings) -> Self {
        let typeface = match settings.font_path.as_deref() {
            Some(path) => match load_font(path) {
                Ok(font) => {
                    debug!(path = %path.display(), "loaded overlay font");
                    Typeface::TrueType(font)
                }
                Err(err) => {
                    warn!(error = %err, "falling back to built-in overlay font");
                    Typeface::Builtin
                }
            },
            None => Typeface::Builtin,
        };

        Self {
            typeface,
            bitmap_size: settings.bitmap_size,
            origin: settings.text_origin,
            glyph_height: settings.glyph_height,
            fill: Rgba(settings.fill),
        }
    }

    pub fn bitmap_size(&self) -> (u32, u32) {
        self.bitmap_size
    }

    pub fn uses_builtin_font(&self) -> bool {
        matches!(self.typeface, Typeface::Builtin)
    }

    /// Renders `text` in top-down row order. Pixels outside glyphs stay fully
    /// transparent; glyph pixels carry the fill colour with coverage in alpha.
    pub fn rasterize(&self, text: &str) -> RgbaImage {
        let (width, height) = self.bitmap_size;
        let mut bitmap = RgbaImage::new(width, height);
        match &self.typeface {
            Typeface::TrueType(font) => self.draw_truetype(&mut bitmap, font, text),
            Typeface::Builtin => self.draw_builtin(&mut bitmap, text),
        }
        bitmap
    }

    fn draw_truetype(&self, bitmap: &mut RgbaImage, font: &Font<'static>, text: &str) {
        let scale = Scale::uniform(self.glyph_height);
        let ascent = font.v_metrics(scale).ascent;
        let start = point(self.origin.0 as f32, self.origin.1 as f32 + ascent);
        for glyph in font.layout(text, scale, start) {
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|x, y, coverage| {
                self.blend(
                    bitmap,
                    bounds.min.x + x as i32,
                    bounds.min.y + y as i32,
                    coverage,
                );
            });
        }
    }

    fn draw_builtin(&self, bitmap: &mut RgbaImage, text: &str) {
        let cell = ((self.glyph_height / BUILTIN_GLYPH_SIZE as f32).round() as i32).max(1);
        let mut pen_x = self.origin.0;
        for ch in text.chars() {
            let rows = BASIC_FONTS.get(ch).unwrap_or([0; 8]);
            for (row_index, row) in rows.iter().enumerate() {
                for column in 0..BUILTIN_GLYPH_SIZE {
                    if row & (1 << column) == 0 {
                        continue;
                    }
                    let x0 = pen_x + column as i32 * cell;
                    let y0 = self.origin.1 + row_index as i32 * cell;
                    for dy in 0..cell {
                        for dx in 0..cell {
                            self.blend(bitmap, x0 + dx, y0 + dy, 1.0);
                        }
                    }
                }
            }
            pen_x += BUILTIN_GLYPH_SIZE as i32 * cell;
        }
    }

    fn blend(&self, bitmap: &mut RgbaImage, x: i32, y: i32, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= bitmap.width() || y as u32 >= bitmap.height() {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * self.fill[3] as f32).round() as u8;
        if alpha == 0 {
            return;
        }
        let pixel = bitmap.get_pixel_mut(x as u32, y as u32);
        if alpha > pixel[3] {
            *pixel = Rgba([self.fill[0], self.fill[1], self.fill[2], alpha]);
        }
    }
}
