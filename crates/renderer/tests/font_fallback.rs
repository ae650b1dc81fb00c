use std::fs;

use renderer::text::{load_font, LabelRasterizer};
use renderer::{FontError, OverlaySettings};
use tempfile::tempdir;

fn settings_with_font(path: std::path::PathBuf) -> OverlaySettings {
    OverlaySettings {
        font_path: Some(path),
        ..OverlaySettings::default()
    }
}

#[test]
fn missing_font_falls_back_to_builtin() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("arial.ttf");

    assert!(matches!(load_font(&path), Err(FontError::Io { .. })));

    let rasterizer = LabelRasterizer::load(&settings_with_font(path));
    assert!(rasterizer.uses_builtin_font());
    let bitmap = rasterizer.rasterize("FPS: 60");
    assert!(bitmap.pixels().any(|pixel| pixel[3] > 0));
}

#[test]
fn corrupt_font_falls_back_to_builtin() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.ttf");
    fs::write(&path, b"definitely not a font").unwrap();

    assert!(matches!(load_font(&path), Err(FontError::InvalidData(_))));

    let rasterizer = LabelRasterizer::load(&settings_with_font(path));
    assert!(rasterizer.uses_builtin_font());
    assert_eq!(rasterizer.bitmap_size(), (256, 64));
}

#[test]
fn empty_font_file_is_invalid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.otf");
    fs::write(&path, []).unwrap();

    let err = load_font(&path).unwrap_err();
    assert!(err.to_string().contains("empty.otf"));
}
