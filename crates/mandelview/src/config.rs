//! Environment overrides layered on top of `RendererConfig::default()`.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use renderer::{RendererConfig, VsyncMode};

/// Font file for the FPS label.
pub const FONT_VAR: &str = "MANDELVIEW_FONT";
/// Swapchain pacing: `on|off|true|false|1|0`.
pub const VSYNC_VAR: &str = "MANDELVIEW_VSYNC";

pub fn config_from_env() -> Result<RendererConfig> {
    config_from_lookup(|name| env::var(name).ok())
}

/// Builds the configuration from `lookup`, which resolves variable names.
pub fn config_from_lookup<F>(lookup: F) -> Result<RendererConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RendererConfig::default();

    if let Some(font) = lookup(FONT_VAR) {
        let font = font.trim();
        if font.is_empty() {
            bail!("{FONT_VAR} is set but empty");
        }
        config.overlay.font_path = Some(PathBuf::from(font));
    }

    if let Some(value) = lookup(VSYNC_VAR) {
        config.vsync = parse_vsync(&value)?;
    }

    Ok(config)
}

fn parse_vsync(value: &str) -> Result<VsyncMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(VsyncMode::On),
        "off" | "false" | "0" => Ok(VsyncMode::Off),
        other => bail!("{VSYNC_VAR} must be one of on, off, true, false, 1 or 0 (got {other:?})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = config_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, RendererConfig::default());
        assert_eq!(config.vsync, VsyncMode::On);
        assert_eq!(config.window_size, (800, 600));
    }

    #[test]
    fn font_override_replaces_default_path() {
        let config =
            config_from_lookup(lookup_from(&[(FONT_VAR, "/usr/share/fonts/DejaVuSans.ttf")]))
                .unwrap();
        assert_eq!(
            config.overlay.font_path.as_deref(),
            Some(Path::new("/usr/share/fonts/DejaVuSans.ttf"))
        );
    }

    #[test]
    fn blank_font_is_rejected() {
        assert!(config_from_lookup(lookup_from(&[(FONT_VAR, "  ")])).is_err());
    }

    #[test]
    fn vsync_accepts_common_spellings() {
        for value in ["on", "TRUE", "1", " On "] {
            let config = config_from_lookup(lookup_from(&[(VSYNC_VAR, value)])).unwrap();
            assert_eq!(config.vsync, VsyncMode::On, "{value}");
        }
        for value in ["off", "False", "0"] {
            let config = config_from_lookup(lookup_from(&[(VSYNC_VAR, value)])).unwrap();
            assert_eq!(config.vsync, VsyncMode::Off, "{value}");
        }
    }

    #[test]
    fn unknown_vsync_value_is_an_error() {
        let err = config_from_lookup(lookup_from(&[(VSYNC_VAR, "sometimes")])).unwrap_err();
        assert!(err.to_string().contains(VSYNC_VAR));
    }
}
