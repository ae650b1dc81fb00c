use anyhow::{Context, Result};
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::config::config_from_env;

pub fn run() -> Result<()> {
    let config = config_from_env().context("invalid environment configuration")?;
    tracing::debug!(
        font = ?config.overlay.font_path,
        vsync = %config.vsync,
        "resolved mandelview configuration"
    );
    Renderer::new(config).run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
