use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::{Error, SceneKitConfig};

const SCENE_KIT_CONFIG_ENV_NAME: &str = "SCENE_KIT_CONFIG_PATH";

/// Get the config path from input or env SCENE_KIT_CONFIG_PATH
pub fn get_scene_kit_config(config: Option<PathBuf>) -> Option<PathBuf> {
    if config.is_some() {
        config
    } else {
        std::env::var(SCENE_KIT_CONFIG_ENV_NAME)
            .map(|s| {
                warn!("### ENV VAR {s} is used ###");
                PathBuf::from(s)
            })
            .ok()
    }
}

/// Load the config file, or the default config if no path is given
pub fn resolve_scene_kit_config(config_path: Option<&Path>) -> Result<SceneKitConfig, Error> {
    match config_path {
        Some(path) => SceneKitConfig::try_new(path),
        None => Ok(SceneKitConfig::default()),
    }
}

/// Install the `tracing` subscriber, filtered by `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}
