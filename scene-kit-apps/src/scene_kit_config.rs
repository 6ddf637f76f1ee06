use std::path::Path;

use scene_kit::{CollisionCheckerConfig, SceneConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;

/// Settings of the `scene_kit` command
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SceneKitConfig {
    #[serde(default)]
    pub collision_checker_config: CollisionCheckerConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl SceneKitConfig {
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_str(
            &fs_err::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            &path,
        )
    }

    pub fn from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        let config: SceneKitConfig =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
        debug!("{config:?}");
        Ok(config)
    }
}
