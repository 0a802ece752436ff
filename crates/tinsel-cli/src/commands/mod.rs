//! CLI command implementations

pub mod check;
pub mod init;
pub mod simulate;
pub mod tables;

use anyhow::Result;
use tinsel_bindings::SceneConfig;

/// Load a config from disk, or fall back to the built-in defaults
pub fn load_config(path: Option<&str>) -> Result<SceneConfig> {
    match path {
        Some(p) => Ok(SceneConfig::load(p)?),
        None => Ok(SceneConfig::default()),
    }
}
