use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use worldgen::{GridCfg, HeightParams, StripConfig, WireframeCfg};

pub const DEFAULT_CONFIG_PATH: &str = "assets/strip.toml";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraCfg {
    /// Units per second along +z.
    pub speed: f32,
    pub height: f32,
    pub start_z: f32,
    /// Degrees below the horizon.
    pub pitch: f32,
}

impl Default for CameraCfg {
    fn default() -> Self {
        Self {
            speed: 5.0,
            height: 6.0,
            start_z: 0.0,
            pitch: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Resource)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub grid: GridCfg,
    pub height: HeightParams,
    pub wireframe: WireframeCfg,
    pub camera: CameraCfg,
}

impl AppConfig {
    pub fn strip(&self) -> StripConfig {
        StripConfig {
            grid: self.grid,
            height: self.height,
            wireframe: self.wireframe,
        }
    }

    /// Tuning freezes the camera and hides the wireframe.
    pub fn for_tuning(mut self) -> Self {
        self.camera.speed = 0.0;
        self.wireframe = WireframeCfg::disabled();
        self
    }
}

pub fn load_app_config(path: &Path) -> anyhow::Result<AppConfig> {
    let display = path.display();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading strip config from {display}"))?;
    let cfg: AppConfig =
        toml::from_str(&text).with_context(|| format!("deserializing strip config from {display}"))?;
    cfg.strip()
        .validate()
        .with_context(|| format!("validating strip config from {display}"))?;
    Ok(cfg)
}

/// Loads `explicit` if given, else the default file if it exists, else built-in defaults.
pub fn resolve_app_config(explicit: Option<&Path>) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((load_app_config(path)?, Some(path.to_path_buf())));
    }
    let fallback = Path::new(DEFAULT_CONFIG_PATH);
    if fallback.exists() {
        return Ok((load_app_config(fallback)?, Some(fallback.to_path_buf())));
    }
    log::info!("no strip config at {DEFAULT_CONFIG_PATH}, using built-in defaults");
    Ok((AppConfig::default(), None))
}
