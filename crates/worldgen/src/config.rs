use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::height::HeightParams;

const DEFAULT_WIDTH: u32 = 20;
const DEFAULT_DEPTH: u32 = 20;
const DEFAULT_LOOKAHEAD_MARGIN: f32 = 5.0;
const DEFAULT_BATCH_SIZE: u32 = 250;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid width must be at least 1 column")]
    ZeroWidth,
    #[error("strip depth must be at least 1 row")]
    ZeroDepth,
    #[error("batch size must be at least 1 while wireframe visualization is enabled")]
    ZeroBatchSize,
    #[error("lookahead margin must be finite and non-negative, got {0}")]
    InvalidMargin(f32),
    #[error("parameter `{0}` must be finite")]
    NonFinite(&'static str),
    #[error("parameter `{name}` must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridCfg {
    /// Quads per row; every row holds `width + 1` vertices.
    pub width: u32,
    /// Rows kept live in the window.
    pub depth: u32,
    /// Distance the viewpoint must lead the trailing row before a shift.
    pub lookahead_margin: f32,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            depth: DEFAULT_DEPTH,
            lookahead_margin: DEFAULT_LOOKAHEAD_MARGIN,
        }
    }
}

impl GridCfg {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if !self.lookahead_margin.is_finite() || self.lookahead_margin < 0.0 {
            return Err(ConfigError::InvalidMargin(self.lookahead_margin));
        }
        Ok(())
    }

    pub fn stride(&self) -> usize {
        self.width as usize + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WireframeCfg {
    pub visualize_verts: bool,
    pub vert_scale: f32,
    pub visualize_lines: bool,
    pub line_thickness: f32,
    pub batch_size: u32,
}

impl Default for WireframeCfg {
    fn default() -> Self {
        Self {
            visualize_verts: false,
            vert_scale: 0.15,
            visualize_lines: false,
            line_thickness: 0.05,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl WireframeCfg {
    pub fn enabled(&self) -> bool {
        self.visualize_verts || self.visualize_lines
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled() {
            return Ok(());
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if !self.vert_scale.is_finite() {
            return Err(ConfigError::NonFinite("vert_scale"));
        }
        if !self.line_thickness.is_finite() {
            return Err(ConfigError::NonFinite("line_thickness"));
        }
        Ok(())
    }

    pub fn disabled() -> Self {
        Self {
            visualize_verts: false,
            visualize_lines: false,
            ..Self::default()
        }
    }
}

/// Everything needed to build a [`crate::Strip`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StripConfig {
    pub grid: GridCfg,
    pub height: HeightParams,
    pub wireframe: WireframeCfg,
}

impl StripConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.height.validate()?;
        self.wireframe.validate()
    }
}
