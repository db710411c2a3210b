//! Export options (format metadata overrides and normalization switches)
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! identifier = "geometry.zombie"
//! texture_width = 64
//! texture_height = 32
//! flip_uvs = true
//! scale = 16.0
//! ```

use glam::Vec3;
use rig_common::Geometry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bedrock::{
    BedrockDescription, DEFAULT_FORMAT_VERSION, DEFAULT_TEXTURE_SIZE, DEFAULT_VISIBLE_BOUNDS,
};

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid options file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Scale must be finite and non-zero, got {0}")]
    InvalidScale(f32),

    #[error("Texture size must be non-zero, got {width}x{height}")]
    InvalidTextureSize { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    /// Geometry identifier. Default: `geometry.<geometry id>`
    pub identifier: Option<String>,
    /// Default: "1.12.0"
    pub format_version: String,
    /// Default: 64
    pub texture_width: u32,
    /// Default: 64
    pub texture_height: u32,
    /// Default: 1.0
    pub visible_bounds_width: f32,
    /// Default: 1.0
    pub visible_bounds_height: f32,
    /// Default: [0, 0, 0]
    pub visible_bounds_offset: Vec3,

    /// Fill in missing mesh normals before export.
    /// Default: true
    pub generate_normals: bool,
    /// Convert bottom-left UV origin to top-left (`v -> 1 - v`).
    /// Default: false
    pub flip_uvs: bool,
    /// Uniform scale applied to mesh vertices.
    /// Default: 1.0
    pub scale: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            identifier: None,
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            texture_width: DEFAULT_TEXTURE_SIZE,
            texture_height: DEFAULT_TEXTURE_SIZE,
            visible_bounds_width: DEFAULT_VISIBLE_BOUNDS,
            visible_bounds_height: DEFAULT_VISIBLE_BOUNDS,
            visible_bounds_offset: Vec3::ZERO,
            generate_normals: true,
            flip_uvs: false,
            scale: 1.0,
        }
    }
}

impl ExportOptions {
    /// Parse and validate options from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(OptionsError::InvalidScale(self.scale));
        }
        if self.texture_width == 0 || self.texture_height == 0 {
            return Err(OptionsError::InvalidTextureSize {
                width: self.texture_width,
                height: self.texture_height,
            });
        }
        Ok(())
    }

    pub fn identifier_for(&self, geometry: &Geometry) -> String {
        self.identifier
            .clone()
            .unwrap_or_else(|| format!("geometry.{}", geometry.id()))
    }

    /// Description block for `geometry` with these overrides applied
    pub fn description_for(&self, geometry: &Geometry) -> BedrockDescription {
        BedrockDescription {
            identifier: self.identifier_for(geometry),
            texture_width: self.texture_width,
            texture_height: self.texture_height,
            visible_bounds_width: self.visible_bounds_width,
            visible_bounds_height: self.visible_bounds_height,
            visible_bounds_offset: self.visible_bounds_offset,
        }
    }
}
