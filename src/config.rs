//! Invocation Parameters and Render Configuration
//!
//! `StampRequest` mirrors the raw invocation parameter table. It is turned
//! into an immutable `RenderConfig` exactly once, with every configuration
//! error reported before any image I/O begins.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Applied when no size is configured or the configured size is not positive.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Applied when no color is configured.
pub const DEFAULT_COLOR: [u8; 3] = [0, 0, 0];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("You must provide a custom font resource file when using a custom font name")]
    MissingFontResource,

    #[error("Color parameter has not the expected format eg: 0f125e, got: {0}")]
    InvalidColor(String),

    #[error("Qualifier coordinates are required when a qualifier is rendered")]
    MissingQualifierPosition,
}

/// Raw invocation parameters, one field per external parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampRequest {
    pub base_image_path: PathBuf,
    pub output_image_path: PathBuf,
    pub output_image_format: String,
    pub x_location: i32,
    pub y_location: i32,
    #[serde(default)]
    pub qualifier_x: Option<i32>,
    #[serde(default)]
    pub qualifier_y: Option<i32>,
    pub version_label: String,
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub font_resource_path: Option<PathBuf>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub show_qualifier: bool,
    #[serde(default = "default_bold")]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

fn default_bold() -> bool {
    true
}

/// Where the annotation font comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSource {
    /// A platform font resolved at render time.
    Default,
    /// A caller-supplied font face file.
    Custom { name: String, path: PathBuf },
}

/// Validated, immutable rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub base_image: PathBuf,
    pub output_image: PathBuf,
    pub output_format: String,
    pub position: (i32, i32),
    pub qualifier_position: Option<(i32, i32)>,
    pub font: FontSource,
    pub font_size: f32,
    pub color: [u8; 3],
    pub bold: bool,
    pub italic: bool,
}

impl RenderConfig {
    /// Validate raw parameters into a configuration.
    ///
    /// `render_qualifier` is true when the pipeline decided a qualifier run
    /// will actually be drawn; only then are qualifier coordinates required.
    pub fn from_request(req: &StampRequest, render_qualifier: bool) -> Result<Self, ConfigError> {
        let font = match (&req.font_name, &req.font_resource_path) {
            (Some(name), Some(path)) => FontSource::Custom {
                name: name.clone(),
                path: path.clone(),
            },
            (Some(_), None) => return Err(ConfigError::MissingFontResource),
            // A resource path without a font name is ignored.
            (None, _) => FontSource::Default,
        };

        let font_size = match req.font_size {
            Some(size) if size > 0.0 => size,
            _ => DEFAULT_FONT_SIZE,
        };

        let color = match &req.color {
            Some(raw) if !raw.is_empty() => parse_color(raw)?,
            _ => DEFAULT_COLOR,
        };

        let qualifier_position = if render_qualifier {
            match (req.qualifier_x, req.qualifier_y) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => return Err(ConfigError::MissingQualifierPosition),
            }
        } else {
            None
        };

        Ok(Self {
            base_image: req.base_image_path.clone(),
            output_image: req.output_image_path.clone(),
            output_format: req.output_image_format.clone(),
            position: (req.x_location, req.y_location),
            qualifier_position,
            font,
            font_size,
            color,
            bold: req.bold,
            italic: req.italic,
        })
    }
}

/// Parse a hex color, with or without the leading `#`, into RGB.
///
/// The normalized form must be exactly `#` plus six hex digits.
pub fn parse_color(raw: &str) -> Result<[u8; 3], ConfigError> {
    let normalized = if raw.starts_with('#') {
        raw.to_string()
    } else {
        format!("#{raw}")
    };
    if normalized.len() != 7 {
        return Err(ConfigError::InvalidColor(normalized));
    }

    let mut rgb = [0u8; 3];
    for (slot, range) in rgb.iter_mut().zip([1..3, 3..5, 5..7]) {
        *slot = normalized
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| ConfigError::InvalidColor(normalized.clone()))?;
    }
    Ok(rgb)
}
