//! Image Annotation
//!
//! Loads the base image, draws the version text runs, then encodes and
//! writes the result. Rendering happens fully in memory and the encoded
//! bytes land at the output path through a temporary sibling file plus
//! rename, so a failed run never leaves a partial output file behind.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use thiserror::Error;

use crate::config::{FontSource, RenderConfig};

/// Any failure while producing the target image. The underlying cause is
/// always attached, never swallowed.
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("Failed to read base image {path}: {source}")]
    LoadImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read font resource {path}: {source}")]
    ReadFont {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Font resource {path} is not a usable font face")]
    InvalidFont { path: PathBuf },

    #[error("No usable default font found on this system")]
    NoDefaultFont,

    #[error("Unsupported output image format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode output image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to write output image {path}: {source}")]
    WriteImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

struct FontFamily {
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const DEFAULT_FAMILIES: &[FontFamily] = &[
    FontFamily {
        regular: "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        bold: "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        italic: "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
        bold_italic: "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    },
    FontFamily {
        regular: "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        bold: "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        italic: "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
        bold_italic: "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    },
    FontFamily {
        regular: "/Library/Fonts/Arial.ttf",
        bold: "/Library/Fonts/Arial Bold.ttf",
        italic: "/Library/Fonts/Arial Italic.ttf",
        bold_italic: "/Library/Fonts/Arial Bold Italic.ttf",
    },
    FontFamily {
        regular: "C:\\Windows\\Fonts\\arial.ttf",
        bold: "C:\\Windows\\Fonts\\arialbd.ttf",
        italic: "C:\\Windows\\Fonts\\ariali.ttf",
        bold_italic: "C:\\Windows\\Fonts\\arialbi.ttf",
    },
];

/// Locate a platform default font face for the requested style, falling back
/// to the regular face of the same family when the styled file is absent.
pub fn default_font_path(bold: bool, italic: bool) -> Option<PathBuf> {
    for family in DEFAULT_FAMILIES {
        let styled = match (bold, italic) {
            (true, true) => family.bold_italic,
            (true, false) => family.bold,
            (false, true) => family.italic,
            (false, false) => family.regular,
        };
        for candidate in [styled, family.regular] {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }
    }
    None
}

fn resolve_font(config: &RenderConfig) -> Result<FontVec, AnnotateError> {
    // A custom face file defines its own weight and slant; the style flags
    // only steer default font selection.
    let path = match &config.font {
        FontSource::Custom { path, .. } => path.clone(),
        FontSource::Default => {
            default_font_path(config.bold, config.italic).ok_or(AnnotateError::NoDefaultFont)?
        }
    };
    let bytes = fs::read(&path).map_err(|source| AnnotateError::ReadFont {
        path: path.clone(),
        source,
    })?;
    FontVec::try_from_vec(bytes).map_err(|_| AnnotateError::InvalidFont { path })
}

fn resolve_format(name: &str) -> Result<ImageFormat, AnnotateError> {
    ImageFormat::from_extension(name.to_ascii_lowercase())
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| AnnotateError::UnsupportedFormat(name.to_string()))
}

/// Draw the display version (and qualifier, when supplied) onto the base
/// image and write the encoded result to the configured output path.
///
/// The qualifier position is guaranteed present by config validation
/// whenever a qualifier string is supplied.
pub fn render(
    config: &RenderConfig,
    display_version: &str,
    qualifier: Option<&str>,
) -> Result<(), AnnotateError> {
    let format = resolve_format(&config.output_format)?;
    let font = resolve_font(config)?;

    let base = image::open(&config.base_image).map_err(|source| AnnotateError::LoadImage {
        path: config.base_image.clone(),
        source,
    })?;
    let mut canvas: RgbaImage = base.to_rgba8();

    let scale = PxScale::from(config.font_size);
    let color = Rgba([config.color[0], config.color[1], config.color[2], 255]);

    let (x, y) = config.position;
    draw_text_mut(&mut canvas, color, x, y, scale, &font, display_version);

    if let (Some(text), Some((qx, qy))) = (qualifier, config.qualifier_position) {
        draw_text_mut(&mut canvas, color, qx, qy, scale, &font, text);
    }

    // The JPEG encoder rejects an alpha channel.
    let out = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(canvas)
    };

    let mut encoded = Vec::new();
    out.write_to(&mut Cursor::new(&mut encoded), format)
        .map_err(AnnotateError::Encode)?;

    write_atomic(&config.output_image, &encoded)
}

/// Write through a temporary sibling and rename into place, so the output
/// path either holds the complete image or is untouched.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AnnotateError> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    fs::write(&tmp, bytes).map_err(|source| AnnotateError::WriteImage {
        path: path.to_path_buf(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        AnnotateError::WriteImage {
            path: path.to_path_buf(),
            source,
        }
    })
}
