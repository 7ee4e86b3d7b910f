//! Stamp Pipeline - Single Entry Point
//!
//! `stamp` is the one orchestration path: format the version label, validate
//! the configuration (fail fast, before any image I/O), then render. The
//! qualifier run is drawn only when qualifier display was requested AND the
//! raw label actually carries a fourth segment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::annotate::{self, AnnotateError};
use crate::config::{ConfigError, RenderConfig, StampRequest};
use crate::version::{self, VersionError};

#[derive(Debug, Error)]
pub enum StampError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create target image: {0}")]
    CreateImage(#[from] AnnotateError),
}

/// Report of a completed stamp operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampOutcome {
    pub display_version: String,
    pub qualifier: Option<String>,
    pub output_image: PathBuf,
}

/// Stamp the version label onto the base image per the request.
pub fn stamp(request: &StampRequest) -> Result<StampOutcome, StampError> {
    let formatted = version::parse(&request.version_label)?;

    let qualifier = if request.show_qualifier {
        formatted.qualifier.clone()
    } else {
        None
    };

    let config = RenderConfig::from_request(request, qualifier.is_some())?;

    annotate::render(&config, &formatted.display, qualifier.as_deref())?;

    Ok(StampOutcome {
        display_version: formatted.display,
        qualifier,
        output_image: config.output_image,
    })
}
