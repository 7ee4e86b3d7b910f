//! VersionStamp Core - Build Artifact Versioner
//!
//! # The Contract (Non-Negotiable)
//! 1. Version Parsing Is Pure
//! 2. Configuration Is Validated Before Any I/O
//! 3. The Qualifier Needs Both Request And Presence
//! 4. Output Is Atomic - Complete Or Absent
//! 5. Causes Are Preserved, Never Silenced

pub mod annotate;
pub mod config;
pub mod pipeline;
pub mod version;

pub use annotate::{default_font_path, AnnotateError};
pub use config::{
    parse_color, ConfigError, FontSource, RenderConfig, StampRequest, DEFAULT_COLOR,
    DEFAULT_FONT_SIZE,
};
pub use pipeline::{stamp, StampError, StampOutcome};
pub use version::{FormattedVersion, VersionError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
