//! VersionStamp CLI
//!
//! Stamps a formatted version label onto a base image.
//! Outputs a JSON report with --json
//! Returns non-zero on failure

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use versionstamp_core::{stamp, StampError, StampRequest};

#[derive(Parser)]
#[command(name = "versionstamp-cli")]
#[command(version = versionstamp_core::ENGINE_VERSION)]
#[command(about = "VersionStamp CLI - Build Artifact Versioner")]
struct Cli {
    /// Base image to annotate
    #[arg(long)]
    base_img_path: PathBuf,

    /// Where to write the annotated image
    #[arg(long)]
    output_image_path: PathBuf,

    /// Output encoder format (png, jpg, ...)
    #[arg(long, default_value = "png")]
    output_image_format: String,

    /// X pixel coordinate of the main version text
    #[arg(long)]
    x_location: i32,

    /// Y pixel coordinate of the main version text
    #[arg(long)]
    y_location: i32,

    /// X pixel coordinate of the qualifier text
    #[arg(long)]
    qualifier_x: Option<i32>,

    /// Y pixel coordinate of the qualifier text
    #[arg(long)]
    qualifier_y: Option<i32>,

    /// Raw version label, at least three dot-separated segments
    #[arg(long)]
    version_label: String,

    /// Custom font name; requires --font-resource-path
    #[arg(long)]
    font_name: Option<String>,

    /// Font face file backing the custom font name
    #[arg(long)]
    font_resource_path: Option<PathBuf>,

    /// Text size in pixels; non-positive values fall back to the default
    #[arg(long)]
    font_size: Option<f32>,

    /// Text color as hex, with or without the leading '#'
    #[arg(long)]
    color: Option<String>,

    /// Render the fourth version segment as a separate qualifier run
    #[arg(long, default_value_t = false)]
    show_qualifier: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    bold: bool,

    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    italic: bool,

    /// Print the stamp outcome as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let request = StampRequest {
        base_image_path: cli.base_img_path,
        output_image_path: cli.output_image_path,
        output_image_format: cli.output_image_format,
        x_location: cli.x_location,
        y_location: cli.y_location,
        qualifier_x: cli.qualifier_x,
        qualifier_y: cli.qualifier_y,
        version_label: cli.version_label,
        font_name: cli.font_name,
        font_resource_path: cli.font_resource_path,
        font_size: cli.font_size,
        color: cli.color,
        show_qualifier: cli.show_qualifier,
        bold: cli.bold,
        italic: cli.italic,
    };

    // Informational only, no contract.
    eprintln!(
        "Writing image with version {} to {}...",
        request.version_label,
        request.output_image_path.display()
    );

    match stamp(&request) {
        Ok(outcome) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let report = serde_json::json!({
                "error": e.to_string(),
            });
            eprintln!("{}", serde_json::to_string(&report).unwrap());
            match e {
                // Bad invocation vs failed rendering
                StampError::Version(_) | StampError::Config(_) => ExitCode::from(2),
                StampError::CreateImage(_) => ExitCode::FAILURE,
            }
        }
    }
}
