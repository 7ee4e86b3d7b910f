//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::path::Path;

use image::{Rgba, RgbaImage};
use versionstamp_core::{
    default_font_path, parse_color, stamp, version, ConfigError, StampError, StampRequest,
};

fn write_base_image(path: &Path) {
    let base = RgbaImage::from_pixel(240, 100, Rgba([255, 255, 255, 255]));
    base.save(path).unwrap();
}

fn base_request(dir: &Path, version_label: &str) -> StampRequest {
    let base_image_path = dir.join("base.png");
    write_base_image(&base_image_path);
    StampRequest {
        base_image_path,
        output_image_path: dir.join("out.png"),
        output_image_format: "png".to_string(),
        x_location: 10,
        y_location: 10,
        qualifier_x: None,
        qualifier_y: None,
        version_label: version_label.to_string(),
        font_name: None,
        font_resource_path: None,
        font_size: Some(24.0),
        color: Some("ff0000".to_string()),
        show_qualifier: false,
        bold: true,
        italic: false,
    }
}

/// Rendering tests need a real font face; hosts without one skip rasterizing.
fn fonts_available() -> bool {
    default_font_path(true, false).is_some()
}

fn region_has_red_text(img: &RgbaImage, y_min: u32, y_max: u32) -> bool {
    img.enumerate_pixels().any(|(_, y, p)| {
        y >= y_min && y < y_max && p.0[0] > 150 && p.0[1] < 100 && p.0[2] < 100
    })
}

// --- Version parsing ---

#[test]
fn invariant_three_segment_version_has_no_qualifier() {
    let parsed = version::parse("1.2.3").unwrap();
    assert_eq!(parsed.display, "1.2.3");
    assert_eq!(parsed.qualifier, None);

    assert!(!version::has_qualifier("1.2.3"));
    let err = version::qualifier("1.2.3").unwrap_err();
    assert!(err.to_string().contains("Version has no qualifier"));
}

#[test]
fn invariant_fourth_segment_is_qualifier_verbatim() {
    assert!(version::has_qualifier("1.2.3.4"));
    assert_eq!(version::qualifier("1.2.3.4").unwrap(), "4");
    assert_eq!(version::format("1.2.3.4").unwrap(), "1.2.3");

    // The qualifier segment is never snapshot-stripped.
    let parsed = version::parse("1.2.3.9-SNAPSHOT").unwrap();
    assert_eq!(parsed.display, "1.2.3");
    assert_eq!(parsed.qualifier.as_deref(), Some("9-SNAPSHOT"));
}

#[test]
fn invariant_snapshot_marker_never_displayed() {
    let parsed = version::parse("1.2.3-SNAPSHOT").unwrap();
    assert_eq!(parsed.display, "1.2.3");
    assert_eq!(parsed.qualifier, None);
    assert!(!version::has_qualifier("1.2.3-SNAPSHOT"));
}

#[test]
fn invariant_short_version_rejected() {
    for raw in ["1.0", "1", ""] {
        let err = version::parse(raw).unwrap_err();
        assert!(err.to_string().contains("Invalid version format"));
    }
}

#[test]
fn invariant_trailing_dot_carries_no_qualifier() {
    let parsed = version::parse("1.2.3.").unwrap();
    assert_eq!(parsed.display, "1.2.3");
    assert_eq!(parsed.qualifier, None);
}

// --- Color normalization ---

#[test]
fn invariant_color_normalization() {
    assert_eq!(parse_color("0f125e").unwrap(), [0x0f, 0x12, 0x5e]);
    assert_eq!(parse_color("#0f125e").unwrap(), [0x0f, 0x12, 0x5e]);

    let err = parse_color("#0f125e00").unwrap_err();
    assert!(err.to_string().contains("not the expected format"));

    assert!(parse_color("zzzzzz").is_err());
}

// --- Configuration fails fast, before any image I/O ---

#[test]
fn invariant_missing_font_resource_fails_before_render() {
    let dir = tempfile::tempdir().unwrap();
    // Base image deliberately absent: a config error must surface first.
    let mut request = base_request(dir.path(), "1.2.3");
    std::fs::remove_file(&request.base_image_path).unwrap();
    request.font_name = Some("MyFont".to_string());

    let err = stamp(&request).unwrap_err();
    assert!(matches!(
        err,
        StampError::Config(ConfigError::MissingFontResource)
    ));
    assert!(!request.output_image_path.exists());
}

#[test]
fn invariant_invalid_color_fails_before_render() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = base_request(dir.path(), "1.2.3");
    std::fs::remove_file(&request.base_image_path).unwrap();
    request.color = Some("#0f125e00".to_string());

    let err = stamp(&request).unwrap_err();
    assert!(matches!(err, StampError::Config(ConfigError::InvalidColor(_))));
    assert!(!request.output_image_path.exists());
}

#[test]
fn invariant_rendered_qualifier_requires_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = base_request(dir.path(), "1.2.3.4");
    request.show_qualifier = true;

    let err = stamp(&request).unwrap_err();
    assert!(matches!(
        err,
        StampError::Config(ConfigError::MissingQualifierPosition)
    ));
}

// --- Rendering ---

#[test]
fn invariant_qualifier_needs_request_and_presence() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();

    // Requested but absent from the label: no qualifier run.
    let mut request = base_request(dir.path(), "1.2.3");
    request.show_qualifier = true;
    request.qualifier_x = Some(10);
    request.qualifier_y = Some(55);

    let outcome = stamp(&request).unwrap();
    assert_eq!(outcome.display_version, "1.2.3");
    assert_eq!(outcome.qualifier, None);
    assert!(request.output_image_path.exists());

    // Present in the label but not requested: still no qualifier run.
    let request = base_request(dir.path(), "1.2.3.4");
    let outcome = stamp(&request).unwrap();
    assert_eq!(outcome.qualifier, None);
}

#[test]
fn invariant_stamp_draws_two_text_regions() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let mut request = base_request(dir.path(), "2.1.5.rc1");
    request.show_qualifier = true;
    request.qualifier_x = Some(10);
    request.qualifier_y = Some(55);

    let outcome = stamp(&request).unwrap();
    assert_eq!(outcome.display_version, "2.1.5");
    assert_eq!(outcome.qualifier.as_deref(), Some("rc1"));

    let img = image::open(&request.output_image_path).unwrap().to_rgba8();
    assert!(region_has_red_text(&img, 5, 50), "main version not drawn");
    assert!(region_has_red_text(&img, 50, 100), "qualifier not drawn");
}

#[test]
fn invariant_stamp_is_deterministic() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let request = base_request(dir.path(), "1.2.3");

    stamp(&request).unwrap();
    let first = std::fs::read(&request.output_image_path).unwrap();
    stamp(&request).unwrap();
    let second = std::fs::read(&request.output_image_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn invariant_unsupported_format_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = base_request(dir.path(), "1.2.3");
    request.output_image_format = "not-a-format".to_string();
    request.output_image_path = dir.path().join("out.bin");

    let err = stamp(&request).unwrap_err();
    assert!(err.to_string().contains("Unsupported output image format"));
    assert!(!request.output_image_path.exists());
}

#[test]
fn invariant_jpg_alias_supported() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let mut request = base_request(dir.path(), "1.2.3");
    request.output_image_format = "jpg".to_string();
    request.output_image_path = dir.path().join("out.jpg");

    stamp(&request).unwrap();
    let decoded = image::open(&request.output_image_path).unwrap();
    assert_eq!(decoded.to_rgb8().dimensions(), (240, 100));
}

// --- Request payload compatibility ---

#[test]
fn invariant_request_defaults_from_json() {
    let payload = r#"{
        "base_image_path": "base.png",
        "output_image_path": "out.png",
        "output_image_format": "png",
        "x_location": 10,
        "y_location": 20,
        "version_label": "1.2.3"
    }"#;

    let request: StampRequest = serde_json::from_str(payload).unwrap();
    assert!(request.bold);
    assert!(!request.italic);
    assert!(!request.show_qualifier);
    assert_eq!(request.qualifier_x, None);
    assert_eq!(request.font_size, None);
}
