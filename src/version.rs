//! Version Label Parsing
//!
//! Turns a raw build version into a three-segment display version plus an
//! optional qualifier. Pure string processing, no I/O.
//!
//! The rules interact, so they are applied in a fixed order over the
//! top-level dot-separated segment list:
//!
//! | input              | display   | qualifier      |
//! |--------------------|-----------|----------------|
//! | `1.2.3`            | `1.2.3`   | none           |
//! | `1.2.3-SNAPSHOT`   | `1.2.3`   | none           |
//! | `1.2.3.4`          | `1.2.3`   | `4`            |
//! | `1.2.3.9-SNAPSHOT` | `1.2.3`   | `9-SNAPSHOT`   |
//! | `1.0`              | rejected  | -              |
//!
//! Only the maintenance segment is ever rewritten: the `-SNAPSHOT` marker is
//! cut from it, and an embedded secondary tag (a dot inside the segment) is
//! truncated to its first sub-segment. The qualifier, when present, is the
//! literal fourth top-level segment and is never rewritten.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_MARKER: &str = "-SNAPSHOT";

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    #[error("Version has no qualifier: {0}")]
    NoQualifier(String),
}

/// The display/qualifier pair derived from a raw version label.
///
/// `display` always has exactly three dot-separated segments; `qualifier`
/// is present iff the raw label had four or more top-level segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedVersion {
    pub display: String,
    pub qualifier: Option<String>,
}

/// Top-level dot split. Trailing empty segments carry no information, so
/// `1.2.3.` parses like `1.2.3`.
fn segments(raw: &str) -> Vec<&str> {
    let mut segs: Vec<&str> = raw.split('.').collect();
    while segs.last() == Some(&"") {
        segs.pop();
    }
    segs
}

/// Parse a raw version label into its display/qualifier pair.
pub fn parse(raw: &str) -> Result<FormattedVersion, VersionError> {
    let segs = segments(raw);
    if segs.len() < 3 {
        return Err(VersionError::InvalidFormat(raw.to_string()));
    }

    let mut maintenance = segs[2];

    // Pre-release marker must never reach the display string. Everything
    // from the first marker occurrence onward is cut.
    if maintenance.ends_with(SNAPSHOT_MARKER) {
        if let Some(idx) = maintenance.find(SNAPSHOT_MARKER) {
            maintenance = &maintenance[..idx];
        }
    }

    // A secondary build tag glued onto the maintenance segment with a dot is
    // discarded. This looks only at the maintenance segment's own content;
    // a separate fourth top-level segment is handled below as the qualifier.
    if let Some((head, _tag)) = maintenance.split_once('.') {
        maintenance = head;
    }

    let display = format!("{}.{}.{}", segs[0], segs[1], maintenance);
    let qualifier = segs.get(3).map(|q| q.to_string());

    Ok(FormattedVersion { display, qualifier })
}

/// Display string only. Fails when the label has fewer than three segments.
pub fn format(raw: &str) -> Result<String, VersionError> {
    Ok(parse(raw)?.display)
}

/// True iff the raw label carries a fourth top-level segment.
pub fn has_qualifier(raw: &str) -> bool {
    segments(raw).len() >= 4
}

/// The literal fourth top-level segment. Callers are expected to check
/// [`has_qualifier`] first; asking for an absent qualifier is an error.
pub fn qualifier(raw: &str) -> Result<String, VersionError> {
    segments(raw)
        .get(3)
        .map(|q| q.to_string())
        .ok_or_else(|| VersionError::NoQualifier(raw.to_string()))
}
