//! CLI output formatting for candidates, selections, and format listings.
//!
//! # Output Format
//!
//! ## Candidates
//!
//! ```text
//! /content/dam/test/standard.jpg (7 candidates)
//! 001 cq5dam.web.1280.1280.jpg 960x315 (virtual)
//!     Path: .../cq5dam.web.1280.1280.jpg.image_file.960.315.0,0,960,315.file/cq5dam.web.1280.1280.jpg
//!     Crop: 0,0,960,315 of .../renditions/cq5dam.web.1280.1280.jpg
//! 002 original 2560x1440 (original)
//!     Path: /content/dam/test/standard.jpg/jcr:content/renditions/original
//!     Size: 450.0 KB
//! ```
//!
//! ## Select
//!
//! ```text
//! /content/dam/test/standard.jpg → teaser.480.270.jpg 480x270 image
//!     Path: /content/dam/test/standard.jpg/jcr:content/renditions/teaser.480.270.jpg
//!     Format: teaser
//! /content/dam/other.jpg → no matching rendition
//! ```
//!
//! ## Formats
//!
//! ```text
//! 001 Home Stage (home_stage)
//!     Size: 960x315
//!     Extensions: jpg, png
//!     Group: stage
//! ```
//!
//! # Architecture
//!
//! Each listing has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::asset::Rendition;
use crate::format::MediaFormat;
use crate::rendition::{RenditionKind, RenditionMetadata};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte size with one decimal.
///
/// ```text
/// 512      → 512 B
/// 46080    → 45.0 KB
/// 3145728  → 3.0 MB
/// ```
fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

/// One axis of a format's size constraint.
///
/// ```text
/// fixed 960        → 960
/// min 400, max 800 → 400-800
/// min 400          → 400+
/// max 800          → ≤800
/// nothing          → *
/// ```
fn axis(fixed: i64, min: i64, max: i64) -> String {
    match (fixed > 0, min > 0, max > 0) {
        (true, _, _) => fixed.to_string(),
        (false, true, true) => format!("{}-{}", min, max),
        (false, true, false) => format!("{}+", min),
        (false, false, true) => format!("≤{}", max),
        (false, false, false) => "*".to_string(),
    }
}

fn rendition_flags(rendition: &RenditionMetadata) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if rendition.is_virtual() {
        flags.push("virtual");
    }
    if rendition.is_original() {
        flags.push("original");
    }
    if rendition.is_thumbnail() {
        flags.push("thumbnail");
    }
    flags
}

fn type_label(rendition: &Rendition) -> &'static str {
    if rendition.is_image() {
        "image"
    } else if rendition.is_flash() {
        "flash"
    } else {
        "download"
    }
}

// ============================================================================
// Candidates
// ============================================================================

pub fn format_candidates(asset_path: &str, candidates: &[RenditionMetadata]) -> Vec<String> {
    let mut lines = vec![format!("{} ({} candidates)", asset_path, candidates.len())];
    for (i, candidate) in candidates.iter().enumerate() {
        let flags = rendition_flags(candidate);
        let mut header = format!(
            "{} {} {}x{}",
            format_index(i + 1),
            candidate.name(),
            candidate.width(),
            candidate.height()
        );
        if !flags.is_empty() {
            header.push_str(&format!(" ({})", flags.join(", ")));
        }
        lines.push(header);
        lines.push(format!("{}Path: {}", indent(1), candidate.path()));
        if let RenditionKind::VirtualCrop { source_path, crop } = candidate.kind() {
            lines.push(format!("{}Crop: {} of {}", indent(1), crop, source_path));
        }
        if let Some(size) = candidate.file_size() {
            lines.push(format!("{}Size: {}", indent(1), format_bytes(size)));
        }
    }
    lines
}

pub fn print_candidates(asset_path: &str, candidates: &[RenditionMetadata]) {
    for line in format_candidates(asset_path, candidates) {
        println!("{}", line);
    }
}

// ============================================================================
// Selection
// ============================================================================

pub fn format_selection(asset_path: &str, rendition: Option<&Rendition>) -> Vec<String> {
    let Some(rendition) = rendition else {
        return vec![format!("{} → no matching rendition", asset_path)];
    };
    let metadata = rendition.metadata();
    let mut lines = vec![
        format!(
            "{} → {} {}x{} {}",
            asset_path,
            metadata.name(),
            rendition.width(),
            rendition.height(),
            type_label(rendition)
        ),
        format!("{}Path: {}", indent(1), rendition.path()),
    ];
    if let Some(format) = rendition.media_format() {
        lines.push(format!("{}Format: {}", indent(1), format.name()));
    }
    lines
}

pub fn print_selection(asset_path: &str, rendition: Option<&Rendition>) {
    for line in format_selection(asset_path, rendition) {
        println!("{}", line);
    }
}

// ============================================================================
// Formats
// ============================================================================

pub fn format_formats(formats: &[&MediaFormat]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, format) in formats.iter().enumerate() {
        if format.label() == format.name() {
            lines.push(format!("{} {}", format_index(i + 1), format.name()));
        } else {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                format.label(),
                format.name()
            ));
        }
        if format.has_dimension_constraints() {
            lines.push(format!(
                "{}Size: {}x{}",
                indent(1),
                axis(format.width(), format.min_width(), format.max_width()),
                axis(format.height(), format.min_height(), format.max_height())
            ));
        }
        if format.ratio() > 0.0 {
            lines.push(format!("{}Ratio: {:.2}", indent(1), format.ratio()));
        }
        if !format.extensions().is_empty() {
            lines.push(format!(
                "{}Extensions: {}",
                indent(1),
                format.extensions().join(", ")
            ));
        }
        if let Some(group) = format.rendition_group() {
            lines.push(format!("{}Group: {}", indent(1), group));
        }
        if format.is_download() {
            lines.push(format!("{}Download", indent(1)));
        }
    }
    lines
}

pub fn print_formats(formats: &[&MediaFormat]) {
    for line in format_formats(formats) {
        println!("{}", line);
    }
}
