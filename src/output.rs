//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Compare
//!
//! ```text
//! A  hero.jpg  1920×1080  jpg  97.66 KB
//! B  hero.webp  1920×1080  webp  146.48 KB
//!
//! Factors
//!     File Size     A    Smaller file size for faster loading
//!     Aspect Ratio  Tie  Similar aspect ratios
//!     Resolution    Tie  Similar resolution quality
//!     Format        B    More web-optimized format
//!
//! Score: A 2, B 1 (of 5)
//! Recommendation: A (Medium confidence)
//! ```
//!
//! ## Details
//!
//! ```text
//! Details
//!     A  16:9  Desktop (Excellent)  2.07 MP
//!     B  16:9  Desktop (Excellent)  2.07 MP
//!     A is 67% the size of B
//!     Width difference: 0px
//!     Formats differ
//! ```
//!
//! ## Inspect
//!
//! ```text
//! hero.jpg
//!     Dimensions: 1920×1080
//!     Format: jpg (content: jpeg)
//!     Size: 97.66 KB
//!     Digest: 9f86d081884c…
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::metadata::ImageMetadata;
use crate::scoring::{ComparisonResult, MAX_SCORE};
use crate::summary::{DetailAnalysis, ImageDetails};
use crate::types::Slot;

// ============================================================================
// Shared helpers
// ============================================================================

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in powers of 1024, at most two decimals.
///
/// ```text
/// 0       → 0 Bytes
/// 1536    → 1.5 KB
/// 1048576 → 1 MB
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// One-line summary of an image, prefixed by its slot.
fn slot_line(slot: Slot, meta: &ImageMetadata) -> String {
    format!(
        "{}  {}  {}  {}  {}",
        slot,
        meta.name,
        meta.dimensions,
        meta.format,
        format_file_size(meta.size_bytes)
    )
}

fn details_line(slot: Slot, details: &ImageDetails) -> String {
    format!(
        "    {}  {}  {:?} ({:?})  {:.2} MP",
        slot,
        details.aspect_label,
        details.device_fit.device,
        details.device_fit.rating,
        details.megapixels
    )
}

// ============================================================================
// Compare
// ============================================================================

/// Format the two images and their comparison.
pub fn format_comparison(
    a: &ImageMetadata,
    b: &ImageMetadata,
    result: &ComparisonResult,
) -> Vec<String> {
    let mut lines = vec![slot_line(Slot::A, a), slot_line(Slot::B, b), String::new()];

    lines.push("Factors".to_string());
    let label_width = result
        .factors
        .iter()
        .map(|f| f.factor.label().len())
        .max()
        .unwrap_or(0);
    for f in &result.factors {
        lines.push(format!(
            "    {:<label_width$}  {:<3}  {}",
            f.factor.label(),
            f.winner.to_string(),
            f.reason
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Score: A {}, B {} (of {})",
        result.score_a, result.score_b, MAX_SCORE
    ));
    let rec = &result.recommendation;
    lines.push(format!(
        "Recommendation: {} ({} confidence)",
        rec.winner, rec.confidence
    ));
    lines
}

pub fn print_comparison(a: &ImageMetadata, b: &ImageMetadata, result: &ComparisonResult) {
    for line in format_comparison(a, b, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Details
// ============================================================================

/// Format the detail analysis shown below a comparison.
pub fn format_details(details: &DetailAnalysis) -> Vec<String> {
    let mut lines = vec![
        "Details".to_string(),
        details_line(Slot::A, &details.a),
        details_line(Slot::B, &details.b),
    ];
    match details.size_ratio_percent {
        Some(pct) => lines.push(format!("    A is {}% the size of B", pct)),
        None => lines.push("    B is empty; no size ratio".to_string()),
    }
    lines.push(format!(
        "    Width difference: {}px",
        details.width_difference
    ));
    lines.push(if details.same_format {
        "    Same format".to_string()
    } else {
        "    Formats differ".to_string()
    });
    lines
}

pub fn print_details(details: &DetailAnalysis) {
    for line in format_details(details) {
        println!("{}", line);
    }
}

// ============================================================================
// Inspect
// ============================================================================

/// Format a single image's extracted metadata.
pub fn format_metadata(meta: &ImageMetadata) -> Vec<String> {
    vec![
        meta.name.clone(),
        format!("    Dimensions: {}", meta.dimensions),
        format!("    Format: {} (content: {})", meta.format, meta.kind),
        format!("    Size: {}", format_file_size(meta.size_bytes)),
        format!("    Digest: {}", meta.digest),
    ]
}

pub fn print_metadata(meta: &ImageMetadata) {
    for line in format_metadata(meta) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
