//! Detail analysis shown on the summary screen.
//!
//! Per-image facts derived from dimensions (reduced aspect label, device fit,
//! megapixels) plus a few pairwise numbers. None of this feeds the score.

use crate::imaging::{DeviceFit, aspect_label, device_fit, megapixels};
use crate::metadata::ImageMetadata;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDetails {
    pub aspect_label: String,
    pub device_fit: DeviceFit,
    pub megapixels: f64,
}

impl ImageDetails {
    pub fn of(meta: &ImageMetadata) -> Self {
        Self {
            aspect_label: aspect_label(meta.dimensions),
            device_fit: device_fit(meta.dimensions),
            megapixels: megapixels(meta.dimensions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailAnalysis {
    pub a: ImageDetails,
    pub b: ImageDetails,
    /// A's size as a percentage of B's, rounded. `None` when B is empty.
    pub size_ratio_percent: Option<u64>,
    /// Absolute width difference in pixels.
    pub width_difference: u32,
    pub same_format: bool,
}

impl DetailAnalysis {
    pub fn of(a: &ImageMetadata, b: &ImageMetadata) -> Self {
        Self {
            a: ImageDetails::of(a),
            b: ImageDetails::of(b),
            size_ratio_percent: size_ratio_percent(a.size_bytes, b.size_bytes),
            width_difference: a.dimensions.width.abs_diff(b.dimensions.width),
            same_format: a.format == b.format,
        }
    }
}

fn size_ratio_percent(a: u64, b: u64) -> Option<u64> {
    if b == 0 {
        return None;
    }
    Some((a as f64 / b as f64 * 100.0).round() as u64)
}
