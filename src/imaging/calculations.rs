//! Pure calculation functions on image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Callers guarantee non-zero dimensions (the extractor rejects zero edges).

use crate::types::Dimensions;
use serde::Serialize;

/// Width divided by height.
pub fn aspect_ratio(dims: Dimensions) -> f64 {
    dims.width as f64 / dims.height as f64
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Reduce dimensions to their simplest `w:h` ratio.
///
/// # Examples
/// ```
/// # use variant_compare::imaging::aspect_label;
/// # use variant_compare::types::Dimensions;
/// assert_eq!(aspect_label(Dimensions::new(1920, 1080)), "16:9");
/// assert_eq!(aspect_label(Dimensions::new(800, 600)), "4:3");
/// assert_eq!(aspect_label(Dimensions::new(1001, 1000)), "1001:1000");
/// ```
pub fn aspect_label(dims: Dimensions) -> String {
    let divisor = gcd(dims.width, dims.height).max(1);
    format!("{}:{}", dims.width / divisor, dims.height / divisor)
}

/// Which screen class an image's proportions suit best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Device {
    Desktop,
    Tablet,
    Mobile,
    Universal,
}

/// How well the proportions fit that screen class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FitRating {
    Excellent,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceFit {
    pub device: Device,
    pub rating: FitRating,
}

/// Wider than this reads as a desktop/landscape banner.
pub const DESKTOP_MIN_RATIO: f64 = 1.7;
/// Wider than this (but not desktop) reads as tablet landscape.
pub const TABLET_MIN_RATIO: f64 = 1.2;
/// Narrower than this reads as a phone-portrait image.
pub const MOBILE_MAX_RATIO: f64 = 0.8;

/// Classify proportions by target device. Thresholds are strict and checked
/// widest-first.
pub fn device_fit(dims: Dimensions) -> DeviceFit {
    let ratio = aspect_ratio(dims);
    let (device, rating) = if ratio > DESKTOP_MIN_RATIO {
        (Device::Desktop, FitRating::Excellent)
    } else if ratio > TABLET_MIN_RATIO {
        (Device::Tablet, FitRating::Good)
    } else if ratio < MOBILE_MAX_RATIO {
        (Device::Mobile, FitRating::Excellent)
    } else {
        (Device::Universal, FitRating::Good)
    };
    DeviceFit { device, rating }
}

/// Pixel count in millions.
pub fn megapixels(dims: Dimensions) -> f64 {
    dims.pixels() as f64 / 1_000_000.0
}
