//! Shared types used across extraction, scoring, and the session.
//!
//! These types appear in the serialized session projection (`--json` output)
//! and must stay stable between the library and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// One of the two upload slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => f.write_str("A"),
            Slot::B => f.write_str("B"),
        }
    }
}

/// Outcome of a single comparison: one side, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Tie,
}

impl Winner {
    /// The label this outcome carries when the two inputs are swapped.
    pub fn swapped(self) -> Self {
        match self {
            Winner::A => Winner::B,
            Winner::B => Winner::A,
            Winner::Tie => Winner::Tie,
        }
    }
}

impl From<Slot> for Winner {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::A => Winner::A,
            Slot::B => Winner::B,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::A => f.write_str("A"),
            Winner::B => f.write_str("B"),
            Winner::Tie => f.write_str("Tie"),
        }
    }
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count. Widened to `u64` so large images cannot overflow.
    pub fn pixels(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Both edges are non-zero.
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Declared file format, taken from the filename extension.
///
/// Deliberately not derived from the payload: a `.png` that actually holds
/// JPEG bytes is still scored as PNG. The sniffed content kind is kept
/// separately on [`ImageMetadata`](crate::metadata::ImageMetadata).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Png,
    Jpg,
    Jpeg,
    Gif,
    Webp,
    Other,
}

impl FileFormat {
    /// Map a filename to its format via the (case-insensitive) extension.
    ///
    /// ```
    /// # use variant_compare::types::FileFormat;
    /// assert_eq!(FileFormat::from_filename("hero.WEBP"), FileFormat::Webp);
    /// assert_eq!(FileFormat::from_filename("banner.svg"), FileFormat::Other);
    /// assert_eq!(FileFormat::from_filename("README"), FileFormat::Other);
    /// ```
    pub fn from_filename(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => FileFormat::Png,
            Some("jpg") => FileFormat::Jpg,
            Some("jpeg") => FileFormat::Jpeg,
            Some("gif") => FileFormat::Gif,
            Some("webp") => FileFormat::Webp,
            _ => FileFormat::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Png => "png",
            FileFormat::Jpg => "jpg",
            FileFormat::Jpeg => "jpeg",
            FileFormat::Gif => "gif",
            FileFormat::Webp => "webp",
            FileFormat::Other => "other",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
