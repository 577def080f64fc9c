//! Deterministic scoring of two image variants.
//!
//! [`score`] compares two [`ImageMetadata`] values on four factors, always in
//! the same order, and sums the weight of every factor a side wins:
//!
//! | Factor | Weight | A side wins when |
//! |---|---|---|
//! | File size | 2 | its `size_bytes` is strictly smaller |
//! | Aspect ratio | 1 | its proportion score is strictly higher |
//! | Resolution | 1 | its pixel count is strictly more than 1.2× the other's |
//! | Format | 1 | its format score is strictly higher |
//!
//! Anything else is a tie and adds nothing. The side with the strictly larger
//! total is recommended, with `High` confidence when it leads by more than one
//! point. Every comparison is strict, so boundary values (a ratio of exactly
//! 1.2 between pixel counts, say) tie rather than win.
//!
//! ## Proportion score
//!
//! | Score | Width/height ratio |
//! |---|---|
//! | 3 | within 0.1 of the golden ratio (1.618) |
//! | 2 | within 0.05 of 16:9, 4:3, 3:2, or 1:1 |
//! | 1 | anything else |
//!
//! ## Format score
//!
//! `webp` 3, `jpg`/`jpeg` 2, `png` 1, anything else 0. The format is the
//! declared one from the filename, not the sniffed content.
//!
//! The engine is a pure function: no state, no I/O. Swapping the inputs swaps
//! every winner label and both totals.

use crate::imaging::aspect_ratio;
use crate::metadata::ImageMetadata;
use crate::types::{Dimensions, FileFormat, Slot, Winner};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const FILE_SIZE_WEIGHT: u32 = 2;
pub const ASPECT_RATIO_WEIGHT: u32 = 1;
pub const RESOLUTION_WEIGHT: u32 = 1;
pub const FORMAT_WEIGHT: u32 = 1;

/// Largest total either side can reach.
pub const MAX_SCORE: u32 = FILE_SIZE_WEIGHT + ASPECT_RATIO_WEIGHT + RESOLUTION_WEIGHT + FORMAT_WEIGHT;

pub const GOLDEN_RATIO: f64 = 1.618;
/// Distance from [`GOLDEN_RATIO`] that still counts as golden.
pub const GOLDEN_TOLERANCE: f64 = 0.1;
/// Ratios that score as "common".
pub const COMMON_RATIOS: [f64; 4] = [16.0 / 9.0, 4.0 / 3.0, 3.0 / 2.0, 1.0];
/// Distance from a [`COMMON_RATIOS`] entry that still counts as that ratio.
pub const COMMON_TOLERANCE: f64 = 0.05;
/// One side's pixel count must exceed the other's times this to win.
pub const RESOLUTION_MARGIN: f64 = 1.2;
/// Leads larger than this many points are high-confidence.
pub const HIGH_CONFIDENCE_MARGIN: u32 = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("invalid input for variant {side}: dimensions {width}×{height} must both be positive")]
    InvalidInput { side: Slot, width: u32, height: u32 },
}

/// The four factors, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Factor {
    FileSize,
    AspectRatio,
    Resolution,
    Format,
}

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::FileSize,
        Factor::AspectRatio,
        Factor::Resolution,
        Factor::Format,
    ];

    pub fn weight(self) -> u32 {
        match self {
            Factor::FileSize => FILE_SIZE_WEIGHT,
            Factor::AspectRatio => ASPECT_RATIO_WEIGHT,
            Factor::Resolution => RESOLUTION_WEIGHT,
            Factor::Format => FORMAT_WEIGHT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Factor::FileSize => "File Size",
            Factor::AspectRatio => "Aspect Ratio",
            Factor::Resolution => "Resolution",
            Factor::Format => "Format",
        }
    }

    fn reason(self, winner: Winner) -> &'static str {
        let won = winner != Winner::Tie;
        match (self, won) {
            (Factor::FileSize, true) => "Smaller file size for faster loading",
            (Factor::FileSize, false) => "Equal file sizes",
            (Factor::AspectRatio, true) => "Better proportional composition",
            (Factor::AspectRatio, false) => "Similar aspect ratios",
            (Factor::Resolution, true) => "Higher resolution for better detail",
            (Factor::Resolution, false) => "Similar resolution quality",
            (Factor::Format, true) => "More web-optimized format",
            (Factor::Format, false) => "Same format efficiency",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorResult {
    pub factor: Factor,
    pub winner: Winner,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Equal,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => f.write_str("High"),
            Confidence::Medium => f.write_str("Medium"),
            Confidence::Equal => f.write_str("Equal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub winner: Winner,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub factors: Vec<FactorResult>,
    pub score_a: u32,
    pub score_b: u32,
    pub recommendation: Recommendation,
}

impl ComparisonResult {
    /// Total of the recommended side, if any.
    pub fn winning_score(&self) -> Option<u32> {
        match self.recommendation.winner {
            Winner::A => Some(self.score_a),
            Winner::B => Some(self.score_b),
            Winner::Tie => None,
        }
    }

    pub fn factor(&self, factor: Factor) -> Option<&FactorResult> {
        self.factors.iter().find(|f| f.factor == factor)
    }
}

/// The subset of [`ImageMetadata`] the engine looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInput {
    pub size_bytes: u64,
    pub dimensions: Dimensions,
    pub format: FileFormat,
}

impl From<&ImageMetadata> for ScoreInput {
    fn from(meta: &ImageMetadata) -> Self {
        Self {
            size_bytes: meta.size_bytes,
            dimensions: meta.dimensions,
            format: meta.format,
        }
    }
}

/// Compare two extracted images.
pub fn score(a: &ImageMetadata, b: &ImageMetadata) -> Result<ComparisonResult, ScoreError> {
    score_inputs(ScoreInput::from(a), ScoreInput::from(b))
}

/// Compare two raw fact sets. Fails if either has a zero edge.
pub fn score_inputs(a: ScoreInput, b: ScoreInput) -> Result<ComparisonResult, ScoreError> {
    check_dimensions(Slot::A, a.dimensions)?;
    check_dimensions(Slot::B, b.dimensions)?;

    let winners = [
        pick(a.size_bytes, b.size_bytes, |x, y| x < y),
        pick(aspect_score(a.dimensions), aspect_score(b.dimensions), |x, y| x > y),
        pick(a.dimensions.pixels(), b.dimensions.pixels(), |x, y| {
            x as f64 > y as f64 * RESOLUTION_MARGIN
        }),
        pick(format_score(a.format), format_score(b.format), |x, y| x > y),
    ];

    let mut score_a = 0;
    let mut score_b = 0;
    let factors = Factor::ALL
        .iter()
        .zip(winners)
        .map(|(&factor, winner)| {
            match winner {
                Winner::A => score_a += factor.weight(),
                Winner::B => score_b += factor.weight(),
                Winner::Tie => {}
            }
            FactorResult {
                factor,
                winner,
                reason: factor.reason(winner),
            }
        })
        .collect();

    Ok(ComparisonResult {
        factors,
        score_a,
        score_b,
        recommendation: recommend(score_a, score_b),
    })
}

fn check_dimensions(side: Slot, dims: Dimensions) -> Result<(), ScoreError> {
    if dims.is_valid() {
        Ok(())
    } else {
        Err(ScoreError::InvalidInput {
            side,
            width: dims.width,
            height: dims.height,
        })
    }
}

/// A wins if `beats(a, b)`, B wins if `beats(b, a)`, else tie.
fn pick<T: Copy>(a: T, b: T, beats: impl Fn(T, T) -> bool) -> Winner {
    if beats(a, b) {
        Winner::A
    } else if beats(b, a) {
        Winner::B
    } else {
        Winner::Tie
    }
}

/// Proportion score (1–3) for one image. See the [module docs](self).
pub fn aspect_score(dims: Dimensions) -> u8 {
    let ratio = aspect_ratio(dims);
    if (ratio - GOLDEN_RATIO).abs() < GOLDEN_TOLERANCE {
        3
    } else if COMMON_RATIOS
        .iter()
        .any(|common| (ratio - common).abs() < COMMON_TOLERANCE)
    {
        2
    } else {
        1
    }
}

/// Web-friendliness score (0–3) for a declared format.
pub fn format_score(format: FileFormat) -> u8 {
    match format {
        FileFormat::Webp => 3,
        FileFormat::Jpg | FileFormat::Jpeg => 2,
        FileFormat::Png => 1,
        FileFormat::Gif | FileFormat::Other => 0,
    }
}

fn recommend(score_a: u32, score_b: u32) -> Recommendation {
    let (winner, margin) = if score_a > score_b {
        (Winner::A, score_a - score_b)
    } else if score_b > score_a {
        (Winner::B, score_b - score_a)
    } else {
        return Recommendation {
            winner: Winner::Tie,
            confidence: Confidence::Equal,
        };
    };
    let confidence = if margin > HIGH_CONFIDENCE_MARGIN {
        Confidence::High
    } else {
        Confidence::Medium
    };
    Recommendation { winner, confidence }
}
