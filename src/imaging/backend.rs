//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations extraction needs from
//! a decoder: sniff the payload's content kind, and identify its dimensions.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, statically
//! linked. Tests swap in the mock from the `tests` module so extraction, supersession,
//! and timeout behaviour can be exercised without real codecs.

use crate::types::Dimensions;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decoding failed: {0}")]
    DecodeFailed(String),
}

/// What the payload's magic bytes say it is.
///
/// Independent of the filename: this answers "is this an image at all", while
/// [`FileFormat`](crate::types::FileFormat) answers "what was it uploaded as".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
    Tiff,
    Ico,
    Avif,
    /// Recognized image container without a decoder wired in (HDR, QOI, ...).
    Other,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentKind::Png => "png",
            ContentKind::Jpeg => "jpeg",
            ContentKind::Gif => "gif",
            ContentKind::Webp => "webp",
            ContentKind::Bmp => "bmp",
            ContentKind::Tiff => "tiff",
            ContentKind::Ico => "ico",
            ContentKind::Avif => "avif",
            ContentKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Decoder operations used by the extractor.
///
/// `identify` is blocking and may be slow; callers run it on a blocking
/// worker. Implementations must be `Send + Sync` because they are shared
/// across those workers behind an `Arc`.
pub trait ImageBackend: Send + Sync {
    /// Recognize the payload as an image. `None` means "not image-like".
    fn sniff(&self, bytes: &[u8]) -> Option<ContentKind>;

    /// Decode the payload far enough to know its pixel dimensions.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;
}
