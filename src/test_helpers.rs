//! Shared test utilities.
//!
//! Provides in-memory image fixtures (encoded with the `image` crate, so no
//! binary files are checked in), metadata builders that skip the async
//! extractor, and a mock-backed extractor.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let registry = DisplayRegistry::new();
//! let a = metadata(&registry, "a.jpg", 100_000, 1920, 1080);
//! let b = metadata(&registry, "b.webp", 150_000, 1920, 1080);
//! ```

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbImage};

use crate::config::UploadConfig;
use crate::display::DisplayRegistry;
use crate::imaging::ContentKind;
use crate::imaging::backend::tests::MockBackend;
use crate::metadata::{ImageMetadata, MetadataExtractor};
use crate::types::Dimensions;

// =========================================================================
// Encoded fixtures
// =========================================================================

/// Encode a `width`×`height` gradient in the given format.
pub fn encode_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .unwrap_or_else(|e| panic!("failed to encode {format:?} fixture: {e}"));
    out.into_inner()
}

/// The first half of a payload.
pub fn truncated(bytes: &[u8]) -> Vec<u8> {
    bytes[..bytes.len() / 2].to_vec()
}

// =========================================================================
// Metadata builders
// =========================================================================

/// Metadata with a zero-filled payload of `size` bytes and the given
/// dimensions. Format comes from `name` as usual.
pub fn metadata(
    registry: &DisplayRegistry,
    name: &str,
    size: usize,
    width: u32,
    height: u32,
) -> ImageMetadata {
    ImageMetadata::assemble(
        name.to_string(),
        ContentKind::Png,
        Dimensions::new(width, height),
        vec![0; size],
        registry,
    )
}

/// Extractor over a mock backend with default limits. Returns the registry
/// so tests can count live handles.
pub fn extractor_with(backend: MockBackend) -> (MetadataExtractor, DisplayRegistry) {
    let registry = DisplayRegistry::new();
    let extractor =
        MetadataExtractor::with_backend(Arc::new(backend), registry.clone(), UploadConfig::default());
    (extractor, registry)
}
