//! Pure Rust image backend, no system libraries.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff | `image::guess_format` (magic bytes) |
//! | Identify (PNG, JPEG, GIF, WebP, BMP, TIFF, ICO) | `image::ImageReader::decode` |
//! | Identify (AVIF) | `avif-parse` container metadata (no pixel decode) |
//!
//! Identification does a full decode rather than reading the header alone,
//! so a truncated file with an intact header still fails.

use super::backend::{BackendError, ContentKind, ImageBackend};
use crate::types::Dimensions;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn content_kind(format: ImageFormat) -> ContentKind {
    match format {
        ImageFormat::Png => ContentKind::Png,
        ImageFormat::Jpeg => ContentKind::Jpeg,
        ImageFormat::Gif => ContentKind::Gif,
        ImageFormat::WebP => ContentKind::Webp,
        ImageFormat::Bmp => ContentKind::Bmp,
        ImageFormat::Tiff => ContentKind::Tiff,
        ImageFormat::Ico => ContentKind::Ico,
        ImageFormat::Avif => ContentKind::Avif,
        _ => ContentKind::Other,
    }
}

/// Extract dimensions from an AVIF container's metadata.
fn identify_avif(bytes: &[u8]) -> Result<Dimensions, BackendError> {
    let avif = avif_parse::read_avif(&mut Cursor::new(bytes))
        .map_err(|e| BackendError::DecodeFailed(format!("Failed to parse AVIF: {e:?}")))?;
    let meta = avif
        .primary_item_metadata()
        .map_err(|e| BackendError::DecodeFailed(format!("Failed to read AVIF metadata: {e:?}")))?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

impl ImageBackend for RustBackend {
    fn sniff(&self, bytes: &[u8]) -> Option<ContentKind> {
        image::guess_format(bytes).ok().map(content_kind)
    }

    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        if self.sniff(bytes) == Some(ContentKind::Avif) {
            return identify_avif(bytes);
        }
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::DecodeFailed(e.to_string()))?;
        Ok(Dimensions {
            width: image.width(),
            height: image.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode_image, truncated};

    #[test]
    fn sniff_recognizes_encoded_formats() {
        let backend = RustBackend::new();
        let cases = [
            (ImageFormat::Png, ContentKind::Png),
            (ImageFormat::Jpeg, ContentKind::Jpeg),
            (ImageFormat::Gif, ContentKind::Gif),
            (ImageFormat::WebP, ContentKind::Webp),
            (ImageFormat::Bmp, ContentKind::Bmp),
        ];
        for (format, kind) in cases {
            let bytes = encode_image(format, 8, 4);
            assert_eq!(backend.sniff(&bytes), Some(kind), "{format:?}");
        }
    }

    #[test]
    fn sniff_rejects_non_images() {
        let backend = RustBackend::new();
        assert_eq!(backend.sniff(b"%PDF-1.7 not an image"), None);
        assert_eq!(backend.sniff(b"hello, world"), None);
        assert_eq!(backend.sniff(b""), None);
    }

    #[test]
    fn identify_reads_dimensions() {
        let backend = RustBackend::new();
        for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif] {
            let bytes = encode_image(format, 32, 18);
            let dims = backend.identify(&bytes).unwrap();
            assert_eq!(dims, Dimensions::new(32, 18), "{format:?}");
        }
    }

    #[test]
    fn identify_fails_on_truncated_png() {
        let backend = RustBackend::new();
        let bytes = truncated(&encode_image(ImageFormat::Png, 64, 64));
        assert_eq!(backend.sniff(&bytes), Some(ContentKind::Png));
        assert!(backend.identify(&bytes).is_err());
    }

    #[test]
    fn identify_fails_on_garbage_avif() {
        let backend = RustBackend::new();
        // Valid 28-byte `ftyp` box announcing AVIF, nothing after it.
        let mut bytes = vec![0, 0, 0, 0x1c];
        bytes.extend_from_slice(b"ftypavif");
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(b"avifmif1miaf");
        assert_eq!(bytes.len(), 0x1c);
        assert_eq!(backend.sniff(&bytes), Some(ContentKind::Avif));
        assert!(matches!(
            backend.identify(&bytes),
            Err(BackendError::DecodeFailed(_))
        ));
    }
}
