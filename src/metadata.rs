//! Metadata extraction: raw upload bytes → [`ImageMetadata`].
//!
//! Extraction runs four checks in order, failing fast:
//!
//! 1. **Size ceiling**: payloads over `upload.max_bytes` fail with
//!    [`ExtractError::TooLarge`] before anything reads the content.
//! 2. **Content kind**: the backend sniffs magic bytes; anything it does not
//!    recognize as an image fails with [`ExtractError::UnsupportedFileKind`].
//! 3. **Dimensions**: the backend decodes the payload on a blocking worker
//!    (`tokio::task::spawn_blocking`), bounded by `upload.decode_timeout_ms`.
//!    Decoder errors, zero-sized results, and timeouts are all
//!    [`ExtractError::DecodeError`].
//! 4. **Display handle**: allocated last, only on success, so a failed
//!    extraction never leaves a live handle behind.
//!
//! ## Format vs. content kind
//!
//! The scored [`FileFormat`] comes from the filename extension alone; an
//! unrecognized extension is `other`, not an error. The sniffed
//! [`ContentKind`] is recorded alongside for display but never scored.
//!
//! ## Timeouts
//!
//! A blocking decode cannot be interrupted. On timeout the extractor stops
//! waiting and reports the error; the worker finishes in the background and
//! its result is dropped. No handle is allocated for it because allocation
//! happens after the decode returns.

use crate::config::UploadConfig;
use crate::display::{DisplayHandle, DisplayRegistry};
use crate::imaging::{BackendError, ContentKind, ImageBackend, RustBackend};
use crate::types::{Dimensions, FileFormat};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Why a decode produced no dimensions.
#[derive(Error, Debug)]
pub enum DecodeFailure {
    #[error("{0}")]
    Backend(#[from] BackendError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("decoded to zero width or height")]
    ZeroDimensions,
    #[error("decode worker panicked")]
    WorkerPanicked,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{name}: not an image file")]
    UnsupportedFileKind { name: String },
    #[error("{name}: could not read image dimensions: {cause}")]
    DecodeError { name: String, cause: DecodeFailure },
    #[error("{name}: {size} bytes exceeds the {limit}-byte upload limit")]
    TooLarge { name: String, size: u64, limit: u64 },
}

/// Opaque per-extraction identifier. Unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ImageId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{:06}", self.0)
    }
}

/// Facts about one uploaded image. Immutable once extracted.
///
/// Owns the original payload and the display handle. The handle is released
/// through [`ImageMetadata::release`], which consumes the metadata; the
/// session calls it when the owning slot is cleared or overwritten.
#[derive(Debug, Serialize)]
pub struct ImageMetadata {
    pub id: ImageId,
    pub name: String,
    pub format: FileFormat,
    pub kind: ContentKind,
    pub dimensions: Dimensions,
    pub size_bytes: u64,
    /// SHA-256 of the payload, hex.
    pub digest: String,
    #[serde(rename = "display", serialize_with = "serialize_locator")]
    display: DisplayHandle,
    #[serde(skip)]
    source: Vec<u8>,
}

fn serialize_locator<S: serde::Serializer>(h: &DisplayHandle, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(h.locator())
}

impl ImageMetadata {
    /// Locator for rendering this image while it occupies a slot.
    pub fn display_locator(&self) -> &str {
        self.display.locator()
    }

    /// The original uploaded bytes.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Dispose of this image, releasing its display handle.
    pub fn release(self) {
        tracing::debug!(id = %self.id, name = %self.name, "releasing image");
        self.display.release();
    }

    /// Build metadata for a payload whose dimensions are already known,
    /// allocating its display handle.
    pub(crate) fn assemble(
        name: String,
        kind: ContentKind,
        dimensions: Dimensions,
        source: Vec<u8>,
        registry: &DisplayRegistry,
    ) -> Self {
        let digest = digest_hex(&source);
        Self {
            id: ImageId::next(),
            format: FileFormat::from_filename(&name),
            name,
            kind,
            dimensions,
            size_bytes: source.len() as u64,
            display: registry.allocate(&digest),
            digest,
            source,
        }
    }
}

/// SHA-256 of a payload as a hex string.
pub fn digest_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Turns upload payloads into [`ImageMetadata`].
///
/// Cheap to clone: the backend and registry are shared.
#[derive(Clone)]
pub struct MetadataExtractor {
    backend: Arc<dyn ImageBackend>,
    registry: DisplayRegistry,
    limits: UploadConfig,
}

impl MetadataExtractor {
    /// Extractor over the pure-Rust backend.
    pub fn new(registry: DisplayRegistry, limits: UploadConfig) -> Self {
        Self::with_backend(Arc::new(RustBackend::new()), registry, limits)
    }

    pub fn with_backend(
        backend: Arc<dyn ImageBackend>,
        registry: DisplayRegistry,
        limits: UploadConfig,
    ) -> Self {
        Self {
            backend,
            registry,
            limits,
        }
    }

    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &UploadConfig {
        &self.limits
    }

    /// Extract metadata from an upload.
    ///
    /// Never blocks the calling executor: decoding happens on a blocking
    /// worker and is awaited with a timeout.
    pub async fn extract(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<ImageMetadata, ExtractError> {
        let name = filename.to_string();
        let size_bytes = bytes.len() as u64;
        tracing::debug!(%name, size_bytes, "extracting metadata");

        if size_bytes > self.limits.max_bytes {
            return Err(ExtractError::TooLarge {
                name,
                size: size_bytes,
                limit: self.limits.max_bytes,
            });
        }

        let kind = self
            .backend
            .sniff(&bytes)
            .ok_or_else(|| ExtractError::UnsupportedFileKind { name: name.clone() })?;

        let (bytes, dimensions) = self
            .identify(bytes)
            .await
            .map_err(|cause| ExtractError::DecodeError {
                name: name.clone(),
                cause,
            })?;

        let metadata = ImageMetadata::assemble(name, kind, dimensions, bytes, &self.registry);
        tracing::debug!(
            id = %metadata.id,
            name = %metadata.name,
            dimensions = %metadata.dimensions,
            format = %metadata.format,
            "metadata extracted"
        );
        Ok(metadata)
    }

    /// Decode on a blocking worker, handing the payload back with the result.
    async fn identify(&self, bytes: Vec<u8>) -> Result<(Vec<u8>, Dimensions), DecodeFailure> {
        let backend = Arc::clone(&self.backend);
        let timeout = self.limits.decode_timeout();
        let worker = tokio::task::spawn_blocking(move || {
            let dims = backend.identify(&bytes);
            (bytes, dims)
        });

        let (bytes, dims) = match tokio::time::timeout(timeout, worker).await {
            Ok(Ok(done)) => done,
            Ok(Err(_join)) => return Err(DecodeFailure::WorkerPanicked),
            Err(_elapsed) => return Err(DecodeFailure::Timeout(timeout)),
        };
        let dims = dims?;
        if !dims.is_valid() {
            return Err(DecodeFailure::ZeroDimensions);
        }
        Ok((bytes, dims))
    }
}
