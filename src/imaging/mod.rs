//! Image identification in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff** | `image::guess_format` |
//! | **Identify** | `image::ImageReader::decode`, `avif-parse` for AVIF |
//! | **Proportions** | pure functions in `calculations` |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Calculations**: Pure functions for dimension math (unit testable)

pub mod backend;
mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, ContentKind, ImageBackend};
pub use calculations::{
    DESKTOP_MIN_RATIO, Device, DeviceFit, FitRating, MOBILE_MAX_RATIO, TABLET_MIN_RATIO,
    aspect_label, aspect_ratio, device_fit, megapixels,
};
pub use rust_backend::RustBackend;
