//! # Variant Compare
//!
//! Side-by-side comparison of two image variants. Upload one file into slot
//! A and one into slot B; the engine extracts basic facts about each, scores
//! them on four weighted heuristics, and recommends the variant better suited
//! to web delivery.
//!
//! # Architecture: Extract → Score → Present
//!
//! ```text
//! 1. Extract   bytes + filename  →  ImageMetadata     (sniff, decode, hash)
//! 2. Score     two ImageMetadata →  ComparisonResult  (pure, deterministic)
//! 3. Present   Session           →  SessionView       (state + derived data)
//! ```
//!
//! Extraction is the only fallible, slow, I/O-touching stage, so it is the
//! only async one. Scoring is a pure function and is recomputed whenever the
//! session is projected; nothing derived is cached.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | Turns upload payloads into [`metadata::ImageMetadata`]: size ceiling, content sniffing, bounded decode |
//! | [`scoring`] | The four-factor comparison engine |
//! | [`session`] | Two slots plus the Upload / Comparison / Summary state machine |
//! | [`upload`] | Upload sink tying extraction to a shared session with supersession |
//! | [`summary`] | Detail analysis for the summary screen (aspect labels, device fit) |
//! | [`display`] | Ephemeral display handles and the registry that tracks them |
//! | [`imaging`] | Decoder backend trait, the pure-Rust backend, dimension math |
//! | [`config`] | `variant-compare.toml` loading, merging, and validation |
//! | [`types`] | Small shared types: slots, winners, dimensions, declared formats |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Declared Format, Sniffed Content
//!
//! The scored format comes from the filename extension: it is what the page
//! will serve the file as. The sniffed content kind only gates whether the
//! upload is an image at all. A `.webp` name on PNG bytes scores as WebP.
//!
//! ## Strict Comparisons
//!
//! Every heuristic uses strict inequalities, so exact boundary values tie.
//! Swapping A and B swaps every label and both totals; nothing depends on
//! argument order.
//!
//! ## Explicit Handle Release
//!
//! Display handles stand in for browser object URLs. Releasing one consumes
//! it, so double release cannot compile; the [`display::DisplayRegistry`]
//! counts live handles so tests can assert nothing leaks.
//!
//! ## Last Upload Wins
//!
//! Extraction runs without the session lock. Each slot has a generation
//! counter; a finished extraction whose ticket is stale is released instead of
//! installed, so a slow early upload cannot overwrite a fast later one.

pub mod config;
pub mod display;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod scoring;
pub mod session;
pub mod summary;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
