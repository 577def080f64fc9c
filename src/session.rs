//! Comparison session: two upload slots and the screen they gate.
//!
//! A [`Session`] owns up to two [`ImageMetadata`] values (slots A and B) and
//! a [`ViewState`]:
//!
//! ```text
//!            both slots filled              request_summary
//!   Upload ───────────────────▶ Comparison ────────────────▶ Summary
//!     ▲  ◀─────────────────────────  │  ◀──────────────────────  │
//!     │     clear_slot / request_upload    request_back_to_comparison
//!     └──────────────────────────────────────────────────────────┘
//!                      clear_slot / request_upload
//! ```
//!
//! Two invariants hold after every operation:
//!
//! - Comparison and Summary are only reachable with both slots filled.
//! - Clearing either slot while in Comparison or Summary returns to Upload,
//!   even if the other slot is still filled.
//!
//! ## Resource ownership
//!
//! Each occupant's display handle is released exactly once: when its slot is
//! cleared, when a new upload overwrites it, or when the session is closed.
//!
//! ## Supersession
//!
//! Uploads that extract asynchronously go through [`Session::begin_upload`]
//! and [`Session::commit`]. Each slot carries a generation counter; starting
//! an upload or clearing the slot bumps it, and a commit whose ticket is no
//! longer current is discarded (its handle released) instead of installed.
//! The newest upload started for a slot is the only one that can land.

use crate::metadata::ImageMetadata;
use crate::scoring::{self, ComparisonResult, ScoreError};
use crate::summary::DetailAnalysis;
use crate::types::Slot;
use serde::Serialize;
use std::fmt;

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewState {
    #[default]
    Upload,
    Comparison,
    Summary,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Upload => f.write_str("upload"),
            ViewState::Comparison => f.write_str("comparison"),
            ViewState::Summary => f.write_str("summary"),
        }
    }
}

/// Effect of an operation on the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: ViewState, to: ViewState },
    Stayed(ViewState),
}

impl Transition {
    /// The view state after the operation.
    pub fn state(self) -> ViewState {
        match self {
            Transition::Moved { to, .. } => to,
            Transition::Stayed(s) => s,
        }
    }

    pub fn moved(self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

/// Claim on a slot, issued when an upload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    slot: Slot,
    generation: u64,
}

impl UploadTicket {
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

/// Result of committing an extracted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(Transition),
    /// A newer upload or a clear claimed the slot first; the image was
    /// released, nothing changed.
    Superseded,
}

/// Read-only projection handed to the presentation layer.
///
/// `comparison` and `details` are recomputed on every call and are present
/// exactly when both slots are filled.
#[derive(Debug, Serialize)]
pub struct SessionView<'a> {
    pub view_state: ViewState,
    pub slot_a: Option<&'a ImageMetadata>,
    pub slot_b: Option<&'a ImageMetadata>,
    pub comparison: Option<ComparisonResult>,
    pub details: Option<DetailAnalysis>,
}

#[derive(Debug, Default)]
pub struct Session {
    slots: [Option<ImageMetadata>; 2],
    generations: [u64; 2],
    view: ViewState,
}

fn index(slot: Slot) -> usize {
    match slot {
        Slot::A => 0,
        Slot::B => 1,
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn slot(&self, which: Slot) -> Option<&ImageMetadata> {
        self.slots[index(which)].as_ref()
    }

    pub fn both_filled(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    fn go(&mut self, to: ViewState, cause: &'static str) -> Transition {
        let from = self.view;
        if from == to {
            return Transition::Stayed(from);
        }
        self.view = to;
        tracing::debug!(%from, %to, cause, "view transition");
        Transition::Moved { from, to }
    }

    fn stay(&self) -> Transition {
        Transition::Stayed(self.view)
    }

    /// Install `metadata` into a slot, releasing the previous occupant.
    ///
    /// Also invalidates any upload in flight for that slot. Filling the
    /// second slot while on Upload moves to Comparison; on any other screen
    /// the state is unchanged.
    pub fn upload_slot(&mut self, which: Slot, metadata: ImageMetadata) -> Transition {
        self.generations[index(which)] += 1;
        self.install(which, metadata)
    }

    fn install(&mut self, which: Slot, metadata: ImageMetadata) -> Transition {
        tracing::debug!(slot = %which, id = %metadata.id, name = %metadata.name, "slot filled");
        if let Some(previous) = self.slots[index(which)].replace(metadata) {
            previous.release();
        }
        if self.view == ViewState::Upload && self.both_filled() {
            self.go(ViewState::Comparison, "both slots filled")
        } else {
            self.stay()
        }
    }

    /// Start an upload into `which`. Any earlier ticket for the slot goes
    /// stale.
    pub fn begin_upload(&mut self, which: Slot) -> UploadTicket {
        let generation = &mut self.generations[index(which)];
        *generation += 1;
        UploadTicket {
            slot: which,
            generation: *generation,
        }
    }

    /// Whether committing with this ticket would install.
    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        self.generations[index(ticket.slot)] == ticket.generation
    }

    /// Install an extracted image if its ticket is still current; otherwise
    /// release it and leave everything unchanged.
    pub fn commit(&mut self, ticket: UploadTicket, metadata: ImageMetadata) -> CommitOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(
                slot = %ticket.slot,
                id = %metadata.id,
                "discarding superseded upload"
            );
            metadata.release();
            return CommitOutcome::Superseded;
        }
        CommitOutcome::Committed(self.install(ticket.slot, metadata))
    }

    /// Empty a slot and release its occupant. On Comparison or Summary this
    /// always returns to Upload.
    pub fn clear_slot(&mut self, which: Slot) -> Transition {
        self.generations[index(which)] += 1;
        if let Some(previous) = self.slots[index(which)].take() {
            tracing::debug!(slot = %which, id = %previous.id, "slot cleared");
            previous.release();
        }
        match self.view {
            ViewState::Comparison | ViewState::Summary => self.go(ViewState::Upload, "slot cleared"),
            ViewState::Upload => self.stay(),
        }
    }

    /// Show the comparison. No-op unless both slots are filled.
    pub fn request_comparison(&mut self) -> Transition {
        if !self.both_filled() {
            return self.stay();
        }
        self.go(ViewState::Comparison, "comparison requested")
    }

    /// Show the detail analysis. No-op unless both slots are filled.
    pub fn request_summary(&mut self) -> Transition {
        if !self.both_filled() {
            return self.stay();
        }
        self.go(ViewState::Summary, "summary requested")
    }

    /// Leave the detail analysis for the comparison. No-op elsewhere.
    pub fn request_back_to_comparison(&mut self) -> Transition {
        if self.view != ViewState::Summary {
            return self.stay();
        }
        self.go(ViewState::Comparison, "back to comparison")
    }

    /// Return to the upload screen regardless of slot occupancy.
    pub fn request_upload(&mut self) -> Transition {
        self.go(ViewState::Upload, "upload requested")
    }

    /// Score the two occupants, if both slots are filled.
    pub fn comparison(&self) -> Result<Option<ComparisonResult>, ScoreError> {
        match (self.slot(Slot::A), self.slot(Slot::B)) {
            (Some(a), Some(b)) => scoring::score(a, b).map(Some),
            _ => Ok(None),
        }
    }

    /// Detail analysis of the two occupants, if both slots are filled.
    pub fn details(&self) -> Option<DetailAnalysis> {
        match (self.slot(Slot::A), self.slot(Slot::B)) {
            (Some(a), Some(b)) => Some(DetailAnalysis::of(a, b)),
            _ => None,
        }
    }

    /// Project the session for rendering.
    pub fn snapshot(&self) -> Result<SessionView<'_>, ScoreError> {
        Ok(SessionView {
            view_state: self.view,
            slot_a: self.slot(Slot::A),
            slot_b: self.slot(Slot::B),
            comparison: self.comparison()?,
            details: self.details(),
        })
    }

    /// Release every occupant and return to a fresh Upload state. In-flight
    /// uploads are invalidated.
    pub fn close(&mut self) {
        for which in [Slot::A, Slot::B] {
            self.generations[index(which)] += 1;
            if let Some(previous) = self.slots[index(which)].take() {
                previous.release();
            }
        }
        self.view = ViewState::Upload;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
