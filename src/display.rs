//! Ephemeral display handles.
//!
//! A [`DisplayHandle`] stands in for a browser object URL: a locator a
//! renderer uses to show an uploaded image, valid only while the image sits
//! in a slot. Handles are allocated by a [`DisplayRegistry`] and must be
//! handed back with [`DisplayHandle::release`] exactly once. Release consumes
//! the handle, so a double release does not compile.
//!
//! The registry keeps the set of live locators so tests (and the CLI's debug
//! log) can check that every handle allocated was eventually released. A
//! handle dropped without being released is reported at `warn` and then
//! reclaimed, which keeps the registry accurate but flags the leak.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct RegistryInner {
    next: AtomicU64,
    live: Mutex<HashSet<String>>,
}

impl RegistryInner {
    fn live(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set is only touched by insert/remove; a poisoned lock still
        // holds a consistent set.
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Allocator and ledger for display handles. Cheap to clone; clones share
/// the same ledger.
#[derive(Debug, Clone, Default)]
pub struct DisplayRegistry {
    inner: Arc<RegistryInner>,
}

impl DisplayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh handle. `digest` is the payload's content hash; its
    /// prefix makes locators readable in logs.
    pub fn allocate(&self, digest: &str) -> DisplayHandle {
        let seq = self.inner.next.fetch_add(1, Ordering::Relaxed) + 1;
        let prefix = &digest[..digest.len().min(12)];
        let locator = format!("blob:variant-compare/{prefix}-{seq}");
        self.inner.live().insert(locator.clone());
        tracing::trace!(%locator, "display handle allocated");
        DisplayHandle {
            locator,
            registry: Arc::clone(&self.inner),
            released: false,
        }
    }

    /// Number of handles allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.live().len()
    }

    pub fn is_live(&self, locator: &str) -> bool {
        self.inner.live().contains(locator)
    }
}

/// A locator valid while its image occupies a slot.
#[derive(Debug)]
pub struct DisplayHandle {
    locator: String,
    registry: Arc<RegistryInner>,
    released: bool,
}

impl DisplayHandle {
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Hand the locator back to its registry.
    pub fn release(mut self) {
        self.released = true;
        self.registry.live().remove(&self.locator);
        tracing::trace!(locator = %self.locator, "display handle released");
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(locator = %self.locator, "display handle dropped without release");
            self.registry.live().remove(&self.locator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_tracks_live_handles() {
        let registry = DisplayRegistry::new();
        let a = registry.allocate("aaaaaaaaaaaaaaaa");
        let b = registry.allocate("bbbb");
        assert_eq!(registry.live_count(), 2);
        assert!(registry.is_live(a.locator()));
        assert_ne!(a.locator(), b.locator());

        a.release();
        assert_eq!(registry.live_count(), 1);
        b.release();
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn locator_includes_digest_prefix() {
        let registry = DisplayRegistry::new();
        let h = registry.allocate("0123456789abcdef0123");
        assert!(h.locator().starts_with("blob:variant-compare/0123456789ab-"));
        h.release();
    }

    #[test]
    fn same_digest_gets_distinct_locators() {
        let registry = DisplayRegistry::new();
        let a = registry.allocate("cafe");
        let b = registry.allocate("cafe");
        assert_ne!(a.locator(), b.locator());
        a.release();
        assert!(registry.is_live(b.locator()));
        b.release();
    }

    #[test]
    fn clones_share_the_ledger() {
        let registry = DisplayRegistry::new();
        let clone = registry.clone();
        let h = clone.allocate("beef");
        assert_eq!(registry.live_count(), 1);
        h.release();
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn dropped_handle_is_reclaimed() {
        let registry = DisplayRegistry::new();
        drop(registry.allocate("dead"));
        assert_eq!(registry.live_count(), 0);
    }
}
