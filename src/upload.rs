//! Upload sink: extract an image and install it into a session slot.
//!
//! The session lock is held only to claim the slot and to commit; the
//! extraction itself runs unlocked, so two slots can upload concurrently and
//! the session stays readable while a large file decodes. If another upload
//! or a clear claims the slot in the meantime, the finished image is
//! released instead of installed.

use crate::metadata::{ExtractError, MetadataExtractor};
use crate::session::{CommitOutcome, Session};
use crate::types::Slot;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct Uploader {
    session: Arc<Mutex<Session>>,
    extractor: MetadataExtractor,
}

impl Uploader {
    pub fn new(session: Session, extractor: MetadataExtractor) -> Self {
        Self::shared(Arc::new(Mutex::new(session)), extractor)
    }

    pub fn shared(session: Arc<Mutex<Session>>, extractor: MetadataExtractor) -> Self {
        Self { session, extractor }
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    pub fn extractor(&self) -> &MetadataExtractor {
        &self.extractor
    }

    /// Extract `bytes` and commit the result to `which`.
    ///
    /// On error the session is untouched.
    pub async fn upload(
        &self,
        which: Slot,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<CommitOutcome, ExtractError> {
        let ticket = self.session.lock().await.begin_upload(which);

        let metadata = match self.extractor.extract(bytes, filename).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(slot = %which, "upload failed: {e}");
                return Err(e);
            }
        };

        let outcome = self.session.lock().await.commit(ticket, metadata);
        tracing::debug!(slot = %which, ?outcome, "upload finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadConfig;
    use crate::display::DisplayRegistry;
    use crate::imaging::backend::tests::MockBackend;
    use crate::session::{Transition, ViewState};
    use crate::test_helpers::extractor_with;
    use std::sync::mpsc;
    use std::time::Duration;

    fn uploader(backend: MockBackend) -> (Uploader, DisplayRegistry) {
        let (extractor, registry) = extractor_with(backend);
        (Uploader::new(Session::new(), extractor), registry)
    }

    #[tokio::test]
    async fn two_uploads_reach_comparison() {
        let (up, registry) = uploader(
            MockBackend::new()
                .with_image(b"a", 1920, 1080)
                .with_image(b"b", 1920, 1080),
        );

        let first = up.upload(Slot::A, b"a".to_vec(), "a.jpg").await.unwrap();
        assert_eq!(first, CommitOutcome::Committed(Transition::Stayed(ViewState::Upload)));

        let second = up.upload(Slot::B, b"b".to_vec(), "b.webp").await.unwrap();
        assert_eq!(
            second,
            CommitOutcome::Committed(Transition::Moved {
                from: ViewState::Upload,
                to: ViewState::Comparison
            })
        );

        let session = up.session().lock().await;
        let comparison = session.comparison().unwrap().unwrap();
        // Same size and dimensions; webp wins on format only.
        assert_eq!((comparison.score_a, comparison.score_b), (0, 1));
        assert_eq!(registry.live_count(), 2);
    }

    #[tokio::test]
    async fn failed_upload_leaves_session_untouched() {
        let (up, registry) = uploader(
            MockBackend::new()
                .with_image(b"a", 10, 10)
                .with_image(b"b", 10, 10)
                .with_corrupt(b"broken"),
        );
        up.upload(Slot::A, b"a".to_vec(), "a.png").await.unwrap();
        up.upload(Slot::B, b"b".to_vec(), "b.png").await.unwrap();
        let before = up.session().lock().await.slot(Slot::B).unwrap().id;

        let err = up
            .upload(Slot::B, b"broken".to_vec(), "c.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::DecodeError { .. }));

        let err = up
            .upload(Slot::A, b"not an image".to_vec(), "d.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFileKind { .. }));

        let session = up.session().lock().await;
        assert_eq!(session.view_state(), ViewState::Comparison);
        assert_eq!(session.slot(Slot::B).unwrap().id, before);
        assert_eq!(registry.live_count(), 2);
    }

    #[tokio::test]
    async fn later_upload_supersedes_slow_one() {
        let (release_slow, gate) = mpsc::channel();
        let backend = Arc::new(
            MockBackend::new()
                .with_image(b"slow", 100, 100)
                .with_image(b"fast", 200, 200)
                .with_gate(b"slow", gate),
        );
        let registry = DisplayRegistry::new();
        let extractor = MetadataExtractor::with_backend(
            backend.clone(),
            registry.clone(),
            UploadConfig::default(),
        );
        let up = Uploader::new(Session::new(), extractor);

        let slow = tokio::spawn({
            let up = up.clone();
            async move { up.upload(Slot::A, b"slow".to_vec(), "slow.png").await }
        });
        while !backend.identify_started(b"slow") {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let fast = up.upload(Slot::A, b"fast".to_vec(), "fast.png").await.unwrap();
        assert!(matches!(fast, CommitOutcome::Committed(_)));

        release_slow.send(()).unwrap();
        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow, CommitOutcome::Superseded);

        let session = up.session().lock().await;
        assert_eq!(session.slot(Slot::A).unwrap().name, "fast.png");
        assert_eq!(registry.live_count(), 1);
    }

    #[tokio::test]
    async fn clear_during_upload_wins() {
        let (release, gate) = mpsc::channel();
        let backend = Arc::new(MockBackend::new().with_image(b"img", 10, 10).with_gate(b"img", gate));
        let registry = DisplayRegistry::new();
        let extractor =
            MetadataExtractor::with_backend(backend.clone(), registry.clone(), UploadConfig::default());
        let up = Uploader::new(Session::new(), extractor);

        let pending = tokio::spawn({
            let up = up.clone();
            async move { up.upload(Slot::B, b"img".to_vec(), "img.png").await }
        });
        while !backend.identify_started(b"img") {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        up.session().lock().await.clear_slot(Slot::B);
        release.send(()).unwrap();

        assert_eq!(pending.await.unwrap().unwrap(), CommitOutcome::Superseded);
        assert!(up.session().lock().await.slot(Slot::B).is_none());
        assert_eq!(registry.live_count(), 0);
    }
}
