//! End-to-end flow through the public API: real encoded images go through
//! the uploader into a session, get scored, and are released on close.

use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use variant_compare::config::{UploadConfig, resolve_config};
use variant_compare::display::DisplayRegistry;
use variant_compare::metadata::{ExtractError, MetadataExtractor};
use variant_compare::scoring::Factor;
use variant_compare::session::{CommitOutcome, Session, ViewState};
use variant_compare::types::{Dimensions, FileFormat, Slot, Winner};
use variant_compare::upload::Uploader;

fn encode(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn uploader(limits: UploadConfig) -> (Uploader, DisplayRegistry) {
    let registry = DisplayRegistry::new();
    let extractor = MetadataExtractor::new(registry.clone(), limits);
    (Uploader::new(Session::new(), extractor), registry)
}

#[tokio::test]
async fn png_against_webp() {
    let (up, registry) = uploader(UploadConfig::default());

    up.upload(Slot::A, encode(ImageFormat::Png, 40, 30), "small.png")
        .await
        .unwrap();
    let outcome = up
        .upload(Slot::B, encode(ImageFormat::WebP, 160, 120), "large.webp")
        .await
        .unwrap();
    assert!(matches!(outcome, CommitOutcome::Committed(t) if t.state() == ViewState::Comparison));

    let session = up.session().lock().await;
    let a = session.slot(Slot::A).unwrap();
    let b = session.slot(Slot::B).unwrap();
    assert_eq!(a.dimensions, Dimensions::new(40, 30));
    assert_eq!(b.dimensions, Dimensions::new(160, 120));
    assert_eq!(b.format, FileFormat::Webp);

    let result = session.comparison().unwrap().unwrap();
    assert_eq!(result.factor(Factor::AspectRatio).unwrap().winner, Winner::Tie);
    assert_eq!(result.factor(Factor::Resolution).unwrap().winner, Winner::B);
    assert_eq!(result.factor(Factor::Format).unwrap().winner, Winner::B);
    assert!(result.score_a + result.score_b <= 5);
    assert_eq!(registry.live_count(), 2);
    drop(session);

    up.session().lock().await.close();
    assert_eq!(registry.live_count(), 0);
}

#[tokio::test]
async fn identical_jpegs_tie() {
    let (up, _) = uploader(UploadConfig::default());
    let bytes = encode(ImageFormat::Jpeg, 64, 64);

    up.upload(Slot::A, bytes.clone(), "one.jpg").await.unwrap();
    up.upload(Slot::B, bytes, "two.jpg").await.unwrap();

    let session = up.session().lock().await;
    let result = session.comparison().unwrap().unwrap();
    assert_eq!((result.score_a, result.score_b), (0, 0));
    assert_eq!(result.recommendation.winner, Winner::Tie);
}

#[tokio::test]
async fn summary_then_clear_returns_to_upload() {
    let (up, registry) = uploader(UploadConfig::default());
    up.upload(Slot::A, encode(ImageFormat::Png, 16, 9), "a.png")
        .await
        .unwrap();
    up.upload(Slot::B, encode(ImageFormat::Gif, 16, 9), "b.gif")
        .await
        .unwrap();

    let mut session = up.session().lock().await;
    assert_eq!(session.request_summary().state(), ViewState::Summary);
    let b_id = session.slot(Slot::B).unwrap().id;

    session.clear_slot(Slot::A);
    assert_eq!(session.view_state(), ViewState::Upload);
    assert!(session.slot(Slot::A).is_none());
    assert_eq!(session.slot(Slot::B).unwrap().id, b_id);
    assert_eq!(registry.live_count(), 1);

    let view = session.snapshot().unwrap();
    assert!(view.comparison.is_none());
    assert!(view.details.is_none());
}

#[tokio::test]
async fn rejected_uploads_leave_session_empty() {
    let limits = resolve_config(Some(toml::from_str("[upload]\nmax_bytes = 4096").unwrap()))
        .unwrap()
        .upload;
    let (up, registry) = uploader(limits);

    let err = up
        .upload(Slot::A, b"hello, world".to_vec(), "notes.png")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedFileKind { .. }));

    let png = encode(ImageFormat::Png, 32, 32);
    let err = up
        .upload(Slot::A, png[..png.len() / 2].to_vec(), "cut.png")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::DecodeError { .. }));

    let err = up
        .upload(Slot::B, vec![0; 5000], "huge.png")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::TooLarge { limit: 4096, .. }));

    let session = up.session().lock().await;
    assert_eq!(session.view_state(), ViewState::Upload);
    assert!(session.slot(Slot::A).is_none());
    assert!(session.slot(Slot::B).is_none());
    assert_eq!(registry.live_count(), 0);
}
