//! End-to-end engine tests: full batches against an in-memory store.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde_json::{json, Value};

use darkroom_core::error::StoreError;
use darkroom_core::{
    BatchProcessor, BatchStatus, Config, MemoryStore, NotificationBatch, ObjectStore,
    TransformKind,
};

/// Store wrapper that counts downloads, for loop-prevention assertions.
struct CountingStore {
    inner: Arc<MemoryStore>,
    gets: AtomicUsize,
}

impl CountingStore {
    fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
        }
    }

    fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_object(bucket, key).await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.inner.put_object(bucket, key, body, content_type).await
    }
}

fn record(bucket: &str, key: &str) -> Value {
    json!({"s3": {"bucket": {"name": bucket}, "object": {"key": key}}})
}

fn envelope(records: Vec<Value>) -> Value {
    json!({"Sns": {"Message": json!({"Records": records}).to_string()}})
}

fn batch(envelopes: Vec<Value>) -> NotificationBatch {
    serde_json::from_value(json!({"Records": envelopes})).unwrap()
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&DynamicImage::new_rgb8(width, height), ImageFormat::Jpeg)
}

fn processor(kind: TransformKind, store: Arc<dyn ObjectStore>) -> BatchProcessor {
    BatchProcessor::new(store, kind.build(&Config::default()))
}

#[tokio::test]
async fn empty_batch_succeeds() {
    let store = Arc::new(MemoryStore::new());
    let result = processor(TransformKind::Resize, store)
        .process(&NotificationBatch::default())
        .await;

    assert_eq!(result.status(), BatchStatus::Success);
    assert_eq!((result.processed, result.failed), (0, 0));
}

#[tokio::test]
async fn resize_writes_bounded_thumbnail() {
    let store = Arc::new(MemoryStore::new());
    store.insert("photos", "uploads/cat.jpg", jpeg(4000, 3000));

    let result = processor(TransformKind::Resize, store.clone())
        .process(&batch(vec![envelope(vec![record(
            "photos",
            "uploads/cat.jpg",
        )])]))
        .await;

    assert_eq!((result.processed, result.failed), (1, 0));
    assert_eq!(result.status_code(), 200);

    let thumb = store.object("photos", "thumbnails/cat.jpg").unwrap();
    assert_eq!(thumb.content_type, "image/jpeg");
    let decoded = image::load_from_memory(&thumb.body).unwrap();
    // aspect ratio preserved, longest edge capped at 200
    assert_eq!(decoded.dimensions(), (200, 150));
}

#[tokio::test]
async fn resize_skips_its_own_output_without_downloading() {
    let inner = Arc::new(MemoryStore::new());
    inner.insert("photos", "thumbnails/cat.jpg", jpeg(200, 150));
    let store = Arc::new(CountingStore::new(inner.clone()));

    let result = processor(TransformKind::Resize, store.clone())
        .process(&batch(vec![envelope(vec![record(
            "photos",
            "thumbnails/cat.jpg",
        )])]))
        .await;

    // a skip is neutral: neither processed nor failed
    assert_eq!((result.processed, result.failed), (0, 0));
    assert_eq!(result.status(), BatchStatus::Success);
    assert_eq!(store.get_count(), 0);
    // nothing new was written
    assert_eq!(inner.len(), 1);
}

#[tokio::test]
async fn greyscale_flattens_and_uploads_as_jpeg() {
    let store = Arc::new(MemoryStore::new());
    let mut img = image::RgbImage::new(64, 64);
    for px in img.pixels_mut() {
        *px = image::Rgb([200, 30, 90]);
    }
    store.insert(
        "photos",
        "uploads/dog.png",
        encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png),
    );

    let result = processor(TransformKind::Greyscale, store.clone())
        .process(&batch(vec![envelope(vec![record(
            "photos",
            "uploads/dog.png",
        )])]))
        .await;

    assert_eq!((result.processed, result.failed), (1, 0));

    // PNG in, JPEG out, under the greyscale prefix
    let object = store.object("photos", "greyscale/dog.png").unwrap();
    assert_eq!(object.content_type, "image/jpeg");
    let decoded = image::load_from_memory(&object.body).unwrap().to_rgb8();
    for px in decoded.pixels() {
        assert_eq!(px.0[0], px.0[1]);
        assert_eq!(px.0[1], px.0[2]);
    }
}

#[tokio::test]
async fn exif_without_metadata_uploads_empty_object() {
    let store = Arc::new(MemoryStore::new());
    store.insert("photos", "uploads/cat.jpg", jpeg(16, 16));

    let result = processor(TransformKind::Exif, store.clone())
        .process(&batch(vec![envelope(vec![record(
            "photos",
            "uploads/cat.jpg",
        )])]))
        .await;

    assert_eq!((result.processed, result.failed), (1, 0));

    let object = store.object("photos", "exif/cat.json").unwrap();
    assert_eq!(object.content_type, "application/json");
    assert_eq!(std::str::from_utf8(&object.body).unwrap(), "{}");
}

#[tokio::test]
async fn exif_skips_non_image_extensions_without_downloading() {
    let inner = Arc::new(MemoryStore::new());
    let store = Arc::new(CountingStore::new(inner));

    let result = processor(TransformKind::Exif, store.clone())
        .process(&batch(vec![envelope(vec![record(
            "photos",
            "uploads/readme.txt",
        )])]))
        .await;

    assert_eq!((result.processed, result.failed), (0, 0));
    assert_eq!(store.get_count(), 0);
}

#[tokio::test]
async fn malformed_envelope_does_not_abort_siblings() {
    let store = Arc::new(MemoryStore::new());
    store.insert("photos", "uploads/a.jpg", jpeg(300, 300));
    store.insert("photos", "uploads/b.jpg", jpeg(300, 300));

    let result = processor(TransformKind::Resize, store.clone())
        .process(&batch(vec![
            envelope(vec![record("photos", "uploads/a.jpg")]),
            json!({"Sns": {"Message": "this is not json"}}),
            envelope(vec![record("photos", "uploads/b.jpg")]),
        ]))
        .await;

    // exactly one failure, attributable to the bad envelope
    assert_eq!((result.processed, result.failed), (2, 1));
    assert_eq!(result.status(), BatchStatus::PartialFailure);
    assert_eq!(result.status_code(), 207);
    assert!(store.object("photos", "thumbnails/a.jpg").is_some());
    assert!(store.object("photos", "thumbnails/b.jpg").is_some());
}

#[tokio::test]
async fn malformed_record_fails_alone_within_its_group() {
    let store = Arc::new(MemoryStore::new());
    store.insert("photos", "uploads/a.jpg", jpeg(300, 300));

    let result = processor(TransformKind::Resize, store.clone())
        .process(&batch(vec![envelope(vec![
            json!({"s3": {"bucket": {"name": "photos"}}}),
            record("photos", "uploads/a.jpg"),
        ])]))
        .await;

    assert_eq!((result.processed, result.failed), (1, 1));
    assert!(store.object("photos", "thumbnails/a.jpg").is_some());
}

#[tokio::test]
async fn undecodable_object_is_an_item_failure() {
    let store = Arc::new(MemoryStore::new());
    store.insert("photos", "uploads/broken.jpg", b"not an image".to_vec());
    store.insert("photos", "uploads/ok.jpg", jpeg(300, 300));

    let result = processor(TransformKind::Resize, store.clone())
        .process(&batch(vec![envelope(vec![
            record("photos", "uploads/broken.jpg"),
            record("photos", "uploads/ok.jpg"),
        ])]))
        .await;

    assert_eq!((result.processed, result.failed), (1, 1));
    assert_eq!(result.status(), BatchStatus::PartialFailure);
}

#[tokio::test]
async fn missing_object_is_an_item_failure() {
    let store = Arc::new(MemoryStore::new());

    let result = processor(TransformKind::Greyscale, store)
        .process(&batch(vec![envelope(vec![record(
            "photos",
            "uploads/ghost.jpg",
        )])]))
        .await;

    assert_eq!((result.processed, result.failed), (0, 1));
}

#[tokio::test]
async fn all_failed_batch_is_still_partial_failure() {
    let store = Arc::new(MemoryStore::new());

    let result = processor(TransformKind::Resize, store)
        .process(&batch(vec![envelope(vec![
            record("photos", "uploads/one.jpg"),
            record("photos", "uploads/two.jpg"),
        ])]))
        .await;

    assert_eq!((result.processed, result.failed), (0, 2));
    // the same multi-status whether one item failed or all of them
    assert_eq!(result.status_code(), 207);
}

#[tokio::test]
async fn mixed_outcomes_tally_every_item_exactly_once() {
    let store = Arc::new(MemoryStore::new());
    store.insert("photos", "uploads/good.jpg", jpeg(300, 300));
    store.insert("photos", "uploads/bad.jpg", b"garbage".to_vec());

    let result = processor(TransformKind::Resize, store.clone())
        .process(&batch(vec![envelope(vec![
            record("photos", "uploads/good.jpg"),
            record("photos", "uploads/bad.jpg"),
            record("photos", "thumbnails/done.jpg"),
        ])]))
        .await;

    // 3 items: one processed, one failed, one skipped (absent from counters)
    assert_eq!((result.processed, result.failed), (1, 1));
}

#[tokio::test]
async fn envelope_without_inner_records_contributes_nothing() {
    let store = Arc::new(MemoryStore::new());

    let result = processor(TransformKind::Resize, store)
        .process(&batch(vec![json!({"Sns": {"Message": "{}"}})]))
        .await;

    // valid JSON with no Records is empty, not malformed
    assert_eq!((result.processed, result.failed), (0, 0));
    assert_eq!(result.status(), BatchStatus::Success);
}
