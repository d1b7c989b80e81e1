//! Profile picture uploads end to end: validation, compression, the worker
//! path and the profile record write.

mod support;

use image::ImageFormat;
use shelfkeeper::config::ImageConfig;
use shelfkeeper::imaging::Dimensions;
use shelfkeeper::{
    CompressError, CompressionWorker, DataUrl, Execution, ImageCompressor, ImageFile,
    PathSource, ProfilePictures, UploadError, UploadEvent, UploadState,
};
use std::sync::Arc;
use support::{gradient, noise, CountingSource, FlakyDocumentStore};
use tempdir::TempDir;

fn pictures(store: Arc<FlakyDocumentStore>) -> ProfilePictures<FlakyDocumentStore> {
    ProfilePictures::new(store, ImageCompressor::default())
}

fn decoded_size(data_url: &str) -> (u32, u32) {
    let parsed: DataUrl = data_url.parse().unwrap();
    let image = image::load_from_memory(parsed.bytes()).unwrap();
    (image.width(), image.height())
}

#[test]
fn wide_png_is_scaled_to_max_edge() {
    let store = Arc::new(FlakyDocumentStore::new());
    let uploads = pictures(Arc::clone(&store));
    let file = ImageFile::new("wide.png", "image/png", gradient(800, 400, ImageFormat::Png));

    let compressed = uploads
        .upload(Some("u1"), &file, Execution::Inline)
        .unwrap();

    assert_eq!(compressed.dimensions, Dimensions::new(400, 200));
    assert_eq!(decoded_size(&compressed.data_url), (400, 200));
    assert!(compressed.estimated_kb <= 900);
    assert_eq!(uploads.load("u1"), Some(compressed.data_url));
    assert_eq!(store.writes(), 1);
}

#[test]
fn tall_jpeg_keeps_aspect_ratio() {
    let compressor = ImageCompressor::default();
    let file = ImageFile::new("tall.jpg", "image/jpg", gradient(300, 900, ImageFormat::Jpeg));

    let compressed = compressor.compress(&file, Execution::Inline).unwrap();
    assert_eq!(compressed.dimensions, Dimensions::new(133, 400));
}

#[test]
fn small_image_is_not_upscaled() {
    let compressor = ImageCompressor::default();
    let file = ImageFile::new("icon.png", "image/png", gradient(64, 32, ImageFormat::Png));

    let compressed = compressor.compress(&file, Execution::Inline).unwrap();
    assert_eq!(decoded_size(&compressed.data_url), (64, 32));
}

#[test]
fn gif_is_rejected_without_reading() {
    let store = Arc::new(FlakyDocumentStore::new());
    let uploads = pictures(Arc::clone(&store));
    let source = CountingSource::new("image/gif", b"GIF89a".to_vec());

    let err = uploads
        .upload(Some("u1"), &source, Execution::Inline)
        .unwrap_err();

    assert_eq!(
        err,
        UploadError::Compress(CompressError::UnsupportedType {
            mime_type: "image/gif".into()
        })
    );
    assert_eq!(err.user_message(), "Only JPG and PNG files are allowed");
    assert_eq!(source.reads(), 0);
    assert_eq!(store.writes(), 0);
}

#[test]
fn oversized_source_is_rejected_without_reading() {
    let store = Arc::new(FlakyDocumentStore::new());
    let uploads = pictures(Arc::clone(&store));
    let source = CountingSource::declared("image/png", 6 * 1024 * 1024);

    let err = uploads
        .upload(Some("u1"), &source, Execution::Inline)
        .unwrap_err();

    assert!(matches!(
        err,
        UploadError::Compress(CompressError::SourceTooLarge { .. })
    ));
    assert_eq!(err.user_message(), "File size must be less than 5MB");
    assert_eq!(source.reads(), 0);
    assert_eq!(store.writes(), 0);
}

#[test]
fn output_over_ceiling_is_not_saved() {
    let store = Arc::new(FlakyDocumentStore::new());
    let config = ImageConfig {
        quality: 100,
        max_encoded_kb: 10,
        ..ImageConfig::default()
    };
    let uploads = ProfilePictures::new(Arc::clone(&store), ImageCompressor::new(config));
    let file = ImageFile::new("noise.png", "image/png", noise(400, 400));

    let err = uploads
        .upload(Some("u1"), &file, Execution::Inline)
        .unwrap_err();

    assert!(matches!(
        err,
        UploadError::Compress(CompressError::ExceedsCeiling { limit_kb: 10, .. })
    ));
    assert_eq!(
        err.user_message(),
        "Compressed image still too large. Try a smaller image."
    );
    assert_eq!(store.writes(), 0);
    assert_eq!(uploads.load("u1"), None);
}

#[test]
fn worker_and_inline_produce_the_same_jpeg() {
    let compressor = ImageCompressor::default();
    let file = ImageFile::new("wide.png", "image/png", gradient(640, 480, ImageFormat::Png));
    let worker = CompressionWorker::spawn();

    let inline = compressor.compress(&file, Execution::Inline).unwrap();
    let offloaded = compressor
        .compress(&file, Execution::Worker(&worker))
        .unwrap();
    assert_eq!(inline, offloaded);

    let stats = worker.stop();
    assert_eq!(stats.requests_encoded, 1);
    assert_eq!(stats.requests_failed, 0);
}

#[test]
fn path_source_goes_through_the_pipeline() {
    let dir = TempDir::new("pictures").unwrap();
    let path = dir.path().join("cover.png");
    std::fs::write(&path, gradient(500, 250, ImageFormat::Png)).unwrap();

    let source = PathSource::open(&path).unwrap();
    let compressed = ImageCompressor::default()
        .compress(&source, Execution::Inline)
        .unwrap();
    assert_eq!(compressed.dimensions, Dimensions::new(400, 200));
}

#[test]
fn save_failure_is_surfaced() {
    let store = Arc::new(FlakyDocumentStore::new());
    store.fail_writes(true);
    let uploads = pictures(Arc::clone(&store));
    let file = ImageFile::new("me.png", "image/png", gradient(40, 40, ImageFormat::Png));

    let err = uploads
        .upload(Some("u1"), &file, Execution::Inline)
        .unwrap_err();

    assert!(matches!(err, UploadError::Save(_)));
    assert!(err
        .user_message()
        .starts_with("Failed to save image: permission denied"));
}

#[test]
fn upload_state_follows_a_failed_then_successful_upload() {
    let store = Arc::new(FlakyDocumentStore::new());
    let uploads = pictures(Arc::clone(&store));

    let state = UploadState::default().apply(UploadEvent::FileSelected);
    assert!(state.uploading);

    let gif = CountingSource::new("image/gif", Vec::new());
    let result = uploads.upload(Some("u1"), &gif, Execution::Inline);
    let state = state.apply(UploadEvent::from_result(&result));
    assert!(!state.uploading);
    assert_eq!(
        state.error.as_deref(),
        Some("Only JPG and PNG files are allowed")
    );
    assert_eq!(state.picture, None);

    let file = ImageFile::new("me.png", "image/png", gradient(40, 40, ImageFormat::Png));
    let state = state.apply(UploadEvent::FileSelected);
    assert_eq!(state.error, None);

    let result = uploads.upload(Some("u1"), &file, Execution::Inline);
    let state = state.apply(UploadEvent::from_result(&result));
    assert!(state.success);
    assert_eq!(state.picture, uploads.load("u1"));
}
