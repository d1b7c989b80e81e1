//! Shared fixtures: stores that fail or stall on demand, sources that count reads
//! and generated test images.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use shelfkeeper::store::{Document, DocumentStore, InMemoryDocumentStore, StoreError};
use shelfkeeper::{ImageSource, InMemoryLocalStorage, LocalStorage};
use std::io::{self, Cursor};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// A document store that can be told to fail reads or writes.
#[derive(Default)]
pub struct FlakyDocumentStore {
    pub inner: InMemoryDocumentStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay: Mutex<Duration>,
    writes: AtomicUsize,
}

impl FlakyDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Sleep for `delay` before every merge write.
    pub fn delay_writes(&self, delay: Duration) {
        if let Ok(mut write_delay) = self.write_delay.lock() {
            *write_delay = delay;
        }
    }

    /// Successful merge writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl DocumentStore for FlakyDocumentStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("offline".into()));
        }
        self.inner.get_document(collection, id)
    }

    fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<u64, StoreError> {
        let delay = self.write_delay.lock().map(|d| *d).unwrap_or_default();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::PermissionDenied("missing or insufficient permissions".into()));
        }
        let version = self.inner.merge_document(collection, id, fields)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(version)
    }
}

/// Local storage that stalls whenever it is asked to store `slow_value`.
#[derive(Default)]
pub struct SlowLocalStorage {
    pub inner: InMemoryLocalStorage,
    slow_value: String,
    delay: Duration,
}

impl SlowLocalStorage {
    pub fn new(slow_value: &str, delay: Duration) -> Self {
        Self {
            inner: InMemoryLocalStorage::new(),
            slow_value: slow_value.to_string(),
            delay,
        }
    }
}

impl LocalStorage for SlowLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if value == self.slow_value {
            thread::sleep(self.delay);
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove_item(key)
    }
}

/// An image source that records whether its bytes were ever read.
pub struct CountingSource {
    mime_type: String,
    declared_size: u64,
    bytes: Vec<u8>,
    reads: AtomicUsize,
}

impl CountingSource {
    pub fn new(mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            declared_size: bytes.len() as u64,
            bytes,
            reads: AtomicUsize::new(0),
        }
    }

    /// A source that claims `declared_size` bytes regardless of content.
    pub fn declared(mime_type: &str, declared_size: u64) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            declared_size,
            bytes: Vec::new(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ImageSource for CountingSource {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.declared_size
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// A smooth gradient, encoded in `format`.
pub fn gradient(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128, 255])
    });
    encode(DynamicImage::ImageRgba8(image), format)
}

/// Pseudo-random pixels: compresses badly, which makes large outputs.
pub fn noise(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    let image = RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgba([r, g, b, 255])
    });
    encode(DynamicImage::ImageRgba8(image), ImageFormat::Png)
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let image = match format {
        // JPEG cannot carry alpha
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image,
    };
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("test image encodes");
    buf
}
