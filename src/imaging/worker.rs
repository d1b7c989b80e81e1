//! Background thread that re-encodes bitmaps off the caller's thread.
//!
//! Requests and responses travel over channels; each request carries its
//! own reply channel, so any number of callers can share one worker.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::encode::{encode_rgba, jpeg_quality};
use super::CompressError;

/// A bitmap to re-encode.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    /// Tightly packed RGBA8 pixels.
    pub image_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// 0.0..=1.0; zero means the worker default.
    pub quality: f32,
}

/// The worker's answer to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeResponse {
    Blob(Vec<u8>),
    Error(String),
}

/// Statistics from the compression worker.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    pub requests_encoded: usize,
    pub requests_failed: usize,
}

struct Job {
    request: EncodeRequest,
    reply: Sender<EncodeResponse>,
}

/// A background thread answering `EncodeRequest`s.
///
/// ## Example
///
/// ```ignore
/// use shelfkeeper::imaging::{CompressionWorker, EncodeRequest};
///
/// let worker = CompressionWorker::spawn();
/// let jpeg = worker.encode(EncodeRequest {
///     image_data: rgba,
///     width: 400,
///     height: 200,
///     quality: 0.7,
/// })?;
///
/// let stats = worker.stop();
/// println!("Encoded {} images", stats.requests_encoded);
/// ```
///
/// Dropping the worker closes the request channel; the thread finishes the
/// queued jobs and exits on its own.
pub struct CompressionWorker {
    requests: Sender<Job>,
    handle: JoinHandle<WorkerStats>,
}

impl CompressionWorker {
    pub fn spawn() -> Self {
        let (tx, rx) = channel::<Job>();

        let handle = thread::spawn(move || {
            let mut stats = WorkerStats::default();

            // Ends once every sender is gone.
            for job in rx {
                let request = job.request;
                let response = match encode_rgba(
                    &request.image_data,
                    request.width,
                    request.height,
                    jpeg_quality(request.quality),
                ) {
                    Ok(blob) => {
                        stats.requests_encoded += 1;
                        EncodeResponse::Blob(blob)
                    }
                    Err(error) => {
                        stats.requests_failed += 1;
                        EncodeResponse::Error(error)
                    }
                };
                // The caller may have stopped waiting.
                let _ = job.reply.send(response);
            }

            stats
        });

        Self {
            requests: tx,
            handle,
        }
    }

    /// Queue a request and return the channel its response will arrive on.
    ///
    /// Fails with `CompressError::Environment` once the worker thread has
    /// exited.
    pub fn submit(&self, request: EncodeRequest) -> Result<Receiver<EncodeResponse>, CompressError> {
        let (reply, response) = channel();
        self.requests
            .send(Job { request, reply })
            .map_err(|_| CompressError::Environment("compression worker is not running".into()))?;
        Ok(response)
    }

    /// Submit a request and wait for the encoded bytes.
    pub fn encode(&self, request: EncodeRequest) -> Result<Vec<u8>, CompressError> {
        let response = self.submit(request)?.recv().map_err(|_| {
            CompressError::Environment("compression worker exited without replying".into())
        })?;

        match response {
            EncodeResponse::Blob(blob) => Ok(blob),
            EncodeResponse::Error(error) => Err(CompressError::Encode(error)),
        }
    }

    /// Close the request channel, wait for queued work to drain and return
    /// the worker statistics.
    pub fn stop(self) -> WorkerStats {
        let CompressionWorker { requests, handle } = self;
        drop(requests);
        handle.join().unwrap_or_else(|_| {
            log::error!("compression worker panicked");
            WorkerStats::default()
        })
    }
}
