//! Microphone acquisition behind the [`Microphone`] trait.
//!
//! The recorder never touches `cpal` directly: it opens the device through
//! [`Microphone::open`] and gets back a [`MicHandle`] that buffers
//! [`AudioChunk`]s until it is closed.  `close` consumes the handle, so a
//! device can only ever be released once — the exactly-once release contract
//! is enforced by ownership, not by flags.
//!
//! [`CpalMicrophone`] is the production implementation.  A dedicated thread
//! owns the `cpal::Stream` (it is not `Send`) and forwards callback buffers
//! over an mpsc channel; closing the handle signals that thread and joins it.

use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CaptureRequest
// ---------------------------------------------------------------------------

/// Parameters for opening the microphone.
///
/// Echo cancellation and noise suppression are part of the acquisition
/// contract; backends that cannot toggle them (desktop `cpal` exposes no
/// such switches) apply the platform default processing and log as much.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    /// Requested sample rate in Hz.  The device may record at its native
    /// rate instead; each [`AudioChunk`] reports the actual rate.
    pub sample_rate: u32,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One buffer of raw audio as delivered by the capture callback.
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
    /// Sample rate of this chunk in Hz (e.g. 44100, 48000).
    pub sample_rate: u32,
    /// Number of interleaved channels (1 = mono, 2 = stereo, …).
    pub channels: u16,
}

impl AudioChunk {
    /// Number of sample frames (samples per channel) in this chunk.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Duration of this chunk in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            0
        } else {
            self.frames() as u64 * 1_000 / self.sample_rate as u64
        }
    }
}

// ---------------------------------------------------------------------------
// MicError
// ---------------------------------------------------------------------------

/// Errors that can occur while acquiring or running the microphone.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MicError {
    /// The platform refused access to the input device.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// No input device is present on the default audio host.
    #[error("no microphone input device available")]
    NoDevice,

    /// The device exists but the stream could not be configured or started.
    #[error("audio stream failed: {0}")]
    Stream(String),
}

// ---------------------------------------------------------------------------
// Microphone / MicHandle traits
// ---------------------------------------------------------------------------

/// An open capture session.  Audio accumulates inside the handle from the
/// moment [`Microphone::open`] returns until [`close`](MicHandle::close)
/// is called.
pub trait MicHandle: Send + std::fmt::Debug {
    /// Stop the stream, release the device and return everything captured,
    /// in arrival order.  Consuming `self` makes a double release
    /// unrepresentable.
    fn close(self: Box<Self>) -> Vec<AudioChunk>;
}

/// Async seam for microphone acquisition.
///
/// Implementations must be `Send + Sync` so they can sit behind an
/// `Arc<dyn Microphone>` shared with the recorder.
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Request the device and start capturing.
    ///
    /// Resolves once the platform has granted (or refused) access; callers
    /// are suspended rather than blocked while the permission prompt is up.
    async fn open(&self, request: &CaptureRequest) -> Result<Box<dyn MicHandle>, MicError>;
}

// ---------------------------------------------------------------------------
// CpalMicrophone
// ---------------------------------------------------------------------------

/// Production microphone backed by `cpal`'s default input device.
#[derive(Debug, Default)]
pub struct CpalMicrophone;

impl CpalMicrophone {
    pub fn new() -> Self {
        Self
    }
}

/// Handle over the thread that owns the `cpal::Stream`.
#[derive(Debug)]
struct CpalHandle {
    stop_tx: mpsc::Sender<()>,
    chunk_rx: mpsc::Receiver<AudioChunk>,
    join: thread::JoinHandle<()>,
}

impl MicHandle for CpalHandle {
    fn close(self: Box<Self>) -> Vec<AudioChunk> {
        // The capture thread exits on the stop signal; joining guarantees
        // the stream is torn down before the device counts as released.
        let _ = self.stop_tx.send(());
        if self.join.join().is_err() {
            log::error!("capture thread panicked during shutdown");
        }
        self.chunk_rx.try_iter().collect()
    }
}

#[async_trait]
impl Microphone for CpalMicrophone {
    async fn open(&self, request: &CaptureRequest) -> Result<Box<dyn MicHandle>, MicError> {
        let request = request.clone();
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (chunk_tx, chunk_rx) = mpsc::channel::<AudioChunk>();

        // cpal::Stream is !Send, so the stream lives and dies on this thread.
        let join = thread::Builder::new()
            .name("feirinha-capture".into())
            .spawn(move || run_capture_thread(&request, ready_tx, stop_rx, chunk_tx))
            .map_err(|e| MicError::Stream(format!("failed to spawn capture thread: {e}")))?;

        match ready_rx.await {
            Ok(Ok(())) => Ok(Box::new(CpalHandle {
                stop_tx,
                chunk_rx,
                join,
            })),
            Ok(Err(err)) => {
                // Setup failed; the thread has already returned.
                let _ = join.join();
                Err(err)
            }
            Err(_) => {
                let _ = join.join();
                Err(MicError::Stream("capture thread exited during setup".into()))
            }
        }
    }
}

/// Body of the dedicated capture thread: device setup, then park until the
/// stop signal arrives.  The setup outcome is reported over `ready_tx` so
/// `open()` can resolve with a typed error.
fn run_capture_thread(
    request: &CaptureRequest,
    ready_tx: tokio::sync::oneshot::Sender<Result<(), MicError>>,
    stop_rx: mpsc::Receiver<()>,
    chunk_tx: mpsc::Sender<AudioChunk>,
) {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

    let setup = (|| -> Result<cpal::Stream, MicError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(MicError::NoDevice)?;

        let name = device.name().unwrap_or_else(|_| "unknown device".into());
        log::info!("capture device: {name}");

        let supported = device
            .default_input_config()
            .map_err(|e| MicError::Stream(format!("default input config: {e}")))?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        if sample_rate != request.sample_rate {
            log::warn!(
                "requested {} Hz but device records at {} Hz",
                request.sample_rate,
                sample_rate
            );
        }
        if request.echo_cancellation || request.noise_suppression {
            log::debug!("echo cancellation / noise suppression left to platform defaults");
        }

        let tx = chunk_tx.clone();
        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let chunk = AudioChunk {
                        samples: data.to_vec(),
                        sample_rate,
                        channels,
                    };
                    // Receiver may already be gone during shutdown.
                    let _ = tx.send(chunk);
                },
                |err: cpal::StreamError| {
                    log::error!("cpal stream error: {err}");
                },
                None,
            )
            .map_err(map_build_error)?;

        stream
            .play()
            .map_err(|e| MicError::Stream(format!("failed to start stream: {e}")))?;

        Ok(stream)
    })();

    match setup {
        Ok(stream) => {
            if ready_tx.send(Ok(())).is_err() {
                return; // open() was dropped; tear down immediately
            }
            // Park until stop is requested (or the handle is dropped).
            let _ = stop_rx.recv();
            drop(stream);
            log::debug!("capture stream released");
        }
        Err(err) => {
            let _ = ready_tx.send(Err(err));
        }
    }
}

fn map_build_error(err: cpal::BuildStreamError) -> MicError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => MicError::NoDevice,
        other => {
            let msg = other.to_string();
            let lowered = msg.to_lowercase();
            if lowered.contains("permission") || lowered.contains("denied") {
                MicError::PermissionDenied
            } else {
                MicError::Stream(msg)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MockMicrophone  (test-only)
// ---------------------------------------------------------------------------

/// Test double that hands out scripted chunks and counts how many times the
/// device was acquired and released.
#[cfg(test)]
pub struct MockMicrophone {
    outcome: Result<Vec<AudioChunk>, MicError>,
    pub opens: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    pub releases: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl MockMicrophone {
    /// A microphone whose handle yields `chunks` when closed.
    pub fn with_chunks(chunks: Vec<AudioChunk>) -> Self {
        Self {
            outcome: Ok(chunks),
            opens: Default::default(),
            releases: Default::default(),
        }
    }

    /// A microphone that fails to open with `error`.
    pub fn failing(error: MicError) -> Self {
        Self {
            outcome: Err(error),
            opens: Default::default(),
            releases: Default::default(),
        }
    }

    /// Mono chunks totalling `ms` milliseconds at 44.1 kHz.
    pub fn with_duration_ms(ms: u64) -> Self {
        // Round frames up so the truncating duration_ms lands back on `ms`.
        let frames = ((ms * 44_100 + 999) / 1_000) as usize;
        Self::with_chunks(vec![AudioChunk {
            samples: vec![0.1_f32; frames],
            sample_rate: 44_100,
            channels: 1,
        }])
    }
}

#[cfg(test)]
#[derive(Debug)]
struct MockHandle {
    chunks: Vec<AudioChunk>,
    releases: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl MicHandle for MockHandle {
    fn close(self: Box<Self>) -> Vec<AudioChunk> {
        self.releases
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.chunks
    }
}

#[cfg(test)]
#[async_trait]
impl Microphone for MockMicrophone {
    async fn open(&self, _request: &CaptureRequest) -> Result<Box<dyn MicHandle>, MicError> {
        match &self.outcome {
            Ok(chunks) => {
                self.opens.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(Box::new(MockHandle {
                    chunks: chunks.clone(),
                    releases: std::sync::Arc::clone(&self.releases),
                }))
            }
            Err(err) => Err(err.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
