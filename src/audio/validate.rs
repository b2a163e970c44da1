//! Capture validation — the gates between raw chunks and a pipeline call.
//!
//! [`CaptureValidator`] runs when a recording stops.  A capture must pass
//! both client-side gates before an [`AudioCapture`] exists at all:
//!
//! | Gate | Threshold | Failure |
//! |------|-----------|---------|
//! | Duration | ≥ 500 ms | [`CaptureGateError::TooShort`] |
//! | Encoded size | ≥ 1000 bytes | [`CaptureGateError::TooSmall`] |
//!
//! A stricter 10 KiB minimum is enforced later at the transcription
//! boundary; both gates must pass for audio to reach the network.

use thiserror::Error;

use super::capture::AudioChunk;
use super::encode::{encode, negotiate_format, EncodeError, FormatProbe};

/// Minimum capture duration before transcription is worth attempting.
pub const MIN_CAPTURE_MS: u64 = 500;
/// Minimum encoded payload size in bytes.
pub const MIN_CAPTURE_BYTES: usize = 1_000;

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// A validated, encoded capture ready for the pipeline.
///
/// Constructed only by [`CaptureValidator::assemble`] after both gates pass;
/// the fields are private so the payload is immutable once created.  The
/// pipeline invocation that receives it owns it exclusively.
#[derive(Debug, Clone)]
pub struct AudioCapture {
    bytes: Vec<u8>,
    mime_type: &'static str,
    duration_ms: u64,
}

impl AudioCapture {
    /// The encoded audio payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared MIME type, possibly with a codec parameter
    /// (e.g. `audio/wav;codecs=pcm_s16le`).
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// MIME type with any parameters stripped (`audio/wav`).
    pub fn base_mime_type(&self) -> &'static str {
        self.mime_type.split(';').next().unwrap_or(self.mime_type)
    }

    /// Capture duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Encoded payload length in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Construct a capture directly, bypassing the gates.  Tests use this to
    /// feed the pipeline payloads of a precise size.
    #[cfg(test)]
    pub fn for_tests(bytes: Vec<u8>, mime_type: &'static str, duration_ms: u64) -> Self {
        Self {
            bytes,
            mime_type,
            duration_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureGateError
// ---------------------------------------------------------------------------

/// Reason a stopped recording never became an [`AudioCapture`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CaptureGateError {
    /// Capture is shorter than the minimum duration.
    #[error("recording too short: {got_ms} ms (minimum {min_ms} ms)")]
    TooShort { min_ms: u64, got_ms: u64 },

    /// Encoded payload is below the minimum byte length.
    #[error("recording too small: {got_bytes} bytes (minimum {min_bytes} bytes)")]
    TooSmall { min_bytes: usize, got_bytes: usize },

    /// No encoding in the preference list is supported by the environment.
    #[error("no supported audio encoding available")]
    NoSupportedFormat,

    /// Encoding itself failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

// ---------------------------------------------------------------------------
// CaptureValidator
// ---------------------------------------------------------------------------

/// Validates and assembles buffered chunks into an [`AudioCapture`].
#[derive(Debug, Clone)]
pub struct CaptureValidator {
    pub min_duration_ms: u64,
    pub min_bytes: usize,
}

impl Default for CaptureValidator {
    fn default() -> Self {
        Self {
            min_duration_ms: MIN_CAPTURE_MS,
            min_bytes: MIN_CAPTURE_BYTES,
        }
    }
}

impl CaptureValidator {
    pub fn new(min_duration_ms: u64, min_bytes: usize) -> Self {
        Self {
            min_duration_ms,
            min_bytes,
        }
    }

    /// Run both gates over `chunks` and build the payload.
    ///
    /// Order matters: the duration gate runs before any encoding work so a
    /// too-short tap never pays for serialization, then the format is
    /// negotiated, then the encoded size gate runs on the real payload.
    pub fn assemble(
        &self,
        chunks: &[AudioChunk],
        probe: &dyn FormatProbe,
    ) -> Result<AudioCapture, CaptureGateError> {
        let duration_ms: u64 = chunks.iter().map(AudioChunk::duration_ms).sum();

        if duration_ms < self.min_duration_ms {
            return Err(CaptureGateError::TooShort {
                min_ms: self.min_duration_ms,
                got_ms: duration_ms,
            });
        }

        let format = negotiate_format(probe).ok_or(CaptureGateError::NoSupportedFormat)?;
        let bytes = encode(format, chunks)?;

        if bytes.len() < self.min_bytes {
            return Err(CaptureGateError::TooSmall {
                min_bytes: self.min_bytes,
                got_bytes: bytes.len(),
            });
        }

        log::debug!(
            "capture assembled: {} ms, {} bytes, {}",
            duration_ms,
            bytes.len(),
            format.mime_type()
        );

        Ok(AudioCapture {
            bytes,
            mime_type: format.mime_type(),
            duration_ms,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
