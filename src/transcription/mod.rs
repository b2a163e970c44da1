//! Transcription client — speech-to-text over an OpenAI-compatible API.
//!
//! [`Transcriber`] is the async seam the orchestrator calls;
//! [`WhisperApiTranscriber`] is the production implementation.  The target
//! language is fixed to Portuguese and every request carries the grocery
//! vocabulary hint from [`vocabulary`].
//!
//! Payloads under [`MIN_UPLOAD_BYTES`] are rejected before any network call;
//! this is the service-side admission check, independent of the recorder's
//! client-side size gate.  Each invocation is a single attempt — the
//! orchestrator surfaces failures immediately instead of retrying.

pub mod vocabulary;
pub mod whisper_api;

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::AudioCapture;
use crate::service::ServiceError;

pub use vocabulary::{vocabulary_prompt, GROCERY_VOCABULARY};
pub use whisper_api::WhisperApiTranscriber;

/// Fixed target language for speech-to-text.  Not user-selectable.
pub const TARGET_LANGUAGE: &str = "pt";

/// Minimum payload accepted by the transcription boundary (10 KiB).
pub const MIN_UPLOAD_BYTES: usize = 10 * 1024;

// ---------------------------------------------------------------------------
// TranscriptionResult / TranscriptionError
// ---------------------------------------------------------------------------

/// Plain-text transcript of one capture.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub text: String,
}

/// Failure of one transcription attempt.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranscriptionError {
    /// Payload is below the service minimum; no network call was made.
    #[error("audio payload below the {min}-byte service minimum ({got} bytes)")]
    PayloadTooSmall { min: usize, got: usize },

    /// The service call itself failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async speech-to-text seam.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn Transcriber>`.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one capture.  Exactly one attempt; no internal retries.
    async fn transcribe(
        &self,
        capture: &AudioCapture,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}
