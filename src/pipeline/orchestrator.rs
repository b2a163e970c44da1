//! Pipeline orchestrator — drives validated audio through transcription and
//! item extraction.
//!
//! # Pipeline flow
//!
//! ```text
//! AudioCapture (already gated for duration/size)
//!   └─▶ transcriber.transcribe          — Whisper, Portuguese
//!         └─▶ extractor.extract         — chat model, one item per line
//!               ├─ items   → VoiceCaptureOutcome { transcript, items }
//!               └─ no item → PipelineError::NoItemsFound { transcript }
//! ```
//!
//! The two stages run strictly in sequence; extraction is never attempted
//! when transcription failed, so one capture costs at most one call per
//! service.  There are no retries at this layer — every failure maps to a
//! [`PipelineError`] and the user decides whether to speak again.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::audio::AudioCapture;
use crate::extract::{ExtractedItem, ItemExtractor};
use crate::transcription::Transcriber;

use super::error::PipelineError;

// ---------------------------------------------------------------------------
// VoiceCaptureOutcome
// ---------------------------------------------------------------------------

/// Successful result of one capture: what was heard, and what it meant.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCaptureOutcome {
    /// Trimmed transcript as returned by the speech service.
    pub transcript: String,
    /// Normalized shopping-list items, in spoken order. Never empty.
    pub items: Vec<ExtractedItem>,
}

// ---------------------------------------------------------------------------
// VoicePipeline
// ---------------------------------------------------------------------------

/// Runs the transcribe-then-extract sequence for one validated capture.
///
/// Both stages are trait objects so tests can substitute mocks and the
/// binary can wire real HTTP backends.
pub struct VoicePipeline {
    transcriber: Arc<dyn Transcriber>,
    extractor: Arc<dyn ItemExtractor>,
}

impl VoicePipeline {
    pub fn new(transcriber: Arc<dyn Transcriber>, extractor: Arc<dyn ItemExtractor>) -> Self {
        Self {
            transcriber,
            extractor,
        }
    }

    /// Process one gated capture into shopping-list items.
    ///
    /// An empty extraction result is promoted to
    /// [`PipelineError::NoItemsFound`] carrying the transcript, so the UI
    /// can show the user what was heard alongside the complaint.
    pub async fn process_voice(
        &self,
        capture: AudioCapture,
    ) -> Result<VoiceCaptureOutcome, PipelineError> {
        debug!(
            "processing capture: {} bytes, {}ms, {}",
            capture.byte_len(),
            capture.duration_ms(),
            capture.mime_type()
        );

        let transcription = self.transcriber.transcribe(&capture).await?;
        let transcript = transcription.text;
        info!("transcript: {transcript:?}");

        let items = self.extractor.extract(&transcript).await?;

        if items.is_empty() {
            warn!("no items extracted from transcript: {transcript:?}");
            return Err(PipelineError::NoItemsFound { transcript });
        }

        info!("extracted {} item(s)", items.len());
        Ok(VoiceCaptureOutcome { transcript, items })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::service::ServiceError;
    use crate::transcription::{TranscriptionError, TranscriptionResult};

    struct MockTranscriber {
        reply: Result<&'static str, TranscriptionError>,
        calls: AtomicUsize,
    }

    impl MockTranscriber {
        fn ok(text: &'static str) -> Self {
            Self {
                reply: Ok(text),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(err: TranscriptionError) -> Self {
            Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(
            &self,
            _capture: &AudioCapture,
        ) -> Result<TranscriptionResult, TranscriptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map(|text| TranscriptionResult {
                text: text.to_string(),
            })
        }
    }

    struct MockExtractor {
        reply: Result<Vec<&'static str>, ServiceError>,
        calls: Arc<AtomicUsize>,
    }

    impl MockExtractor {
        fn ok(items: Vec<&'static str>) -> Self {
            Self {
                reply: Ok(items),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(err: ServiceError) -> Self {
            Self {
                reply: Err(err),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ItemExtractor for MockExtractor {
        async fn extract(&self, _transcript: &str) -> Result<Vec<ExtractedItem>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .clone()
                .map(|items| items.into_iter().map(ExtractedItem::new).collect())
        }
    }

    fn capture() -> AudioCapture {
        AudioCapture::for_tests(vec![0u8; 20 * 1024], "audio/wav", 2_000)
    }

    fn pipeline(
        transcriber: MockTranscriber,
        extractor: MockExtractor,
    ) -> (VoicePipeline, Arc<AtomicUsize>) {
        let extract_calls = Arc::clone(&extractor.calls);
        (
            VoicePipeline::new(Arc::new(transcriber), Arc::new(extractor)),
            extract_calls,
        )
    }

    #[tokio::test]
    async fn happy_path_returns_transcript_and_items() {
        let (pipeline, _) = pipeline(
            MockTranscriber::ok("preciso comprar leite e pão"),
            MockExtractor::ok(vec!["Leite", "Pão"]),
        );

        let outcome = pipeline.process_voice(capture()).await.unwrap();

        assert_eq!(outcome.transcript, "preciso comprar leite e pão");
        let items: Vec<&str> = outcome.items.iter().map(ExtractedItem::as_str).collect();
        assert_eq!(items, vec!["Leite", "Pão"]);
    }

    #[tokio::test]
    async fn items_preserve_spoken_order() {
        let (pipeline, _) = pipeline(
            MockTranscriber::ok("arroz, feijão e tomate"),
            MockExtractor::ok(vec!["Arroz", "Feijão", "Tomate"]),
        );

        let outcome = pipeline.process_voice(capture()).await.unwrap();
        let items: Vec<&str> = outcome.items.iter().map(ExtractedItem::as_str).collect();
        assert_eq!(items, vec!["Arroz", "Feijão", "Tomate"]);
    }

    #[tokio::test]
    async fn empty_extraction_becomes_no_items_found_with_transcript() {
        let (pipeline, _) = pipeline(
            MockTranscriber::ok("bom dia, tudo bem?"),
            MockExtractor::ok(vec![]),
        );

        let err = pipeline.process_voice(capture()).await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::NoItemsFound {
                transcript: "bom dia, tudo bem?".into()
            }
        );
    }

    #[tokio::test]
    async fn transcription_failure_skips_extraction() {
        let (pipeline, extract_calls) = pipeline(
            MockTranscriber::failing(TranscriptionError::Service(ServiceError::Network(
                "connect refused".into(),
            ))),
            MockExtractor::ok(vec!["Leite"]),
        );

        let err = pipeline.process_voice(capture()).await.unwrap_err();
        assert_eq!(err, PipelineError::NetworkFailure("connect refused".into()));
        assert_eq!(
            extract_calls.load(Ordering::SeqCst),
            0,
            "extractor must not run when transcription failed"
        );
    }

    #[tokio::test]
    async fn extraction_failure_surfaces_as_pipeline_error() {
        let (pipeline, _) = pipeline(
            MockTranscriber::ok("leite"),
            MockExtractor::failing(ServiceError::RateLimited("slow down".into())),
        );

        let err = pipeline.process_voice(capture()).await.unwrap_err();
        assert_eq!(err, PipelineError::RateLimited("slow down".into()));
    }

    #[tokio::test]
    async fn quota_exhaustion_is_distinguished_from_throttling() {
        let (pipeline, _) = pipeline(
            MockTranscriber::failing(TranscriptionError::Service(
                ServiceError::QuotaExceeded("quota gone".into()),
            )),
            MockExtractor::ok(vec!["Leite"]),
        );

        let err = pipeline.process_voice(capture()).await.unwrap_err();
        assert_eq!(err, PipelineError::QuotaExceeded("quota gone".into()));
    }

    #[tokio::test]
    async fn auth_failure_is_reported_as_service_unavailable() {
        let (pipeline, _) = pipeline(
            MockTranscriber::failing(TranscriptionError::Service(ServiceError::Auth(
                "bad key".into(),
            ))),
            MockExtractor::ok(vec!["Leite"]),
        );

        let err = pipeline.process_voice(capture()).await.unwrap_err();
        assert_eq!(err, PipelineError::ServiceUnavailable("bad key".into()));
    }
}
