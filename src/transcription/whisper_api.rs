//! Whisper transcription over HTTP multipart.

use async_trait::async_trait;

use serde::Deserialize;

use crate::audio::AudioCapture;
use crate::config::ApiConfig;
use crate::service::{classify_response, classify_transport, ServiceError};

use super::{
    vocabulary_prompt, Transcriber, TranscriptionError, TranscriptionResult, MIN_UPLOAD_BYTES,
    TARGET_LANGUAGE,
};

/// Response body of a successful `audio/transcriptions` call.
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Map a declared MIME type onto the upload filename extension.
fn file_extension_for(mime_type: &str) -> &'static str {
    if mime_type.contains("mp4") {
        "mp4"
    } else if mime_type.contains("wav") {
        "wav"
    } else if mime_type.contains("ogg") {
        "ogg"
    } else if mime_type.contains("mp3") {
        "mp3"
    } else {
        "webm"
    }
}

// ---------------------------------------------------------------------------
// WhisperApiTranscriber
// ---------------------------------------------------------------------------

/// Production transcriber posting multipart audio to an OpenAI-compatible
/// `audio/transcriptions` endpoint.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl WhisperApiTranscriber {
    /// Build a transcriber from application config.
    ///
    /// The HTTP client carries the configured per-request timeout; timeouts
    /// surface as [`ServiceError::Network`].
    pub fn from_config(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            model: config.transcription_model.clone(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(
        &self,
        capture: &AudioCapture,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        // Admission gate before any network traffic.
        if capture.byte_len() < MIN_UPLOAD_BYTES {
            return Err(TranscriptionError::PayloadTooSmall {
                min: MIN_UPLOAD_BYTES,
                got: capture.byte_len(),
            });
        }

        let key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(ServiceError::Auth("transcription API key not configured".into()).into())
            }
        };

        let file_name = format!("audio.{}", file_extension_for(capture.mime_type()));
        let file_part = reqwest::multipart::Part::bytes(capture.bytes().to_vec())
            .file_name(file_name)
            .mime_str(capture.base_mime_type())
            .map_err(|e| ServiceError::Other(format!("invalid upload MIME type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("language", TARGET_LANGUAGE)
            .text("prompt", vocabulary_prompt())
            .text("response_format", "json");

        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        log::debug!(
            "transcription request: {} bytes, {} → {url}",
            capture.byte_len(),
            capture.mime_type()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_response(status, &body).into());
        }

        let parsed: WhisperResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Other(format!("malformed transcription response: {e}")))?;

        let text = parsed.text.trim().to_string();
        log::debug!("transcript: {text:?}");
        Ok(TranscriptionResult { text })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn config(key: Option<&str>) -> ApiConfig {
        ApiConfig {
            api_key: key.map(str::to_string),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn extension_mapping_matches_mime() {
        assert_eq!(file_extension_for("audio/wav;codecs=pcm_s16le"), "wav");
        assert_eq!(file_extension_for("audio/mp4"), "mp4");
        assert_eq!(file_extension_for("audio/ogg;codecs=opus"), "ogg");
        assert_eq!(file_extension_for("audio/mpeg3-mp3"), "mp3");
        assert_eq!(file_extension_for("audio/webm"), "webm");
        assert_eq!(file_extension_for("application/octet-stream"), "webm");
    }

    #[tokio::test]
    async fn undersized_payload_is_rejected_before_network() {
        // base_url is unroutable; reaching the network would fail loudly.
        let mut cfg = config(Some("sk-test"));
        cfg.base_url = "http://invalid.localdomain".into();
        let transcriber = WhisperApiTranscriber::from_config(&cfg);

        let capture = AudioCapture::for_tests(vec![0u8; MIN_UPLOAD_BYTES - 1], "audio/wav", 2_000);
        let err = transcriber.transcribe(&capture).await.unwrap_err();
        assert!(
            matches!(err, TranscriptionError::PayloadTooSmall { got, .. } if got == MIN_UPLOAD_BYTES - 1),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn missing_api_key_maps_to_auth_error() {
        // Force the key absent regardless of any env fallback.
        let mut transcriber = WhisperApiTranscriber::from_config(&config(None));
        transcriber.api_key = None;

        let capture = AudioCapture::for_tests(vec![0u8; MIN_UPLOAD_BYTES], "audio/wav", 2_000);
        let err = transcriber.transcribe(&capture).await.unwrap_err();
        assert!(matches!(
            err,
            TranscriptionError::Service(ServiceError::Auth(_))
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let mut cfg = config(Some("sk"));
        cfg.base_url = "https://api.openai.com/".into();
        let transcriber = WhisperApiTranscriber::from_config(&cfg);
        assert_eq!(transcriber.base_url, "https://api.openai.com");
    }
}
