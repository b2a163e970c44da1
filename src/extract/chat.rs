//! `ChatExtractor` — item extraction via an OpenAI-compatible chat endpoint.
//!
//! Sends the transcript with the extraction prompt to
//! `/v1/chat/completions` and parses the line-per-item reply.  Works with
//! any provider that speaks the OpenAI chat-completions wire format.

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::extract::item::{parse_items, ExtractedItem};
use crate::extract::prompt::ExtractionPrompt;
use crate::extract::ItemExtractor;
use crate::service::{classify_response, classify_transport, ServiceError};

/// Sampling temperature for extraction — low, the task is deterministic.
const EXTRACTION_TEMPERATURE: f32 = 0.3;

/// Generation cap; a shopping list fits comfortably under this.
const EXTRACTION_MAX_TOKENS: u32 = 500;

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// All connection details (`base_url`, `api_key`, `extraction_model`,
/// timeout) come exclusively from the [`ApiConfig`] passed to
/// [`ChatExtractor::from_config`]; nothing is hardcoded.
pub struct ChatExtractor {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatExtractor {
    /// Build a `ChatExtractor` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            model: config.extraction_model.clone(),
        }
    }
}

#[async_trait]
impl ItemExtractor for ChatExtractor {
    /// Extract shopping-list items from `transcript`.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when the
    /// resolved key is non-empty — local OpenAI-compatible providers need
    /// no authentication, and a hosted provider that does require one will
    /// answer 401, which classifies as [`ServiceError::Auth`].
    async fn extract(&self, transcript: &str) -> Result<Vec<ExtractedItem>, ServiceError> {
        let (system_msg, user_msg) = ExtractionPrompt::build_chat(transcript);

        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model":       self.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": EXTRACTION_TEMPERATURE,
            "max_tokens":  EXTRACTION_MAX_TOKENS
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_response(status, &text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Other(format!("malformed extraction response: {e}")))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ServiceError::Other("extraction response missing message content".into())
            })?;

        // An empty or whitespace-only reply is the model saying "no items";
        // the caller decides what that means.
        Ok(parse_items(content))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn make_config(api_key: Option<&str>) -> ApiConfig {
        ApiConfig {
            base_url: "http://localhost:11434".into(),
            api_key: api_key.map(|s| s.to_string()),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let config = make_config(None);
        let _extractor = ChatExtractor::from_config(&config);
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let config = make_config(Some(""));
        let _extractor = ChatExtractor::from_config(&config);
    }

    #[test]
    fn from_config_trims_trailing_slash() {
        let mut config = make_config(Some("sk-test-1234"));
        config.base_url = "https://api.openai.com/".into();
        let extractor = ChatExtractor::from_config(&config);
        assert_eq!(extractor.base_url, "https://api.openai.com");
    }

    /// Verify that `ChatExtractor` is object-safe (usable as `dyn ItemExtractor`).
    #[test]
    fn extractor_is_object_safe() {
        let config = make_config(None);
        let extractor: Box<dyn ItemExtractor> = Box::new(ChatExtractor::from_config(&config));
        drop(extractor);
    }
}
