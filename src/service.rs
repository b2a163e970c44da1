//! Shared plumbing for the OpenAI-compatible HTTP services.
//!
//! Both network stages (Whisper transcription and chat-completions item
//! extraction) talk to the same kind of endpoint and share one failure
//! taxonomy: [`ServiceError`].  The classification helpers in this module
//! turn transport errors and non-2xx responses into that taxonomy so the
//! two clients stay consistent.

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Failure of a single call to a remote service.
///
/// Every variant carries the underlying message so callers can surface it
/// verbatim.  Calls are single attempts; nothing in this crate retries.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// Credentials missing, invalid or rejected (401 / 403 / no key).
    #[error("service credentials missing or rejected: {0}")]
    Auth(String),

    /// The account's usage quota is exhausted.
    #[error("service quota exhausted: {0}")]
    QuotaExceeded(String),

    /// The service is throttling requests (429 without a quota code).
    #[error("service rate limit hit: {0}")]
    RateLimited(String),

    /// The request never produced a response (connect failure, timeout).
    #[error("network failure: {0}")]
    Network(String),

    /// Any other failure, with the response body preserved.
    #[error("service error: {0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Error-body parsing
// ---------------------------------------------------------------------------

/// OpenAI-style error envelope: `{"error": {"message": …, "code": …}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Pull the human-readable message out of an error body, falling back to the
/// raw body when it is not the expected JSON shape.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ => body.trim().to_string(),
    }
}

/// A 429 means quota exhaustion when the error body says so, throttling
/// otherwise.  OpenAI reports both through the same status code and only
/// the body's `code` / `type` field tells them apart.
fn is_quota_exhausted(body: &str) -> bool {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => {
            parsed.error.code.as_deref() == Some("insufficient_quota")
                || parsed.error.kind.as_deref() == Some("insufficient_quota")
        }
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a transport-level failure (the request produced no response).
pub(crate) fn classify_transport(err: &reqwest::Error) -> ServiceError {
    if err.is_connect() {
        ServiceError::Network(format!("failed to connect: {err}"))
    } else if err.is_timeout() {
        ServiceError::Network(format!("request timed out: {err}"))
    } else {
        ServiceError::Network(err.to_string())
    }
}

/// Classify a non-success HTTP response from the status code and body.
pub(crate) fn classify_response(status: reqwest::StatusCode, body: &str) -> ServiceError {
    let message = error_message(body);
    match status.as_u16() {
        401 | 403 => ServiceError::Auth(message),
        429 if is_quota_exhausted(body) => ServiceError::QuotaExceeded(message),
        429 => ServiceError::RateLimited(message),
        other => ServiceError::Other(format!("status {other}: {message}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
