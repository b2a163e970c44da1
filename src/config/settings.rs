//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::audio::{CaptureRequest, CaptureValidator};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Settings for the speech and extraction services.
///
/// Both stages talk to the same OpenAI-compatible host; they differ only in
/// path and model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API endpoint (no trailing path).
    pub base_url: String,
    /// API key.  `None` falls back to the `OPENAI_API_KEY` environment
    /// variable; local OpenAI-compatible providers may need neither.
    pub api_key: Option<String>,
    /// Model identifier for speech-to-text (e.g. `"whisper-1"`).
    pub transcription_model: String,
    /// Model identifier for item extraction (e.g. `"gpt-4o-mini"`).
    pub extraction_model: String,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            transcription_model: "whisper-1".into(),
            extraction_model: "gpt-4o-mini".into(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Resolve the API key: a non-empty config value wins, otherwise a
    /// non-empty `OPENAI_API_KEY` environment variable, otherwise `None`.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref() {
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture and the pre-upload gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Requested capture sample rate in Hz.
    pub sample_rate: u32,
    /// Request echo cancellation from the input device, where supported.
    pub echo_cancellation: bool,
    /// Request noise suppression from the input device, where supported.
    pub noise_suppression: bool,
    /// Minimum recording length in milliseconds before upload is attempted.
    pub min_capture_ms: u64,
    /// Minimum encoded payload size in bytes.
    pub min_capture_bytes: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            echo_cancellation: true,
            noise_suppression: true,
            min_capture_ms: 500,
            min_capture_bytes: 1_000,
        }
    }
}

impl AudioConfig {
    /// The capture parameters to request when opening the microphone.
    pub fn capture_request(&self) -> CaptureRequest {
        CaptureRequest {
            sample_rate: self.sample_rate,
            echo_cancellation: self.echo_cancellation,
            noise_suppression: self.noise_suppression,
        }
    }

    /// The gate thresholds applied before any upload.
    pub fn validator(&self) -> CaptureValidator {
        CaptureValidator::new(self.min_capture_ms, self.min_capture_bytes)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use feirinha::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Speech and extraction service settings.
    pub api: ApiConfig,
    /// Microphone capture and gate settings.
    pub audio: AudioConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
