//! Unified error taxonomy for the capture-to-items pipeline.
//!
//! Every failure from any stage — microphone, capture gates, transcription,
//! extraction — folds into [`PipelineError`] via `From` impls, so callers
//! handle one flat enum.  [`PipelineError::user_message`] maps each variant
//! to a Portuguese sentence fit for direct display.

use thiserror::Error;

use crate::audio::{CaptureGateError, MicError};
use crate::recorder::RecorderError;
use crate::service::ServiceError;
use crate::transcription::TranscriptionError;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// All the ways a voice capture can fail, flattened for the UI layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    /// The user denied microphone access.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// No usable input device was found.
    #[error("no microphone available")]
    NoMicrophone,

    /// The recording stopped before the minimum duration.
    #[error("capture too short: {got_ms}ms < {min_ms}ms")]
    TooShort { min_ms: u64, got_ms: u64 },

    /// The encoded capture is below the minimum payload size.
    #[error("capture too small: {got_bytes} bytes < {min_bytes} bytes")]
    TooSmall { min_bytes: usize, got_bytes: usize },

    /// The request never reached the service (DNS, connect, timeout).
    #[error("network failure talking to the speech service: {0}")]
    NetworkFailure(String),

    /// The service rejected our credentials; nothing the user can do.
    #[error("speech service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The account's usage quota is exhausted.
    #[error("speech service quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Temporarily throttled; retrying later should work.
    #[error("speech service rate limited: {0}")]
    RateLimited(String),

    /// The audio transcribed fine but no shopping items came out of it.
    /// Carries the transcript so the UI can show what was heard.
    #[error("no shopping items found in transcript")]
    NoItemsFound { transcript: String },

    /// Anything that does not fit the variants above.
    #[error("pipeline error: {0}")]
    Unknown(String),
}

impl PipelineError {
    /// Portuguese message for direct display to the user.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::PermissionDenied => {
                "Permissão de microfone negada. Por favor, permita o acesso ao microfone."
                    .to_string()
            }
            PipelineError::NoMicrophone => {
                "Erro ao acessar o microfone. Verifique se seu dispositivo possui um microfone."
                    .to_string()
            }
            PipelineError::TooShort { .. } | PipelineError::TooSmall { .. } => {
                "Áudio muito curto. Grave por pelo menos 1 segundo.".to_string()
            }
            PipelineError::NetworkFailure(_) => {
                "Falha de conexão. Verifique sua internet e tente novamente.".to_string()
            }
            PipelineError::ServiceUnavailable(_) => {
                "Serviço de transcrição indisponível no momento. Tente novamente mais tarde."
                    .to_string()
            }
            PipelineError::QuotaExceeded(_) => {
                "Cota de uso do serviço esgotada. Tente novamente mais tarde.".to_string()
            }
            PipelineError::RateLimited(_) => {
                "Muitas solicitações. Aguarde um momento e tente novamente.".to_string()
            }
            PipelineError::NoItemsFound { .. } => {
                "Nenhum item de compra foi identificado. Tente falar mais claramente.".to_string()
            }
            PipelineError::Unknown(_) => "Erro ao processar áudio.".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage-error conversions
// ---------------------------------------------------------------------------

impl From<MicError> for PipelineError {
    fn from(e: MicError) -> Self {
        match e {
            MicError::PermissionDenied => PipelineError::PermissionDenied,
            MicError::NoDevice => PipelineError::NoMicrophone,
            MicError::Stream(msg) => PipelineError::Unknown(msg),
        }
    }
}

impl From<CaptureGateError> for PipelineError {
    fn from(e: CaptureGateError) -> Self {
        match e {
            CaptureGateError::TooShort { min_ms, got_ms } => {
                PipelineError::TooShort { min_ms, got_ms }
            }
            CaptureGateError::TooSmall {
                min_bytes,
                got_bytes,
            } => PipelineError::TooSmall {
                min_bytes,
                got_bytes,
            },
            CaptureGateError::NoSupportedFormat | CaptureGateError::Encode(_) => {
                PipelineError::Unknown(e.to_string())
            }
        }
    }
}

impl From<ServiceError> for PipelineError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Auth(msg) => PipelineError::ServiceUnavailable(msg),
            ServiceError::QuotaExceeded(msg) => PipelineError::QuotaExceeded(msg),
            ServiceError::RateLimited(msg) => PipelineError::RateLimited(msg),
            ServiceError::Network(msg) => PipelineError::NetworkFailure(msg),
            ServiceError::Other(msg) => PipelineError::Unknown(msg),
        }
    }
}

impl From<TranscriptionError> for PipelineError {
    fn from(e: TranscriptionError) -> Self {
        match e {
            TranscriptionError::PayloadTooSmall { min, got } => PipelineError::TooSmall {
                min_bytes: min,
                got_bytes: got,
            },
            TranscriptionError::Service(service) => service.into(),
        }
    }
}

impl From<RecorderError> for PipelineError {
    fn from(e: RecorderError) -> Self {
        match e {
            RecorderError::Mic(mic) => mic.into(),
            RecorderError::Gate(gate) => gate.into(),
            RecorderError::InvalidTransition { .. } | RecorderError::Internal(_) => {
                PipelineError::Unknown(e.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
