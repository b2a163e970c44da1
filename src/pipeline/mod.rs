//! End-to-end pipeline: validated capture → transcript → shopping items.
//!
//! This module provides:
//! * [`VoicePipeline`] — sequential transcribe-then-extract orchestrator.
//! * [`VoiceCaptureOutcome`] — transcript plus normalized items.
//! * [`PipelineError`] — flat error taxonomy with Portuguese user messages.
//! * [`TransientMessage`] — auto-expiring status text for the UI.
//!
//! The pipeline starts where the recorder ends: it receives an
//! [`AudioCapture`](crate::audio::AudioCapture) that already passed the
//! duration and size gates, and owns everything network-facing from there.

pub mod error;
pub mod orchestrator;
pub mod status;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use error::PipelineError;
pub use orchestrator::{VoiceCaptureOutcome, VoicePipeline};
pub use status::{TransientMessage, MESSAGE_TTL};
