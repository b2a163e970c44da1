//! Audio subsystem — microphone capture, encoding, and capture validation.
//!
//! ```text
//! Microphone (trait) → MicHandle chunks → CaptureValidator
//!                                           ├─ duration gate (≥ 500 ms)
//!                                           ├─ format negotiation (probe)
//!                                           ├─ WAV assembly (hound)
//!                                           └─ size gate (≥ 1000 bytes)
//!                                               ↓
//!                                          AudioCapture
//! ```

pub mod capture;
pub mod encode;
pub mod validate;

pub use capture::{AudioChunk, CaptureRequest, CpalMicrophone, MicError, MicHandle, Microphone};
pub use encode::{negotiate_format, AudioFormat, EncodeError, FormatProbe, WavEncoder, PREFERRED_FORMATS};
pub use validate::{
    AudioCapture, CaptureGateError, CaptureValidator, MIN_CAPTURE_BYTES, MIN_CAPTURE_MS,
};

#[cfg(test)]
pub use capture::MockMicrophone;
