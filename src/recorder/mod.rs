//! Recorder subsystem — the press/hold/lock state machine and gesture layer.
//!
//! ```text
//! pointer events → GestureTracker → RecorderCommand
//!                                        │
//!                                        ▼
//!                               VoiceRecorder (async)
//!                                 Idle → Recording → Locked
//!                                          └─▶ Processing → Idle
//! ```
//!
//! The recorder exclusively owns the microphone handle; see
//! [`machine::VoiceRecorder`] for the release guarantees.

pub mod gesture;
pub mod machine;
pub mod state;

pub use gesture::{GestureTracker, RecorderCommand, LOCK_THRESHOLD_PX};
pub use machine::{RecorderError, VoiceRecorder};
pub use state::RecordingState;
