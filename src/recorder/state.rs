//! Recording state machine type.
//!
//! [`RecordingState`] drives the voice recorder.  Transitions are:
//!
//! ```text
//! Idle ──start()──▶ Recording ──lock()──▶ Locked
//!   ▲                  │                    │
//!   │                  ├─ stop() ──▶ Processing ──finish()──▶ Idle
//!   │                  │                    │
//!   └── cancel() ◀─────┴──────── cancel() ──┘ (stop() also valid from Locked)
//! ```
//!
//! Exactly one recorder exists per application instance, so these states
//! also serialize pipeline runs: the UI must not call `start()` while the
//! state is busy, and the recorder rejects it anyway.

/// Phase of the voice recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// No capture in progress.  Initial state, re-entered after every
    /// completion, cancel, or error.
    Idle,

    /// Microphone open, press held; releasing the press stops the capture.
    Recording,

    /// Microphone open, hands-free; only explicit stop/cancel end it.
    Locked,

    /// Capture validated and handed to the pipeline; microphone already
    /// released.  New recordings are rejected until `finish()`.
    Processing,
}

impl RecordingState {
    /// Whether `start()` is accepted in this state.
    pub fn can_start(&self) -> bool {
        matches!(self, RecordingState::Idle)
    }

    /// Whether `lock()` is accepted in this state.
    pub fn can_lock(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    /// Whether `stop()` / `cancel()` are accepted in this state.
    pub fn can_stop(&self) -> bool {
        matches!(self, RecordingState::Recording | RecordingState::Locked)
    }

    /// Whether the microphone device is held open in this state.
    pub fn holds_microphone(&self) -> bool {
        matches!(self, RecordingState::Recording | RecordingState::Locked)
    }

    /// Short label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            RecordingState::Idle => "Idle",
            RecordingState::Recording => "Recording",
            RecordingState::Locked => "Locked",
            RecordingState::Processing => "Processing",
        }
    }
}

impl Default for RecordingState {
    fn default() -> Self {
        RecordingState::Idle
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(RecordingState::default(), RecordingState::Idle);
    }

    #[test]
    fn only_idle_can_start() {
        assert!(RecordingState::Idle.can_start());
        assert!(!RecordingState::Recording.can_start());
        assert!(!RecordingState::Locked.can_start());
        assert!(!RecordingState::Processing.can_start());
    }

    #[test]
    fn only_recording_can_lock() {
        assert!(RecordingState::Recording.can_lock());
        assert!(!RecordingState::Idle.can_lock());
        assert!(!RecordingState::Locked.can_lock());
        assert!(!RecordingState::Processing.can_lock());
    }

    #[test]
    fn recording_and_locked_can_stop() {
        assert!(RecordingState::Recording.can_stop());
        assert!(RecordingState::Locked.can_stop());
        assert!(!RecordingState::Idle.can_stop());
        assert!(!RecordingState::Processing.can_stop());
    }

    #[test]
    fn microphone_held_exactly_while_recording_or_locked() {
        assert!(RecordingState::Recording.holds_microphone());
        assert!(RecordingState::Locked.holds_microphone());
        assert!(!RecordingState::Idle.holds_microphone());
        assert!(!RecordingState::Processing.holds_microphone());
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(RecordingState::Idle.label(), "Idle");
        assert_eq!(RecordingState::Recording.label(), "Recording");
        assert_eq!(RecordingState::Locked.label(), "Locked");
        assert_eq!(RecordingState::Processing.label(), "Processing");
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(RecordingState::Locked.to_string(), "Locked");
    }
}
