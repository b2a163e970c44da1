//! The voice recorder — owns the microphone lifecycle.
//!
//! [`VoiceRecorder`] is the only holder of the device handle and the chunk
//! buffer.  Every exit path out of {Recording, Locked} goes through
//! [`MicHandle::close`], which consumes the handle, so the device is
//! released exactly once whether the capture is stopped, canceled, or fails
//! a gate.
//!
//! Illegal operations (e.g. `lock()` from Idle) are rejected with
//! [`RecorderError::InvalidTransition`] and leave the state untouched.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::audio::capture::{CaptureRequest, MicError, MicHandle, Microphone};
use crate::audio::encode::WavEncoder;
use crate::audio::validate::{AudioCapture, CaptureGateError, CaptureValidator};

use super::state::RecordingState;

// ---------------------------------------------------------------------------
// RecorderError
// ---------------------------------------------------------------------------

/// Errors surfaced by recorder operations.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The operation is not valid in the current state.
    #[error("{op}() is not valid while the recorder is {state}")]
    InvalidTransition {
        op: &'static str,
        state: RecordingState,
    },

    /// Microphone acquisition failed; no device was ever held.
    #[error(transparent)]
    Mic(#[from] MicError),

    /// A capture gate rejected the stopped recording.
    #[error(transparent)]
    Gate(#[from] CaptureGateError),

    /// Unexpected runtime failure (task join).
    #[error("internal recorder error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// VoiceRecorder
// ---------------------------------------------------------------------------

/// An open capture session: the device handle plus bookkeeping.
struct ActiveSession {
    handle: Box<dyn MicHandle>,
    started_at: Instant,
}

/// Single-instance recorder driving the press/hold/lock capture flow.
///
/// `start`, `stop`, and `cancel` are async: they suspend the caller while
/// the permission prompt resolves or the device finalizes buffered data,
/// and never block the interaction thread.
pub struct VoiceRecorder {
    mic: Arc<dyn Microphone>,
    request: CaptureRequest,
    validator: CaptureValidator,
    encoder: WavEncoder,
    state: RecordingState,
    session: Option<ActiveSession>,
}

impl VoiceRecorder {
    pub fn new(mic: Arc<dyn Microphone>, request: CaptureRequest, validator: CaptureValidator) -> Self {
        Self {
            mic,
            request,
            validator,
            encoder: WavEncoder,
            state: RecordingState::Idle,
            session: None,
        }
    }

    /// Recorder with the default capture request and gate thresholds.
    pub fn with_defaults(mic: Arc<dyn Microphone>) -> Self {
        Self::new(mic, CaptureRequest::default(), CaptureValidator::default())
    }

    /// Current state.  The front end reads this to enable/disable controls.
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Begin a capture.  Valid only from Idle.
    ///
    /// On permission denial or missing device the error surfaces and the
    /// recorder stays Idle — no handle was acquired, so there is nothing to
    /// release.
    pub async fn start(&mut self) -> Result<(), RecorderError> {
        if !self.state.can_start() {
            return Err(RecorderError::InvalidTransition {
                op: "start",
                state: self.state,
            });
        }

        let handle = self.mic.open(&self.request).await?;
        self.session = Some(ActiveSession {
            handle,
            started_at: Instant::now(),
        });
        self.state = RecordingState::Recording;
        log::debug!("recorder: Idle → Recording");
        Ok(())
    }

    /// Convert the held capture into a hands-free one.  Valid only from
    /// Recording; the device keeps streaming.
    pub fn lock(&mut self) -> Result<(), RecorderError> {
        if !self.state.can_lock() {
            return Err(RecorderError::InvalidTransition {
                op: "lock",
                state: self.state,
            });
        }
        self.state = RecordingState::Locked;
        log::debug!("recorder: Recording → Locked");
        Ok(())
    }

    /// Finalize the capture.  Valid from Recording or Locked.
    ///
    /// Releases the device, runs the gates, and on success returns the
    /// [`AudioCapture`] with the recorder in Processing.  On gate failure
    /// the recorder returns to Idle — the device is already released either
    /// way.
    pub async fn stop(&mut self) -> Result<AudioCapture, RecorderError> {
        if !self.state.can_stop() {
            return Err(RecorderError::InvalidTransition {
                op: "stop",
                state: self.state,
            });
        }

        let session = self.take_session("stop")?;
        let elapsed = session.started_at.elapsed();
        let chunks = match Self::close_handle(session.handle).await {
            Ok(chunks) => chunks,
            Err(err) => {
                // The handle is consumed even on a failed shutdown; nothing
                // is held, so the recorder must be startable again.
                self.state = RecordingState::Idle;
                log::error!("recorder: capture shutdown failed, back to Idle: {err}");
                return Err(err);
            }
        };
        // Device released at this point, on every path below.

        log::debug!(
            "recorder: stop after {:.2}s, {} chunks buffered",
            elapsed.as_secs_f32(),
            chunks.len()
        );

        match self.validator.assemble(&chunks, &self.encoder) {
            Ok(capture) => {
                self.state = RecordingState::Processing;
                log::debug!("recorder: → Processing ({} bytes)", capture.byte_len());
                Ok(capture)
            }
            Err(gate) => {
                self.state = RecordingState::Idle;
                log::warn!("recorder: capture rejected, back to Idle: {gate}");
                Err(gate.into())
            }
        }
    }

    /// Discard the capture.  Valid from Recording or Locked.
    ///
    /// Releases the device and drops all buffered audio; never produces an
    /// [`AudioCapture`] and never invokes the pipeline.
    pub async fn cancel(&mut self) -> Result<(), RecorderError> {
        if !self.state.can_stop() {
            return Err(RecorderError::InvalidTransition {
                op: "cancel",
                state: self.state,
            });
        }

        let session = self.take_session("cancel")?;
        let result = Self::close_handle(session.handle).await;

        // Buffered audio is discarded whether or not the shutdown succeeded,
        // and the recorder is Idle again either way.
        self.state = RecordingState::Idle;
        log::debug!("recorder: canceled, back to Idle");
        result.map(drop)
    }

    /// Mark the pipeline run finished (success or error): Processing → Idle.
    pub fn finish(&mut self) -> Result<(), RecorderError> {
        if self.state != RecordingState::Processing {
            return Err(RecorderError::InvalidTransition {
                op: "finish",
                state: self.state,
            });
        }
        self.state = RecordingState::Idle;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn take_session(&mut self, op: &'static str) -> Result<ActiveSession, RecorderError> {
        self.session.take().ok_or(RecorderError::InvalidTransition {
            op,
            state: self.state,
        })
    }

    /// Close the device off the async runtime; joining the capture thread
    /// is blocking work.
    async fn close_handle(
        handle: Box<dyn MicHandle>,
    ) -> Result<Vec<crate::audio::AudioChunk>, RecorderError> {
        tokio::task::spawn_blocking(move || handle.close())
            .await
            .map_err(|e| RecorderError::Internal(format!("capture shutdown task failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::capture::MockMicrophone;
    use std::sync::atomic::Ordering;

    fn recorder_with(mic: MockMicrophone) -> (VoiceRecorder, Arc<MockMicrophone>) {
        let mic = Arc::new(mic);
        let recorder = VoiceRecorder::with_defaults(Arc::clone(&mic) as Arc<dyn Microphone>);
        (recorder, mic)
    }

    // --- start/stop lifecycle ---

    #[tokio::test]
    async fn start_stop_acquires_and_releases_exactly_once() {
        let (mut rec, mic) = recorder_with(MockMicrophone::with_duration_ms(1_000));

        rec.start().await.unwrap();
        assert_eq!(rec.state(), RecordingState::Recording);

        let capture = rec.stop().await.unwrap();
        assert_eq!(rec.state(), RecordingState::Processing);
        assert_eq!(capture.duration_ms(), 1_000);

        assert_eq!(mic.opens.load(Ordering::SeqCst), 1);
        assert_eq!(mic.releases.load(Ordering::SeqCst), 1);

        rec.finish().unwrap();
        assert_eq!(rec.state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn start_cancel_releases_exactly_once_without_capture() {
        let (mut rec, mic) = recorder_with(MockMicrophone::with_duration_ms(5_000));

        rec.start().await.unwrap();
        rec.cancel().await.unwrap();

        assert_eq!(rec.state(), RecordingState::Idle);
        assert_eq!(mic.opens.load(Ordering::SeqCst), 1);
        assert_eq!(mic.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_from_locked_also_releases() {
        let (mut rec, mic) = recorder_with(MockMicrophone::with_duration_ms(5_000));

        rec.start().await.unwrap();
        rec.lock().unwrap();
        assert_eq!(rec.state(), RecordingState::Locked);

        rec.cancel().await.unwrap();
        assert_eq!(rec.state(), RecordingState::Idle);
        assert_eq!(mic.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_from_locked_produces_capture() {
        let (mut rec, _mic) = recorder_with(MockMicrophone::with_duration_ms(2_000));

        rec.start().await.unwrap();
        rec.lock().unwrap();
        let capture = rec.stop().await.unwrap();
        assert_eq!(capture.duration_ms(), 2_000);
        assert_eq!(rec.state(), RecordingState::Processing);
    }

    // --- gate failures ---

    #[tokio::test]
    async fn short_capture_fails_gate_and_returns_to_idle() {
        let (mut rec, mic) = recorder_with(MockMicrophone::with_duration_ms(300));

        rec.start().await.unwrap();
        let err = rec.stop().await.unwrap_err();

        assert!(matches!(
            err,
            RecorderError::Gate(CaptureGateError::TooShort { .. })
        ));
        assert_eq!(rec.state(), RecordingState::Idle);
        // Device still released despite the failure.
        assert_eq!(mic.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recorder_is_reusable_after_gate_failure() {
        let (mut rec, mic) = recorder_with(MockMicrophone::with_duration_ms(300));

        rec.start().await.unwrap();
        let _ = rec.stop().await.unwrap_err();

        // A fresh capture works.
        rec.start().await.unwrap();
        rec.cancel().await.unwrap();
        assert_eq!(mic.opens.load(Ordering::SeqCst), 2);
        assert_eq!(mic.releases.load(Ordering::SeqCst), 2);
    }

    // --- acquisition failure ---

    #[tokio::test]
    async fn permission_denied_leaves_recorder_idle() {
        let (mut rec, mic) = recorder_with(MockMicrophone::failing(MicError::PermissionDenied));

        let err = rec.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::Mic(MicError::PermissionDenied)));
        assert_eq!(rec.state(), RecordingState::Idle);
        assert_eq!(mic.opens.load(Ordering::SeqCst), 0);
        assert_eq!(mic.releases.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_device_surfaces_typed_error() {
        let (mut rec, _mic) = recorder_with(MockMicrophone::failing(MicError::NoDevice));
        let err = rec.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::Mic(MicError::NoDevice)));
    }

    // --- guarded transitions ---

    #[tokio::test]
    async fn start_is_rejected_while_not_idle() {
        let (mut rec, mic) = recorder_with(MockMicrophone::with_duration_ms(1_000));

        rec.start().await.unwrap();
        let err = rec.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::InvalidTransition { op: "start", .. }));
        // The rejected second start must not have touched the device.
        assert_eq!(mic.opens.load(Ordering::SeqCst), 1);

        rec.stop().await.unwrap();
        // Still rejected while Processing.
        let err = rec.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn lock_from_idle_is_rejected() {
        let (mut rec, _mic) = recorder_with(MockMicrophone::with_duration_ms(1_000));
        let err = rec.lock().unwrap_err();
        assert!(matches!(err, RecorderError::InvalidTransition { op: "lock", .. }));
    }

    #[tokio::test]
    async fn lock_from_locked_is_rejected() {
        let (mut rec, _mic) = recorder_with(MockMicrophone::with_duration_ms(1_000));
        rec.start().await.unwrap();
        rec.lock().unwrap();
        assert!(rec.lock().is_err());
    }

    #[tokio::test]
    async fn stop_and_cancel_from_idle_are_rejected() {
        let (mut rec, _mic) = recorder_with(MockMicrophone::with_duration_ms(1_000));
        assert!(rec.stop().await.is_err());
        assert!(rec.cancel().await.is_err());
    }

    #[tokio::test]
    async fn finish_requires_processing() {
        let (mut rec, _mic) = recorder_with(MockMicrophone::with_duration_ms(1_000));
        assert!(rec.finish().is_err());

        rec.start().await.unwrap();
        rec.stop().await.unwrap();
        assert!(rec.finish().is_ok());
        assert_eq!(rec.state(), RecordingState::Idle);
    }

    #[test]
    fn invalid_transition_message_names_op_and_state() {
        let err = RecorderError::InvalidTransition {
            op: "lock",
            state: RecordingState::Idle,
        };
        let msg = err.to_string();
        assert!(msg.contains("lock"), "message: {msg}");
        assert!(msg.contains("Idle"), "message: {msg}");
    }

    // --- device shutdown failures ---

    /// Microphone whose handle panics on close, standing in for a capture
    /// backend crashing during teardown.
    #[derive(Debug)]
    struct CrashingMic;

    #[derive(Debug)]
    struct CrashingHandle;

    impl MicHandle for CrashingHandle {
        fn close(self: Box<Self>) -> Vec<crate::audio::AudioChunk> {
            panic!("capture backend crashed during shutdown");
        }
    }

    #[async_trait::async_trait]
    impl Microphone for CrashingMic {
        async fn open(
            &self,
            _request: &CaptureRequest,
        ) -> Result<Box<dyn MicHandle>, MicError> {
            Ok(Box::new(CrashingHandle))
        }
    }

    #[tokio::test]
    async fn shutdown_failure_on_stop_returns_recorder_to_idle() {
        let mut rec = VoiceRecorder::with_defaults(Arc::new(CrashingMic));

        rec.start().await.unwrap();
        let err = rec.stop().await.unwrap_err();
        assert!(matches!(err, RecorderError::Internal(_)), "{err:?}");

        // The handle is gone; the recorder must not stay wedged.
        assert_eq!(rec.state(), RecordingState::Idle);
        assert!(rec.start().await.is_ok());
    }

    #[tokio::test]
    async fn shutdown_failure_on_cancel_returns_recorder_to_idle() {
        let mut rec = VoiceRecorder::with_defaults(Arc::new(CrashingMic));

        rec.start().await.unwrap();
        rec.lock().unwrap();
        let err = rec.cancel().await.unwrap_err();
        assert!(matches!(err, RecorderError::Internal(_)), "{err:?}");

        assert_eq!(rec.state(), RecordingState::Idle);
        assert!(rec.start().await.is_ok());
    }
}
