//! Press-and-hold gesture interpretation.
//!
//! [`GestureTracker`] turns raw pointer events into [`RecorderCommand`]s:
//! press starts a capture, dragging upward past [`LOCK_THRESHOLD_PX`] locks
//! it hands-free, releasing an unlocked hold stops it, and releasing a
//! locked hold does nothing — the explicit send/cancel controls take over.
//!
//! The tracker is pure gesture logic; it never touches the recorder and can
//! be driven entirely from tests.

/// Upward drag distance (pixels) that converts a hold into a locked capture.
pub const LOCK_THRESHOLD_PX: f32 = 100.0;

/// Command the front end should issue to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    Start,
    Lock,
    Stop,
    Cancel,
}

/// Interprets a single-pointer press/drag/release sequence.
#[derive(Debug, Default)]
pub struct GestureTracker {
    /// Vertical position where the active press began, if any.
    press_origin_y: Option<f32>,
    /// Whether the active capture has been locked hands-free.
    locked: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press or a locked capture is currently active.
    pub fn is_active(&self) -> bool {
        self.press_origin_y.is_some() || self.locked
    }

    /// Pointer down at vertical position `y`.  Ignored while a gesture is
    /// already active.
    pub fn press(&mut self, y: f32) -> Option<RecorderCommand> {
        if self.is_active() {
            return None;
        }
        self.press_origin_y = Some(y);
        self.locked = false;
        Some(RecorderCommand::Start)
    }

    /// Pointer moved to vertical position `y` while held.  Emits
    /// [`RecorderCommand::Lock`] once when the upward distance from the
    /// press origin exceeds the threshold.
    pub fn drag(&mut self, y: f32) -> Option<RecorderCommand> {
        let origin = self.press_origin_y?;
        if self.locked {
            return None;
        }
        // Screen coordinates grow downward, so upward drag is origin - y.
        if origin - y > LOCK_THRESHOLD_PX {
            self.locked = true;
            self.press_origin_y = None;
            return Some(RecorderCommand::Lock);
        }
        None
    }

    /// Pointer up.  Stops an unlocked capture; a locked capture keeps
    /// running until [`send`](Self::send) or [`cancel`](Self::cancel).
    pub fn release(&mut self) -> Option<RecorderCommand> {
        if self.locked {
            return None;
        }
        self.press_origin_y.take().map(|_| RecorderCommand::Stop)
    }

    /// Explicit send action on a locked capture.
    pub fn send(&mut self) -> Option<RecorderCommand> {
        if self.locked {
            self.locked = false;
            Some(RecorderCommand::Stop)
        } else {
            None
        }
    }

    /// Explicit cancel action; valid for both held and locked captures.
    pub fn cancel(&mut self) -> Option<RecorderCommand> {
        if self.is_active() {
            self.press_origin_y = None;
            self.locked = false;
            Some(RecorderCommand::Cancel)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
