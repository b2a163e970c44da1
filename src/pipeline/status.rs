//! Transient status messages for the UI layer.
//!
//! Errors shown to the user disappear on their own after a few seconds;
//! [`TransientMessage`] pairs the text with its deadline so any frontend
//! (terminal loop, status bar, widget) can poll for expiry without owning
//! a timer.

use std::time::{Duration, Instant};

/// How long an error message stays on screen before fading.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// A user-facing message with an expiry deadline.
#[derive(Debug, Clone)]
pub struct TransientMessage {
    text: String,
    shown_at: Instant,
    ttl: Duration,
}

impl TransientMessage {
    /// Show `text` starting now, with the default TTL.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_ttl(text, MESSAGE_TTL)
    }

    pub fn with_ttl(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            shown_at: Instant::now(),
            ttl,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message should still be displayed at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_message_is_visible() {
        let msg = TransientMessage::new("Erro ao processar áudio.");
        assert!(!msg.is_expired());
        assert_eq!(msg.text(), "Erro ao processar áudio.");
    }

    #[test]
    fn message_expires_after_its_ttl() {
        let msg = TransientMessage::new("x");
        let later = Instant::now() + MESSAGE_TTL;
        assert!(msg.is_expired_at(later));
    }

    #[test]
    fn message_is_visible_just_before_the_deadline() {
        let msg = TransientMessage::with_ttl("x", Duration::from_secs(5));
        let almost = Instant::now() + Duration::from_millis(4_900);
        assert!(!msg.is_expired_at(almost));
    }

    #[test]
    fn custom_ttl_is_honored() {
        let msg = TransientMessage::with_ttl("x", Duration::from_millis(100));
        let later = Instant::now() + Duration::from_millis(150);
        assert!(msg.is_expired_at(later));
    }
}
