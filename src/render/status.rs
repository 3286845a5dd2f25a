use std::time::{Duration, Instant};

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(2);

/// Transient status text with a fixed-delay expiry.
///
/// Callers pass `now` explicitly, so expiry is deterministic and needs no
/// timer: the message is simply no longer reported once the TTL elapses.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: Option<(String, Instant)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text`, restarting the expiry clock.
    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.message = Some((text.into(), now));
    }

    /// Visible text at `now`, or None once the TTL has elapsed.
    pub fn current(&self, now: Instant) -> Option<&str> {
        self.message.as_ref().and_then(|(text, shown)| {
            (now.saturating_duration_since(*shown) < STATUS_TTL).then_some(text.as_str())
        })
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}
