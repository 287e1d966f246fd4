//! Per-line display state machine.

use std::time::{Duration, Instant};

/// State of one mutating control: `Idle -> Pending -> {Idle, Errored}`.
///
/// `Idle` is both the initial and the terminal-success state. `Errored`
/// auto-dismisses back to `Idle` after a dwell (driven by [`LineState::tick`]
/// with an injected clock) or on the next user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineState {
    /// Nothing in flight; display reflects the latest settled state.
    Idle,
    /// A mutation is on the wire; the control is disabled.
    Pending,
    /// The last mutation failed; `message` is shown inline until dismissed.
    Errored {
        /// User-facing error text.
        message: String,
        /// When the error was displayed.
        since: Instant,
    },
}

impl LineState {
    pub fn is_idle(&self) -> bool {
        matches!(self, LineState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LineState::Pending)
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, LineState::Errored { .. })
    }

    /// The inline error text, while errored.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            LineState::Errored { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Enter `Pending`. Returns false when a mutation is already in flight
    /// (the double-submit guard); an error display is replaced.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = LineState::Pending;
        true
    }

    /// Settle the in-flight mutation successfully.
    pub fn settle_ok(&mut self) {
        *self = LineState::Idle;
    }

    /// Settle the in-flight mutation with an inline error.
    pub fn settle_err(&mut self, message: impl Into<String>, now: Instant) {
        *self = LineState::Errored {
            message: message.into(),
            since: now,
        };
    }

    /// Advance the clock: dismiss an error once it has been displayed for
    /// `dwell`.
    pub fn tick(&mut self, now: Instant, dwell: Duration) {
        if let LineState::Errored { since, .. } = self {
            if now.duration_since(*since) >= dwell {
                *self = LineState::Idle;
            }
        }
    }

    /// A user interaction dismisses an error display immediately.
    pub fn interact(&mut self) {
        if self.is_errored() {
            *self = LineState::Idle;
        }
    }
}

impl Default for LineState {
    fn default() -> Self {
        LineState::Idle
    }
}
