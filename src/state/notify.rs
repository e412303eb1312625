use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long one message stays on screen before the next may surface.
pub const DWELL: Duration = Duration::from_secs(4);

/// Pending user-facing messages: unbounded FIFO, no deduplication, drained
/// one at a time into a transient display. Fed by poll failures and by
/// failed invoke/reinvoke/cancel actions.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: VecDeque<String>,
    showing: Option<(String, Instant)>,
}

impl NotificationQueue {
    pub fn push(&mut self, msg: impl Into<String>) {
        self.pending.push_back(msg.into());
    }

    /// Drain tick (100ms cadence). Expires the displayed message after its
    /// dwell window; if the slot is free and the queue is non-empty, the
    /// next message surfaces.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, since)) = &self.showing {
            if now.duration_since(*since) >= DWELL {
                self.showing = None;
            }
        }
        if self.showing.is_none() {
            if let Some(msg) = self.pending.pop_front() {
                self.showing = Some((msg, now));
            }
        }
    }

    pub fn visible(&self) -> Option<&str> {
        self.showing.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
#[path = "../tests/state/notify_tests.rs"]
mod tests;
