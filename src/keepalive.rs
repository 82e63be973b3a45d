//! Keep-alive ping timer.
//!
//! The terminal expects proof of life when the user is not typing. The
//! interval restarts at every typed character and at every ping, so one
//! ping goes out per interval of continued silence.

use crate::link::{self, TerminalLink};
use crate::protocol::PING;

/// Decide whether a ping is due after `idle_ms` of silence.
pub fn ping_due(idle_ms: u64, interval_ms: u64) -> bool {
    idle_ms > interval_ms
}

/// Tracks time since the last liveness event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeepAliveTimer {
    last_activity_ms: u64,
    interval_ms: u64,
}

impl KeepAliveTimer {
    /// Start counting from `now_ms`.
    pub const fn new(now_ms: u64, interval_ms: u64) -> Self {
        Self {
            last_activity_ms: now_ms,
            interval_ms,
        }
    }

    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Record a typed character; postpones the next ping.
    pub fn record_activity(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        ping_due(now_ms.saturating_sub(self.last_activity_ms), self.interval_ms)
    }

    /// Send a ping if one is due. Returns `true` when a ping was sent.
    pub fn tick<W: TerminalLink + ?Sized>(&mut self, now_ms: u64, link: &mut W) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        link::send(link, &[PING]);
        self.last_activity_ms = now_ms;
        debug!("PING");
        true
    }
}
