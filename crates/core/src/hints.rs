//! Hint wallet - the consumable resource behind the "show matchable cells" assist
//!
//! Hints come from two places:
//!
//! - **Time**: one hint per full 5 hours since the last recovery, at most 5 per
//!   check. The recovery timestamp advances by whole intervals only, so the
//!   remainder of a partial interval carries over to the next check.
//! - **Score**: one hint each time the total score crosses a multiple of 10000.
//!
//! The wallet never holds more than 10.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{HINT_RECOVERY_SECS, HINT_SCORE_STEP, MAX_HINTS, MAX_RECOVERY_PER_CHECK};

/// Wall-clock source, in seconds since the Unix epoch
pub trait Clock {
    fn now_secs(&self) -> u64;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A clock that stands still until told otherwise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl FixedClock {
    pub fn advance(&mut self, secs: u64) {
        self.0 = self.0.saturating_add(secs);
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintWallet {
    count: u8,
    last_recovery_secs: u64,
}

impl HintWallet {
    /// `count` is clamped to the ceiling
    pub fn new(count: u8, last_recovery_secs: u64) -> Self {
        Self {
            count: count.min(MAX_HINTS),
            last_recovery_secs,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn last_recovery_secs(&self) -> u64 {
        self.last_recovery_secs
    }

    fn grant(&mut self, n: u64) -> u8 {
        let room = (MAX_HINTS - self.count) as u64;
        let granted = n.min(room) as u8;
        self.count += granted;
        granted
    }

    /// Time-based recovery. Returns how many hints were granted.
    pub fn recover(&mut self, now_secs: u64) -> u8 {
        if now_secs < self.last_recovery_secs {
            // Clock went backwards; restart the interval from here.
            self.last_recovery_secs = now_secs;
            return 0;
        }
        let intervals = (now_secs - self.last_recovery_secs) / HINT_RECOVERY_SECS;
        if intervals == 0 {
            return 0;
        }
        self.last_recovery_secs += intervals * HINT_RECOVERY_SECS;
        self.grant(intervals.min(MAX_RECOVERY_PER_CHECK as u64))
    }

    /// Score-based replenishment for going from `old_score` to `new_score`
    pub fn award_for_score(&mut self, old_score: u64, new_score: u64) -> u8 {
        let steps = (new_score / HINT_SCORE_STEP).saturating_sub(old_score / HINT_SCORE_STEP);
        self.grant(steps)
    }

    /// Consume one hint; false if the wallet is empty
    pub fn spend(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}
