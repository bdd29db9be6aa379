// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Converts wall-clock time into 60 Hz timer ticks.
//!
//! The delay and sound timers decrement at a fixed rate no matter how fast
//! the host drives [crate::cpu::CPU::step], be it 500 Hz, 1000 Hz, or paused on
//! a key-wait. The [Ticker] is a fixed-timestep accumulator: the host feeds
//! it elapsed time whenever convenient, and it answers with the number of
//! whole ticks that have come due.

use std::time::Duration;

/// Timer decrement rate, in ticks per second
pub const TICK_HZ: u32 = 60;

/// Fixed-timestep accumulator over the 60 Hz timer cadence.
///
/// Residual time shorter than one tick is carried, not discarded, so the
/// long-run rate stays exact regardless of how unevenly the host calls in.
///
/// # Examples
/// ```rust
/// # use cheep::timer::Ticker;
/// # use std::time::Duration;
/// let mut ticker = Ticker::default();
/// assert_eq!(ticker.advance(Duration::from_millis(10)), 0);
/// // the earlier 10ms still counts toward this tick
/// assert_eq!(ticker.advance(Duration::from_millis(10)), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticker {
    interval: Duration,
    accrued: Duration,
}

impl Ticker {
    /// Constructs a ticker at the standard [TICK_HZ] cadence
    pub fn new() -> Self {
        Self {
            interval: Duration::from_secs(1) / TICK_HZ,
            accrued: Duration::ZERO,
        }
    }

    /// Banks `elapsed` wall-clock time and returns how many whole ticks
    /// are now due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accrued += elapsed;
        let due = (self.accrued.as_nanos() / self.interval.as_nanos()) as u32;
        self.accrued -= self.interval * due;
        due
    }

    /// Drops any banked partial tick (used when the machine resets, so a
    /// stale fraction doesn't tick the next run early)
    pub fn reset(&mut self) {
        self.accrued = Duration::ZERO;
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}
