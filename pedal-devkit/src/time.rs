//! Millisecond timestamps and elapsed-time gates.
//!
//! All comparisons use wrapping arithmetic, so a free-running 32-bit
//! millisecond counter rolling over after ~49 days is handled transparently.

/// A point on the monotonic millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    /// Clock origin.
    pub const ZERO: Instant = Instant(0);

    /// Timestamp `ms` milliseconds after the clock origin.
    pub const fn from_millis(ms: u32) -> Self {
        Instant(ms)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    pub const fn millis_since(self, earlier: Instant) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `self` advanced by `ms` milliseconds.
    pub const fn add_millis(self, ms: u32) -> Self {
        Instant(self.0.wrapping_add(ms))
    }
}

/// Monotonic clock collaborator.
pub trait Clock {
    /// Current time. Must not block.
    fn now(&self) -> Instant;
}

/// Rate limiter for housekeeping work.
///
/// [`ready()`](Self::ready) fires when strictly more than `period_ms` has
/// elapsed since it last fired, then re-arms from the current time.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period_ms: u32,
    last: Instant,
}

impl Interval {
    /// Gate that first fires `period_ms + 1` ms after `start`.
    pub const fn new(period_ms: u32, start: Instant) -> Self {
        Interval {
            period_ms,
            last: start,
        }
    }

    /// Whether the period has elapsed at `now`. Re-arms when it returns `true`.
    pub fn ready(&mut self, now: Instant) -> bool {
        if now.millis_since(self.last) > self.period_ms {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }
}
