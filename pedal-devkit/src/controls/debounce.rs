//! Debounced digital inputs.
//!
//! [`DebouncedInput`] is the pin-independent filter: it accepts one logical
//! level per tick and commits a new level only after the raw level has held
//! for `window` consecutive ticks. [`Switch`] binds it to an
//! [`embedded_hal::digital::InputPin`] with a configurable polarity.

use embedded_hal::digital::InputPin;

use crate::config::ticks_for;
use crate::time::Instant;

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputPolarity {
    /// Pulled up, pressed shorts to ground.
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl InputPolarity {
    /// Convert an electrical level to a logical one.
    #[inline]
    pub const fn logical(self, pin_high: bool) -> bool {
        match self {
            InputPolarity::ActiveLow => !pin_high,
            InputPolarity::ActiveHigh => pin_high,
        }
    }
}

/// Tick-counting debounce filter with single-tick edge pulses.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebouncedInput {
    raw_level: bool,
    candidate: bool,
    /// Consecutive ticks `candidate` has been observed, saturating.
    held_ticks: u32,
    debounced_level: bool,
    window: u32,
    /// When the current candidate level was first seen.
    stable_since: Instant,
    /// When `debounced_level` last changed.
    changed_at: Instant,
    rising: bool,
    falling: bool,
}

impl DebouncedInput {
    /// Create a filter that needs `window` identical samples to commit a level.
    ///
    /// A window of zero is treated as one. The filter starts settled low.
    pub const fn new(window: u32) -> Self {
        let window = if window == 0 { 1 } else { window };
        DebouncedInput {
            raw_level: false,
            candidate: false,
            held_ticks: window,
            debounced_level: false,
            window,
            stable_since: Instant::ZERO,
            changed_at: Instant::ZERO,
            rising: false,
            falling: false,
        }
    }

    /// Create a filter sampled at `sample_rate` Hz with a window in milliseconds.
    pub fn with_window_ms(sample_rate: f32, window_ms: u32) -> Self {
        Self::new(ticks_for(window_ms, sample_rate))
    }

    /// Feed one raw level. Must be called exactly once per tick.
    pub fn sample(&mut self, raw_level: bool, now: Instant) {
        self.rising = false;
        self.falling = false;
        self.raw_level = raw_level;

        if raw_level != self.candidate {
            self.candidate = raw_level;
            self.held_ticks = 1;
            self.stable_since = now;
        } else {
            self.held_ticks = self.held_ticks.saturating_add(1);
        }

        if self.held_ticks >= self.window && self.candidate != self.debounced_level {
            self.debounced_level = self.candidate;
            self.changed_at = now;
            if self.debounced_level {
                self.rising = true;
            } else {
                self.falling = true;
            }
        }
    }

    #[inline]
    pub fn debounced_level(&self) -> bool {
        self.debounced_level
    }

    /// True only on the tick the debounced level went high.
    #[inline]
    pub fn rising_edge(&self) -> bool {
        self.rising
    }

    /// True only on the tick the debounced level went low.
    #[inline]
    pub fn falling_edge(&self) -> bool {
        self.falling
    }

    /// Last unfiltered level.
    #[inline]
    pub fn raw_level(&self) -> bool {
        self.raw_level
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn stable_since(&self) -> Instant {
        self.stable_since
    }

    /// Milliseconds the debounced level has been high, or 0 while low.
    pub fn time_held_ms(&self, now: Instant) -> u32 {
        if self.debounced_level {
            now.millis_since(self.changed_at)
        } else {
            0
        }
    }
}

/// A debounced switch on a GPIO input.
pub struct Switch<P> {
    pin: P,
    polarity: InputPolarity,
    /// Last electrical level read successfully.
    pin_high: bool,
    input: DebouncedInput,
}

impl<P: InputPin> Switch<P> {
    /// Bind `pin` with a debounce window in callback ticks.
    pub fn new(pin: P, polarity: InputPolarity, window: u32) -> Self {
        Switch {
            pin,
            polarity,
            // Idle electrical level for the given polarity.
            pin_high: polarity == InputPolarity::ActiveLow,
            input: DebouncedInput::new(window),
        }
    }

    /// Read the pin and advance the filter by one tick.
    ///
    /// A failed read repeats the previous level.
    pub fn debounce(&mut self, now: Instant) {
        if let Ok(high) = self.pin.is_high() {
            self.pin_high = high;
        }
        let level = self.polarity.logical(self.pin_high);
        self.input.sample(level, now);
    }

    #[inline]
    pub fn pressed(&self) -> bool {
        self.input.debounced_level()
    }

    #[inline]
    pub fn rising_edge(&self) -> bool {
        self.input.rising_edge()
    }

    #[inline]
    pub fn falling_edge(&self) -> bool {
        self.input.falling_edge()
    }

    /// Logical level of the last read, without debouncing.
    #[inline]
    pub fn raw_state(&self) -> bool {
        self.input.raw_level()
    }

    pub fn time_held_ms(&self, now: Instant) -> u32 {
        self.input.time_held_ms(now)
    }

    pub fn state(&self) -> &DebouncedInput {
        &self.input
    }

    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Input pin whose level is driven through a shared cell.
    pub(crate) struct MockInput<'a>(pub &'a Cell<bool>);

    impl ErrorType for MockInput<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockInput<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    fn t(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn short_high_never_commits() {
        let window = 5;
        let mut input = DebouncedInput::new(window);
        for i in 0..window - 1 {
            input.sample(true, t(i));
            assert!(!input.rising_edge());
            assert!(!input.debounced_level());
        }
        input.sample(false, t(window));
        assert!(!input.rising_edge());
        assert!(!input.falling_edge());
        assert!(!input.debounced_level());
    }

    #[test]
    fn high_for_full_window_rises_on_completing_tick() {
        let window = 5;
        let mut input = DebouncedInput::new(window);
        for i in 0..window {
            input.sample(true, t(i));
            if i + 1 < window {
                assert!(!input.rising_edge(), "edge too early at tick {}", i);
            }
        }
        assert!(input.rising_edge());
        assert!(input.debounced_level());

        // Edge is a single-tick pulse
        input.sample(true, t(window));
        assert!(!input.rising_edge());
        assert!(input.debounced_level());
    }

    #[test]
    fn glitches_shorter_than_window_are_absorbed() {
        let mut input = DebouncedInput::new(4);
        for i in 0..4 {
            input.sample(true, t(i));
        }
        assert!(input.debounced_level());

        // Chatter: low for 3, high for 1, low for 2, high again
        let pattern = [false, false, false, true, false, false, true, true, true, true];
        for (i, &level) in pattern.iter().enumerate() {
            input.sample(level, t(10 + i as u32));
            assert!(input.debounced_level(), "dropped at step {}", i);
            assert!(!input.falling_edge());
        }
    }

    #[test]
    fn falling_edge_after_release() {
        let mut input = DebouncedInput::new(3);
        for i in 0..3 {
            input.sample(true, t(i));
        }
        input.sample(false, t(3));
        input.sample(false, t(4));
        assert!(input.debounced_level());
        input.sample(false, t(5));
        assert!(input.falling_edge());
        assert!(!input.debounced_level());
    }

    #[test]
    fn window_of_one_follows_raw() {
        let mut input = DebouncedInput::new(0);
        assert_eq!(input.window(), 1);
        input.sample(true, t(0));
        assert!(input.rising_edge());
        input.sample(false, t(1));
        assert!(input.falling_edge());
    }

    #[test]
    fn window_from_milliseconds() {
        let input = DebouncedInput::with_window_ms(1000.0, 8);
        assert_eq!(input.window(), 8);
    }

    #[test]
    fn stable_since_tracks_candidate_changes() {
        let mut input = DebouncedInput::new(3);
        input.sample(true, t(7));
        input.sample(true, t(8));
        assert_eq!(input.stable_since(), t(7));
        input.sample(false, t(9));
        assert_eq!(input.stable_since(), t(9));
    }

    #[test]
    fn time_held_counts_from_commit() {
        let mut input = DebouncedInput::new(2);
        input.sample(true, t(100));
        input.sample(true, t(101));
        assert_eq!(input.time_held_ms(t(151)), 50);
        input.sample(false, t(152));
        input.sample(false, t(153));
        assert_eq!(input.time_held_ms(t(200)), 0);
    }

    #[test]
    fn switch_active_low_pressed_when_pin_low() {
        let level = Cell::new(true);
        let mut sw = Switch::new(MockInput(&level), InputPolarity::ActiveLow, 2);

        sw.debounce(t(0));
        assert!(!sw.pressed());
        assert!(!sw.raw_state());

        level.set(false);
        sw.debounce(t(1));
        assert!(sw.raw_state());
        assert!(!sw.pressed());
        sw.debounce(t(2));
        assert!(sw.pressed());
        assert!(sw.rising_edge());
    }

    #[test]
    fn switch_active_high() {
        let level = Cell::new(false);
        let mut sw = Switch::new(MockInput(&level), InputPolarity::ActiveHigh, 1);
        sw.debounce(t(0));
        assert!(!sw.pressed());
        level.set(true);
        sw.debounce(t(1));
        assert!(sw.pressed());
    }
}
