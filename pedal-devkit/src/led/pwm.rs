//! Deterministic software PWM for a single channel.

/// Duty-cycle generator with period `N` ticks.
///
/// With `k = round(target * N)` on-ticks per period, tick `t` is on when
/// `floor((t + 1) k / N) > floor(t k / N)`. This spreads the on-ticks evenly
/// across the period instead of bunching them at the start, so the visible
/// ripple frequency stays as high as possible. Every window of `N`
/// consecutive ticks contains exactly `k` on-ticks.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmChannel {
    target: f32,
    on_ticks: u8,
    period: u8,
    tick: u8,
}

impl PwmChannel {
    /// A dark channel with period `period` (zero is treated as one).
    pub const fn new(period: u8) -> Self {
        PwmChannel {
            target: 0.0,
            on_ticks: 0,
            period: if period == 0 { 1 } else { period },
            tick: 0,
        }
    }

    /// Store a new target in `[0, 1]`. Does not touch the phase.
    pub fn set(&mut self, intensity: f32) {
        let target = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        self.target = target;
        self.on_ticks = libm::roundf(target * self.period as f32) as u8;
    }

    /// Advance one tick and return whether the channel is on for it.
    pub fn advance(&mut self) -> bool {
        let t = self.tick as u16;
        let k = self.on_ticks as u16;
        let n = self.period as u16;
        let on = (t + 1) * k / n > t * k / n;
        self.tick = if self.tick + 1 >= self.period {
            0
        } else {
            self.tick + 1
        };
        on
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// On-ticks per period.
    pub fn on_ticks(&self) -> u8 {
        self.on_ticks
    }

    pub fn period(&self) -> u8 {
        self.period
    }

    /// Position within the period, `0..N`.
    pub fn tick(&self) -> u8 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_count(ch: &mut PwmChannel, ticks: usize) -> usize {
        (0..ticks).filter(|_| ch.advance()).count()
    }

    #[test]
    fn duty_matches_rounded_target_over_any_window() {
        let period = 8u8;
        for step in 0..=20 {
            let target = step as f32 / 20.0;
            let expected = libm::roundf(target * period as f32) as usize;
            let mut ch = PwmChannel::new(period);
            ch.set(target);

            let mut history = [false; 64];
            for slot in history.iter_mut() {
                *slot = ch.advance();
            }
            for start in 0..=(history.len() - period as usize) {
                let count = history[start..start + period as usize]
                    .iter()
                    .filter(|&&on| on)
                    .count();
                assert_eq!(count, expected, "target {} window at {}", target, start);
            }
        }
    }

    #[test]
    fn extremes() {
        let mut ch = PwmChannel::new(4);
        assert_eq!(on_count(&mut ch, 16), 0);
        ch.set(1.0);
        assert_eq!(on_count(&mut ch, 16), 16);
        ch.set(7.0);
        assert_eq!(ch.target(), 1.0);
        ch.set(-1.0);
        assert_eq!(on_count(&mut ch, 16), 0);
        ch.set(f32::NAN);
        assert_eq!(ch.target(), 0.0);
    }

    #[test]
    fn half_duty_alternates() {
        let mut ch = PwmChannel::new(8);
        ch.set(0.5);
        let pattern: [bool; 8] = core::array::from_fn(|_| ch.advance());
        assert_eq!(
            pattern,
            [false, true, false, true, false, true, false, true]
        );
    }

    #[test]
    fn repeated_set_is_idempotent() {
        let mut once = PwmChannel::new(8);
        let mut many = PwmChannel::new(8);
        once.set(0.5);
        for _ in 0..10 {
            many.set(0.5);
        }
        for _ in 0..32 {
            assert_eq!(once.advance(), many.advance());
        }
    }

    #[test]
    fn set_does_not_reset_phase() {
        let mut ch = PwmChannel::new(8);
        ch.set(0.25);
        ch.advance();
        ch.advance();
        ch.advance();
        ch.set(0.25);
        assert_eq!(ch.tick(), 3);
    }

    #[test]
    fn tick_wraps_modulo_period() {
        let mut ch = PwmChannel::new(5);
        for i in 0..23u8 {
            assert_eq!(ch.tick(), i % 5);
            ch.advance();
        }
    }

    #[test]
    fn zero_period_is_one() {
        let mut ch = PwmChannel::new(0);
        assert_eq!(ch.period(), 1);
        ch.set(0.6);
        assert!(ch.advance());
        assert!(ch.advance());
    }
}
