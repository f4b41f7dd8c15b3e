//! Software-PWM LED drivers.
//!
//! | Driver | Channels | Target setter |
//! |--------|----------|---------------|
//! | [`Led`] | 1 | [`Led::set`] |
//! | [`RgbLed`] | 3 | [`RgbLed::set`] |
//!
//! [`test_ramp`] and [`test_sweep`] generate the self-test pattern targets.
//!
//! Setting a target never touches hardware. Each [`LedChannel::update`] call
//! advances one PWM tick and writes every pin exactly once, so it should be
//! driven from the audio callback at a steady rate. Irregular calls show up as
//! flicker; the driver does not detect them.

mod mono;
mod pattern;
mod pwm;
mod rgb;

pub use mono::Led;
pub use pattern::{test_ramp, test_sweep};
pub use pwm::PwmChannel;
pub use rgb::RgbLed;

use embedded_hal::digital::PinState;

/// Electrical level that lights the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputPolarity {
    #[default]
    ActiveHigh,
    /// Sinking drive: the pin pulls the cathode low to light.
    ActiveLow,
}

impl OutputPolarity {
    /// Pin state for a logical on/off.
    #[inline]
    pub const fn pin_state(self, on: bool) -> PinState {
        match (self, on) {
            (OutputPolarity::ActiveHigh, true) | (OutputPolarity::ActiveLow, false) => PinState::High,
            _ => PinState::Low,
        }
    }
}

/// A drivable brightness output.
pub trait LedChannel {
    /// Store the overall brightness target in `[0, 1]`.
    fn set_brightness(&mut self, level: f32);

    /// Current overall brightness target.
    fn brightness(&self) -> f32;

    /// Advance one PWM tick, writing each hardware channel once.
    fn update(&mut self);
}
