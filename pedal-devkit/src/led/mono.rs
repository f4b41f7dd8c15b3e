//! Single-colour PWM LED.

use embedded_hal::digital::OutputPin;

use super::{LedChannel, OutputPolarity, PwmChannel};

/// Single-colour LED on one GPIO.
pub struct Led<P> {
    pin: P,
    polarity: OutputPolarity,
    pwm: PwmChannel,
    lit: bool,
}

impl<P: OutputPin> Led<P> {
    /// Dark LED; the pin is first written on the next update.
    pub fn new(pin: P, polarity: OutputPolarity, period: u8) -> Self {
        Led {
            pin,
            polarity,
            pwm: PwmChannel::new(period),
            lit: false,
        }
    }

    /// Store the brightness target in `[0, 1]`.
    pub fn set(&mut self, intensity: f32) {
        self.pwm.set(intensity);
    }

    /// Whether the last update drove the LED on.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn pwm(&self) -> &PwmChannel {
        &self.pwm
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> LedChannel for Led<P> {
    fn set_brightness(&mut self, level: f32) {
        self.set(level);
    }

    fn brightness(&self) -> f32 {
        self.pwm.target()
    }

    fn update(&mut self) {
        self.lit = self.pwm.advance();
        // A failed write is corrected by the next tick's write.
        let _ = self.pin.set_state(self.polarity.pin_state(self.lit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::led::tests::MockOutput;
    use core::cell::Cell;

    #[test]
    fn set_alone_never_writes() {
        let level = Cell::new(false);
        let writes = Cell::new(0);
        let mut led = Led::new(MockOutput::new(&level, &writes), OutputPolarity::ActiveHigh, 4);
        led.set(1.0);
        led.set(0.5);
        assert_eq!(writes.get(), 0);
    }

    #[test]
    fn one_write_per_update() {
        let level = Cell::new(false);
        let writes = Cell::new(0);
        let mut led = Led::new(MockOutput::new(&level, &writes), OutputPolarity::ActiveHigh, 4);
        led.set(0.75);
        let mut on = 0;
        for _ in 0..8 {
            led.update();
            if level.get() {
                on += 1;
            }
        }
        assert_eq!(writes.get(), 8);
        assert_eq!(on, 6);
    }

    #[test]
    fn active_low_inverts_pin() {
        let level = Cell::new(false);
        let writes = Cell::new(0);
        let mut led = Led::new(MockOutput::new(&level, &writes), OutputPolarity::ActiveLow, 4);
        led.set_brightness(1.0);
        led.update();
        assert!(led.is_lit());
        assert!(!level.get());
        led.set_brightness(0.0);
        led.update();
        assert!(!led.is_lit());
        assert!(level.get());
        assert_eq!(led.brightness(), 0.0);
    }
}
