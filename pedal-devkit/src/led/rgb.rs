//! Three-channel PWM LED with a tint used for brightness-only control.
//!
//! Each colour keeps its own [`PwmChannel`]; all three advance together on
//! [`LedChannel::update`].

use embedded_hal::digital::OutputPin;

use super::{LedChannel, OutputPolarity, PwmChannel};

/// Three-channel LED, one GPIO per colour.
///
/// As a [`LedChannel`] it scales a tint: `set_brightness(b)` sets the colour
/// to `tint * b`. The default tint is pure red.
pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    polarity: OutputPolarity,
    channels: [PwmChannel; 3],
    tint: [f32; 3],
    brightness: f32,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbLed<R, G, B> {
    pub fn new(red: R, green: G, blue: B, polarity: OutputPolarity, period: u8) -> Self {
        RgbLed {
            red,
            green,
            blue,
            polarity,
            channels: [PwmChannel::new(period); 3],
            tint: [1.0, 0.0, 0.0],
            brightness: 0.0,
        }
    }

    /// Store per-channel targets in `[0, 1]`.
    pub fn set(&mut self, r: f32, g: f32, b: f32) {
        self.channels[0].set(r);
        self.channels[1].set(g);
        self.channels[2].set(b);
        self.brightness = self.channels[0]
            .target()
            .max(self.channels[1].target())
            .max(self.channels[2].target());
    }

    /// Colour used by [`LedChannel::set_brightness`].
    pub fn set_tint(&mut self, r: f32, g: f32, b: f32) {
        self.tint = [r, g, b];
    }

    /// Current per-channel targets.
    pub fn color(&self) -> [f32; 3] {
        [
            self.channels[0].target(),
            self.channels[1].target(),
            self.channels[2].target(),
        ]
    }

    /// PWM state of colour `index` (0 red, 1 green, 2 blue). Panics above 2.
    pub fn channel(&self, index: usize) -> &PwmChannel {
        &self.channels[index]
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> LedChannel for RgbLed<R, G, B> {
    fn set_brightness(&mut self, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        let [r, g, b] = self.tint;
        self.set(r * level, g * level, b * level);
        self.brightness = level;
    }

    fn brightness(&self) -> f32 {
        self.brightness
    }

    fn update(&mut self) {
        let on = [
            self.channels[0].advance(),
            self.channels[1].advance(),
            self.channels[2].advance(),
        ];
        let _ = self.red.set_state(self.polarity.pin_state(on[0]));
        let _ = self.green.set_state(self.polarity.pin_state(on[1]));
        let _ = self.blue.set_state(self.polarity.pin_state(on[2]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::led::tests::MockOutput;
    use core::cell::Cell;

    #[test]
    fn independent_channels() {
        let (r, g, b) = (Cell::new(false), Cell::new(false), Cell::new(false));
        let writes = Cell::new(0);
        let mut led = RgbLed::new(
            MockOutput::new(&r, &writes),
            MockOutput::new(&g, &writes),
            MockOutput::new(&b, &writes),
            OutputPolarity::ActiveHigh,
            4,
        );
        led.set(1.0, 0.5, 0.0);
        let mut counts = [0; 3];
        for _ in 0..4 {
            led.update();
            counts[0] += r.get() as u32;
            counts[1] += g.get() as u32;
            counts[2] += b.get() as u32;
        }
        assert_eq!(counts, [4, 2, 0]);
        assert_eq!(writes.get(), 12);
    }

    #[test]
    fn brightness_scales_tint() {
        let (r, g, b) = (Cell::new(false), Cell::new(false), Cell::new(false));
        let writes = Cell::new(0);
        let mut led = RgbLed::new(
            MockOutput::new(&r, &writes),
            MockOutput::new(&g, &writes),
            MockOutput::new(&b, &writes),
            OutputPolarity::ActiveHigh,
            8,
        );
        led.set_brightness(1.0);
        assert_eq!(led.color(), [1.0, 0.0, 0.0]);

        led.set_tint(0.0, 1.0, 0.5);
        led.set_brightness(0.5);
        assert_eq!(led.color(), [0.0, 0.5, 0.25]);
        assert_eq!(led.brightness(), 0.5);
        assert_eq!(writes.get(), 0);
    }
}
