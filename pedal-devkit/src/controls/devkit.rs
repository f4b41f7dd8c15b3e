//! The pedal kit's control panel.
//!
//! Pin map of the reference board (Daisy Seed 2 DFM carrier):
//!
//! | Control | Pins |
//! |---------|------|
//! | relays L/R | D20, D21 |
//! | 2-way toggle | D23 |
//! | footswitch | D22 |
//! | 3-way toggle | D25, D24 |
//! | momentary | D26 |
//! | encoder A/B/click | D28, D27, D18 |
//! | LED 1 | D9 |
//! | RGB LED | D11, D12, D31 |
//! | pots 1–3, expression | A0, A1, A2, A4 |

use embedded_hal::digital::{InputPin, OutputPin};

use super::{
    AdcReader, AnalogControl, ControlSnapshot, ControlSurface, Encoder, InputPolarity, Position,
    Switch, Switch3,
};
use crate::bypass::BypassController;
use crate::config::PedalConfig;
use crate::led::{test_ramp, test_sweep, Led, LedChannel, RgbLed};
use crate::time::Instant;

/// Pots 1–3 plus the expression input.
pub const POT_COUNT: usize = 4;

/// Switch that selects true bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BypassSource {
    #[default]
    Toggle,
    Footswitch,
}

/// Pins handed over by board bring-up. All inputs share one erased pin type,
/// as do all outputs.
pub struct DevKitPins<I, O> {
    pub relay_left: O,
    pub relay_right: O,
    pub toggle: I,
    pub footswitch: I,
    pub toggle3_a: I,
    pub toggle3_b: I,
    pub pushbutton: I,
    pub encoder_a: I,
    pub encoder_b: I,
    pub encoder_click: I,
    pub led1: O,
    pub led2_red: O,
    pub led2_green: O,
    pub led2_blue: O,
}

/// Every control on the kit, owned by the audio callback.
///
/// The RGB LED is the bypass indicator (red while processing, by default);
/// LED 1 is left to the application through [`set_led1()`](Self::set_led1).
/// With the test pattern on, both LEDs follow [`test_ramp`] and
/// [`test_sweep`] instead, and the bypass stage only drives the relays.
pub struct DevKitControls<I, O, A> {
    toggle: Switch<I>,
    footswitch: Switch<I>,
    pushbutton: Switch<I>,
    toggle3: Switch3<I, I>,
    encoder: Encoder<I, I, I>,
    led1: Led<O>,
    led2: RgbLed<O, O, O>,
    bypass: BypassController<O, O>,
    bypass_source: BypassSource,
    test_pattern: bool,
    now: Instant,
    pots: [AnalogControl; POT_COUNT],
    adc: A,
}

impl<I, O, A> DevKitControls<I, O, A>
where
    I: InputPin,
    O: OutputPin,
    A: AdcReader,
{
    pub fn new(pins: DevKitPins<I, O>, adc: A, config: &PedalConfig) -> Self {
        let window = config.debounce_ticks();
        let coefficient = config.smoothing_coefficient();
        DevKitControls {
            toggle: Switch::new(pins.toggle, InputPolarity::ActiveLow, window),
            footswitch: Switch::new(pins.footswitch, InputPolarity::ActiveLow, window),
            pushbutton: Switch::new(pins.pushbutton, InputPolarity::ActiveLow, window),
            toggle3: Switch3::new(pins.toggle3_a, pins.toggle3_b),
            encoder: Encoder::new(pins.encoder_a, pins.encoder_b, pins.encoder_click, window),
            led1: Led::new(pins.led1, config.led_polarity, config.pwm_period),
            led2: RgbLed::new(
                pins.led2_red,
                pins.led2_green,
                pins.led2_blue,
                config.led_polarity,
                config.pwm_period,
            ),
            bypass: BypassController::new(pins.relay_left, pins.relay_right, config.bypass),
            bypass_source: BypassSource::Toggle,
            test_pattern: false,
            now: Instant::ZERO,
            pots: core::array::from_fn(|ch| AnalogControl::new(ch, coefficient)),
            adc,
        }
    }

    pub fn with_bypass_source(mut self, source: BypassSource) -> Self {
        self.bypass_source = source;
        self
    }

    /// Animate both LEDs from the callback time, for the hardware self-test.
    pub fn set_led_test_pattern(&mut self, enabled: bool) {
        self.test_pattern = enabled;
    }

    pub fn led_test_pattern(&self) -> bool {
        self.test_pattern
    }

    /// LED 1 brightness target. Overridden while the test pattern runs.
    pub fn set_led1(&mut self, level: f32) {
        self.led1.set(level);
    }

    /// Colour of the bypass indicator at full brightness.
    pub fn set_indicator_tint(&mut self, r: f32, g: f32, b: f32) {
        self.led2.set_tint(r, g, b);
    }

    /// Clear the encoder accumulator.
    pub fn reset_encoder(&mut self) {
        self.encoder.reset();
    }

    pub fn bypass(&self) -> &BypassController<O, O> {
        &self.bypass
    }

    pub fn led1(&self) -> &Led<O> {
        &self.led1
    }

    pub fn led2(&self) -> &RgbLed<O, O, O> {
        &self.led2
    }

    pub fn encoder(&self) -> &Encoder<I, I, I> {
        &self.encoder
    }

    pub fn pot(&self, index: usize) -> &AnalogControl {
        &self.pots[index]
    }

    pub fn toggle(&self) -> &Switch<I> {
        &self.toggle
    }

    pub fn footswitch(&self) -> &Switch<I> {
        &self.footswitch
    }

    pub fn pushbutton(&self) -> &Switch<I> {
        &self.pushbutton
    }

    pub fn toggle3(&self) -> Position {
        self.toggle3.position()
    }

    pub fn adc(&self) -> &A {
        &self.adc
    }
}

impl<I, O, A> ControlSurface for DevKitControls<I, O, A>
where
    I: InputPin,
    O: OutputPin,
    A: AdcReader,
{
    fn debounce(&mut self, now: Instant) {
        self.now = now;
        self.toggle.debounce(now);
        self.footswitch.debounce(now);
        self.pushbutton.debounce(now);
        self.toggle3.read();
        self.encoder.debounce(now);
        for pot in self.pots.iter_mut() {
            pot.process(&self.adc);
        }
    }

    fn update_leds(&mut self) {
        if self.test_pattern {
            self.led1.set(test_ramp(self.now));
            let [r, g, b] = test_sweep(self.now);
            self.led2.set(r, g, b);
        }
        self.led1.update();
        self.led2.update();
    }

    fn update_encoder(&mut self) {
        self.encoder.accumulate();
    }

    fn update_bypass(&mut self) {
        let source = match self.bypass_source {
            BypassSource::Toggle => self.toggle.state(),
            BypassSource::Footswitch => self.footswitch.state(),
        };
        if self.test_pattern {
            self.bypass.drive_relays(source);
        } else {
            self.bypass.tick(source, &mut self.led2);
        }
    }

    fn snapshot(&self, now: Instant) -> ControlSnapshot {
        ControlSnapshot {
            at: now,
            pot_codes: core::array::from_fn(|i| self.pots[i].raw_code()),
            pots: core::array::from_fn(|i| self.pots[i].value()),
            toggle: self.toggle.pressed(),
            toggle3: self.toggle3.position(),
            footswitch: self.footswitch.pressed(),
            pushbutton: self.pushbutton.pressed(),
            encoder: self.encoder.increment(),
            bypass: self.bypass.state(),
        }
    }
}
