//! Rotary encoder with push-button click.
//!
//! Both quadrature lines and the click are debounced like any other switch.
//! The decoder compares the debounced two-bit phase against the previous one:
//!
//! ```text
//! forward:  00 → 01 → 11 → 10 → 00   (+1 per transition)
//! reverse:  00 → 10 → 11 → 01 → 00   (−1 per transition)
//! ```
//!
//! A jump across two phases (00 ↔ 11, 01 ↔ 10) cannot be attributed to a
//! direction and is dropped.

use embedded_hal::digital::InputPin;

use super::debounce::{InputPolarity, Switch};
use crate::time::Instant;

/// Step for `(previous_phase << 2) | current_phase`.
const TRANSITIONS: [i8; 16] = [
    0, 1, -1, 0, //
    -1, 0, 0, 1, //
    1, 0, 0, -1, //
    0, -1, 1, 0, //
];

/// Gray-code quadrature state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadratureDecoder {
    phase: u8,
}

impl QuadratureDecoder {
    pub const fn new() -> Self {
        QuadratureDecoder { phase: 0 }
    }

    /// Feed the current line levels. Returns +1, −1 or 0.
    pub fn step(&mut self, a: bool, b: bool) -> i32 {
        let phase = ((a as u8) << 1) | b as u8;
        let delta = TRANSITIONS[((self.phase << 2) | phase) as usize];
        self.phase = phase;
        delta as i32
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }
}

/// Encoder tracker: debounced lines, per-tick step and a signed accumulator
/// that a click resets.
pub struct Encoder<A, B, C> {
    line_a: Switch<A>,
    line_b: Switch<B>,
    click: Switch<C>,
    decoder: QuadratureDecoder,
    /// Step detected on the current tick.
    step: i32,
    position_delta: i32,
}

impl<A: InputPin, B: InputPin, C: InputPin> Encoder<A, B, C> {
    /// Bind the three pins (all active-low) with a debounce window in ticks.
    pub fn new(pin_a: A, pin_b: B, click_pin: C, window: u32) -> Self {
        Encoder {
            line_a: Switch::new(pin_a, InputPolarity::ActiveLow, window),
            line_b: Switch::new(pin_b, InputPolarity::ActiveLow, window),
            click: Switch::new(click_pin, InputPolarity::ActiveLow, window),
            decoder: QuadratureDecoder::new(),
            step: 0,
            position_delta: 0,
        }
    }

    /// Debounce all three lines and decode this tick's step.
    pub fn debounce(&mut self, now: Instant) {
        self.line_a.debounce(now);
        self.line_b.debounce(now);
        self.click.debounce(now);
        self.step = self
            .decoder
            .step(self.line_a.pressed(), self.line_b.pressed());
    }

    /// Fold this tick's step into the accumulator. A click rising edge resets
    /// the accumulator to zero, discarding any simultaneous step.
    pub fn accumulate(&mut self) {
        if self.click.rising_edge() {
            self.position_delta = 0;
        } else {
            self.position_delta = self.position_delta.wrapping_add(self.step);
        }
    }

    /// [`debounce()`](Self::debounce) then [`accumulate()`](Self::accumulate).
    pub fn tick(&mut self, now: Instant) {
        self.debounce(now);
        self.accumulate();
    }

    /// Step decoded on the current tick (+1, −1 or 0).
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Net steps since the last reset. Accumulates until a click or
    /// [`reset()`](Self::reset).
    pub fn increment(&self) -> i32 {
        self.position_delta
    }

    pub fn reset(&mut self) {
        self.position_delta = 0;
    }

    pub fn rising_edge_click(&self) -> bool {
        self.click.rising_edge()
    }

    pub fn click_pressed(&self) -> bool {
        self.click.pressed()
    }
}
