//! Physical controls: switches, toggles, encoder and pots.
//!
//! | Type | Source | Filtering |
//! |------|--------|-----------|
//! | [`Switch`] | one GPIO | tick-counting debounce |
//! | [`Switch3`] | two GPIOs | none |
//! | [`Encoder`] | three GPIOs | debounce + Gray-code decode |
//! | [`AnalogControl`] | ADC channel | one-pole low-pass |
//!
//! [`ControlSurface`] is the seam the audio callback drives; [`DevKitControls`]
//! implements it for the pedal kit's panel.

pub mod analog;
pub mod debounce;
pub(crate) mod devkit;
pub mod encoder;
pub mod switch3;

pub use analog::{AdcReader, AnalogControl};
pub use debounce::{DebouncedInput, InputPolarity, Switch};
pub use devkit::{BypassSource, DevKitControls, DevKitPins, POT_COUNT};
pub use encoder::{Encoder, QuadratureDecoder};
pub use switch3::{Position, Switch3};

use crate::bypass::BypassState;
use crate::time::Instant;

/// Read-only copy of the control state, published once per audio callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSnapshot {
    /// Callback time the snapshot was taken.
    pub at: Instant,
    /// Raw ADC codes: pot 1–3, expression.
    pub pot_codes: [u16; POT_COUNT],
    /// Smoothed values in `[0, 1]`, same order.
    pub pots: [f32; POT_COUNT],
    /// Two-way toggle, debounced.
    pub toggle: bool,
    pub toggle3: Position,
    pub footswitch: bool,
    pub pushbutton: bool,
    /// Encoder accumulator.
    pub encoder: i32,
    pub bypass: BypassState,
}

/// Per-callback control work, split into the scheduler's fixed stages.
///
/// Implementations must be bounded and allocation-free: every method runs
/// inside the audio callback.
pub trait ControlSurface {
    /// Stage 1: sample and debounce every digital input (encoder included)
    /// and process the pots.
    fn debounce(&mut self, now: Instant);

    /// Stage 2: advance every software-PWM LED by one tick.
    fn update_leds(&mut self);

    /// Stage 3: fold the encoder step into its accumulator.
    fn update_encoder(&mut self);

    /// Stage 4: drive the relays and bypass indicator.
    fn update_bypass(&mut self);

    /// Copy out the current state.
    fn snapshot(&self, now: Instant) -> ControlSnapshot;
}
