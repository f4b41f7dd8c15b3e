//! True-bypass relay control.
//!
//! The controller mirrors one debounced input onto two relays and an
//! indicator LED. Outputs are rewritten on every tick, not only on edges, so a
//! dropped GPIO write heals on the next callback. It adds no filtering of its
//! own; the switch debounce is the only hysteresis.

use embedded_hal::digital::{OutputPin, PinState};

use crate::controls::DebouncedInput;
use crate::led::LedChannel;

/// Where the audio is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BypassState {
    /// Audio runs through the processor.
    Active,
    /// Relays route input straight to output.
    #[default]
    Bypassed,
}

impl BypassState {
    pub const fn name(self) -> &'static str {
        match self {
            BypassState::Active => "Active",
            BypassState::Bypassed => "Bypassed",
        }
    }
}

/// Mapping between switch level, relay level and indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BypassPolarity {
    /// Debounced level of the switch that selects [`BypassState::Active`].
    pub active_when_pressed: bool,
    /// Level driven on both relays while active.
    pub relay_level_when_active: bool,
    /// State in which the indicator LED is lit.
    pub led_lit_when: BypassState,
}

impl BypassPolarity {
    /// Pressed → processed, relays high, LED lit while processing.
    pub const fn new() -> Self {
        BypassPolarity {
            active_when_pressed: true,
            relay_level_when_active: true,
            led_lit_when: BypassState::Active,
        }
    }

    pub const fn with_led_lit_when(mut self, state: BypassState) -> Self {
        self.led_lit_when = state;
        self
    }

    pub const fn inverted_switch(mut self) -> Self {
        self.active_when_pressed = !self.active_when_pressed;
        self
    }
}

impl Default for BypassPolarity {
    fn default() -> Self {
        Self::new()
    }
}

/// Two relays plus indicator, switched together.
pub struct BypassController<RA, RB> {
    relay_a: RA,
    relay_b: RB,
    polarity: BypassPolarity,
    state: BypassState,
    relay_level: bool,
    led_target: f32,
    changed: bool,
}

impl<RA: OutputPin, RB: OutputPin> BypassController<RA, RB> {
    /// Take the relay pins. Nothing is written until the first tick.
    pub fn new(relay_a: RA, relay_b: RB, polarity: BypassPolarity) -> Self {
        BypassController {
            relay_a,
            relay_b,
            polarity,
            state: BypassState::Bypassed,
            relay_level: !polarity.relay_level_when_active,
            led_target: 0.0,
            changed: false,
        }
    }

    /// Drive both relays and the indicator target from `input`'s debounced level.
    pub fn tick<L: LedChannel + ?Sized>(&mut self, input: &DebouncedInput, led: &mut L) -> BypassState {
        let state = self.drive_relays(input);
        self.led_target = if state == self.polarity.led_lit_when {
            1.0
        } else {
            0.0
        };
        led.set_brightness(self.led_target);
        state
    }

    /// Relay half of [`tick()`](Self::tick), for when the indicator is
    /// showing something else. The LED target is left unchanged.
    pub fn drive_relays(&mut self, input: &DebouncedInput) -> BypassState {
        let active = input.debounced_level() == self.polarity.active_when_pressed;
        let state = if active {
            BypassState::Active
        } else {
            BypassState::Bypassed
        };
        self.changed = state != self.state;
        self.state = state;

        self.relay_level = if active {
            self.polarity.relay_level_when_active
        } else {
            !self.polarity.relay_level_when_active
        };
        let level = PinState::from(self.relay_level);
        let _ = self.relay_a.set_state(level);
        let _ = self.relay_b.set_state(level);
        state
    }

    pub fn state(&self) -> BypassState {
        self.state
    }

    /// Whether the last tick changed the state.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Level last written to both relays.
    pub fn relay_level(&self) -> bool {
        self.relay_level
    }

    /// Indicator target last written.
    pub fn led_target(&self) -> f32 {
        self.led_target
    }

    pub fn polarity(&self) -> BypassPolarity {
        self.polarity
    }
}
