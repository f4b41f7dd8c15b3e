//! Runtime configuration for the control core.
//!
//! Everything here is fixed before the audio callback starts. Derived values
//! (callback rate, debounce length in ticks, smoothing coefficient) are
//! computed once at component construction, never per tick.

use crate::bypass::BypassPolarity;
use crate::constants::*;
use crate::led::OutputPolarity;
use crate::midi::OutboundChannel;

/// Pedal kit configuration.
///
/// ```ignore
/// let cfg = PedalConfig::new()
///     .with_debounce_window_ms(10)
///     .with_outbound_channel(OutboundChannel::Preserve);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PedalConfig {
    /// Audio sample rate in Hz.
    pub sample_rate: f32,
    /// Frames per audio callback.
    pub block_size: usize,
    /// How long a raw switch level must hold before it is accepted.
    pub debounce_window_ms: u32,
    /// Software-PWM period N, in driver ticks.
    pub pwm_period: u8,
    /// Pot smoothing slew time in seconds.
    pub smoothing_slew_seconds: f32,
    pub bypass: BypassPolarity,
    pub led_polarity: OutputPolarity,
    pub outbound_channel: OutboundChannel,
    pub display_interval_ms: u32,
    pub report_interval_ms: u32,
    /// Phase-invert the left output (Rev4 hardware errata).
    pub invert_left_output: bool,
}

impl PedalConfig {
    /// The reference kit: 48 kHz, 48-frame blocks, 8 ms debounce.
    pub const fn new() -> Self {
        PedalConfig {
            sample_rate: AUDIO_SAMPLE_RATE,
            block_size: AUDIO_BLOCK_SIZE,
            debounce_window_ms: DEBOUNCE_WINDOW_MS,
            pwm_period: PWM_PERIOD,
            smoothing_slew_seconds: SMOOTHING_SLEW_SECONDS,
            bypass: BypassPolarity::new(),
            led_polarity: OutputPolarity::ActiveHigh,
            outbound_channel: OutboundChannel::Fixed(0),
            display_interval_ms: DISPLAY_INTERVAL_MS,
            report_interval_ms: REPORT_INTERVAL_MS,
            invert_left_output: true,
        }
    }

    /// Audio clock, which sets the control tick rate.
    pub const fn with_sample_rate(mut self, sample_rate: f32, block_size: usize) -> Self {
        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self
    }

    /// Debounce window for switches and the encoder.
    pub const fn with_debounce_window_ms(mut self, ms: u32) -> Self {
        self.debounce_window_ms = ms;
        self
    }

    /// LED PWM period in control ticks.
    pub const fn with_pwm_period(mut self, period: u8) -> Self {
        self.pwm_period = period;
        self
    }

    /// Pot slew time. NaN, zero or negative disables smoothing.
    pub const fn with_smoothing_slew(mut self, seconds: f32) -> Self {
        self.smoothing_slew_seconds = seconds;
        self
    }

    pub const fn with_bypass(mut self, bypass: BypassPolarity) -> Self {
        self.bypass = bypass;
        self
    }

    pub const fn with_led_polarity(mut self, polarity: OutputPolarity) -> Self {
        self.led_polarity = polarity;
        self
    }

    pub const fn with_outbound_channel(mut self, channel: OutboundChannel) -> Self {
        self.outbound_channel = channel;
        self
    }

    /// Display refresh and report periods, in ms.
    pub const fn with_intervals(mut self, display_ms: u32, report_ms: u32) -> Self {
        self.display_interval_ms = display_ms;
        self.report_interval_ms = report_ms;
        self
    }

    pub const fn with_left_inversion(mut self, invert: bool) -> Self {
        self.invert_left_output = invert;
        self
    }

    /// Audio callbacks per second.
    pub fn callback_rate(&self) -> f32 {
        self.sample_rate / self.block_size.max(1) as f32
    }

    /// Debounce window expressed in callback ticks (at least one).
    pub fn debounce_ticks(&self) -> u32 {
        ticks_for(self.debounce_window_ms, self.callback_rate())
    }

    /// One-pole smoothing coefficient for pots processed once per callback.
    pub fn smoothing_coefficient(&self) -> f32 {
        smoothing_coefficient(self.smoothing_slew_seconds, self.callback_rate())
    }
}

impl Default for PedalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of ticks at `rate` Hz covering `window_ms`, rounded up, minimum 1.
pub fn ticks_for(window_ms: u32, rate: f32) -> u32 {
    let ticks = libm::ceilf(window_ms as f32 * rate / 1000.0);
    if ticks < 1.0 {
        1
    } else {
        ticks as u32
    }
}

/// Smoothing coefficient for a one-pole filter updated at `rate` Hz.
///
/// A slew or rate that is NaN, non-positive or too short to span two ticks
/// yields 1.0 (no smoothing).
pub fn smoothing_coefficient(slew_seconds: f32, rate: f32) -> f32 {
    let denom = slew_seconds * rate * 0.5;
    // NaN fails the comparison and falls through to 1.0.
    if denom > 1.0 {
        1.0 / denom
    } else {
        1.0
    }
}
