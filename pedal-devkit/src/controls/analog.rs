//! Potentiometer smoothing.

use crate::constants::ADC_MAX_CODE;

/// Free-running ADC collaborator: most recent conversion per channel.
pub trait AdcReader {
    /// Latest raw code for `channel`, in `0..=max_code`.
    fn code(&self, channel: usize) -> u16;
}

impl<T: AdcReader + ?Sized> AdcReader for &T {
    fn code(&self, channel: usize) -> u16 {
        (**self).code(channel)
    }
}

/// One-pole smoothed, normalized view of an ADC channel.
///
/// [`process()`](Self::process) must be called exactly once per audio
/// callback: the coefficient is derived from the callback rate, so calling it
/// more or less often changes the effective time constant.
#[derive(Debug, Clone, Copy)]
pub struct AnalogControl {
    channel: usize,
    max_code: u16,
    coefficient: f32,
    raw_code: u16,
    smoothed_code: f32,
    primed: bool,
}

impl AnalogControl {
    /// Bind to `channel` of a 16-bit converter with the given smoothing
    /// coefficient in `(0, 1]` (1.0 disables smoothing).
    pub fn new(channel: usize, coefficient: f32) -> Self {
        Self::with_resolution(channel, ADC_MAX_CODE, coefficient)
    }

    /// As [`new()`](Self::new) for a converter topping out at `max_code`.
    /// A NaN coefficient is treated as 1.0.
    pub fn with_resolution(channel: usize, max_code: u16, coefficient: f32) -> Self {
        let coefficient = if coefficient.is_nan() {
            1.0
        } else {
            coefficient.clamp(f32::MIN_POSITIVE, 1.0)
        };
        AnalogControl {
            channel,
            max_code: max_code.max(1),
            coefficient,
            raw_code: 0,
            smoothed_code: 0.0,
            primed: false,
        }
    }

    /// Pull the latest code from `adc`, filter it and return the value in `[0, 1]`.
    ///
    /// The first call seeds the filter with the current code.
    pub fn process<A: AdcReader + ?Sized>(&mut self, adc: &A) -> f32 {
        let raw = adc.code(self.channel).min(self.max_code);
        self.raw_code = raw;
        let target = raw as f32;
        if self.primed {
            self.smoothed_code += self.coefficient * (target - self.smoothed_code);
        } else {
            self.smoothed_code = target;
            self.primed = true;
        }
        self.value()
    }

    /// Smoothed value from the last `process()` call.
    pub fn value(&self) -> f32 {
        (self.smoothed_code / self.max_code as f32).clamp(0.0, 1.0)
    }

    /// Unfiltered code from the last `process()` call.
    pub fn raw_code(&self) -> u16 {
        self.raw_code
    }

    pub fn channel(&self) -> usize {
        self.channel
    }
}
