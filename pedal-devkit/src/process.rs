//! Audio stage run at the end of every callback.
//!
//! [`Passthrough`] is the hardware-test default; [`StereoVolume`] shows how a
//! processor reads the control snapshot.

use crate::controls::ControlSnapshot;

/// Per-block audio work run as the last stage of the audio callback.
///
/// Buffers are non-interleaved stereo `f32`. `controls` is the snapshot taken
/// earlier in the same callback. Implementations must not allocate or block.
pub trait AudioProcessor {
    /// Fill `output` from `input`. Frames beyond the shorter buffer are left untouched.
    fn process(&mut self, controls: &ControlSnapshot, input: [&[f32]; 2], output: [&mut [f32]; 2]);
}

/// Copies input to output.
///
/// With `invert_left` set the left channel is negated, compensating the Rev4
/// board's phase-inverted left output stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough {
    invert_left: bool,
}

impl Passthrough {
    pub const fn new(invert_left: bool) -> Self {
        Passthrough { invert_left }
    }
}

impl AudioProcessor for Passthrough {
    fn process(&mut self, _controls: &ControlSnapshot, input: [&[f32]; 2], output: [&mut [f32]; 2]) {
        let [in_l, in_r] = input;
        let [out_l, out_r] = output;
        let left_gain = if self.invert_left { -1.0 } else { 1.0 };
        for (o, &i) in out_l.iter_mut().zip(in_l) {
            *o = i * left_gain;
        }
        for (o, &i) in out_r.iter_mut().zip(in_r) {
            *o = i;
        }
    }
}

/// Scales left by pot 1 and right by pot 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct StereoVolume {
    invert_left: bool,
}

impl StereoVolume {
    pub const fn new(invert_left: bool) -> Self {
        StereoVolume { invert_left }
    }
}

impl AudioProcessor for StereoVolume {
    fn process(&mut self, controls: &ControlSnapshot, input: [&[f32]; 2], output: [&mut [f32]; 2]) {
        let [left, right] = [controls.pots[0], controls.pots[1]];
        let left = if self.invert_left { -left } else { left };
        let [in_l, in_r] = input;
        let [out_l, out_r] = output;
        for (o, &i) in out_l.iter_mut().zip(in_l) {
            *o = i * left;
        }
        for (o, &i) in out_r.iter_mut().zip(in_r) {
            *o = i * right;
        }
    }
}
