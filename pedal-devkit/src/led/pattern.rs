//! Time-driven LED test pattern used by the hardware self-test.
//!
//! LED 1 ramps from dark to full over 1024 ms and restarts. The RGB LED
//! ramps red, then green, then blue, 1023 ms each, then stays dark for the
//! rest of a 4096 ms cycle.

use crate::time::Instant;

/// Brightness of the single-colour ramp at `now`, in `[0, 1]`.
pub fn test_ramp(now: Instant) -> f32 {
    (now.as_millis() & 1023) as f32 / 1023.0
}

/// `[r, g, b]` targets of the colour sweep at `now`.
pub fn test_sweep(now: Instant) -> [f32; 3] {
    let phase = (now.as_millis() & 4095) as f32 / 1023.0;
    let segment = |start: f32| {
        if phase >= start && phase < start + 1.0 {
            phase - start
        } else {
            0.0
        }
    };
    [segment(0.0), segment(1.0), segment(2.0)]
}
