/// Number of frames per audio block handed to the audio callback.
pub const AUDIO_BLOCK_SIZE: usize = 48;

/// Audio sample rate in Hz.
pub const AUDIO_SAMPLE_RATE: f32 = 48_000.0;

/// Largest code the 16-bit ADC can report.
pub const ADC_MAX_CODE: u16 = u16::MAX;

/// Default switch debounce window in milliseconds.
pub const DEBOUNCE_WINDOW_MS: u32 = 8;

/// Default software-PWM period, in `update()` calls.
pub const PWM_PERIOD: u8 = 8;

/// Default pot smoothing slew time in seconds.
pub const SMOOTHING_SLEW_SECONDS: f32 = 0.02;

/// Minimum interval between display refreshes, in milliseconds.
pub const DISPLAY_INTERVAL_MS: u32 = 16;

/// Minimum interval between diagnostic reports, in milliseconds.
pub const REPORT_INTERVAL_MS: u32 = 200;

/// Slots in the inbound MIDI event queue (usable capacity is one less).
pub const MIDI_INBOX_SLOTS: usize = 33;

/// Slots in the outbound MIDI message queue (usable capacity is one less).
pub const MIDI_OUTBOX_SLOTS: usize = 17;

/// Status byte used for every forwarded note message.
pub const NOTE_ON_STATUS: u8 = 0x90;
