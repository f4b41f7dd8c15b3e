//! # pedal-devkit
//!
//! A `no_std`, zero-allocation control core for an audio effects pedal
//! development kit. It turns noisy switch, encoder and pot signals into
//! stable state, drives true-bypass relays with a matching indicator LED,
//! runs software-PWM LEDs and forwards MIDI notes, all clocked by the audio
//! callback plus a cooperative housekeeping loop.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Time | [`time`] | Wrapping millisecond [`time::Instant`], interval gates |
//! | Inputs | [`controls`] | Debounce, 3-way toggle, encoder, pot smoothing |
//! | Outputs | [`led`] / [`bypass`] | Software PWM, relay bypass state machine |
//! | MIDI | [`midi`] | SPSC inbox, note passthrough, transport trait |
//! | Audio | [`process`] | `AudioProcessor` trait, passthrough and volume |
//! | Status | [`diagnostics`] / [`error`] | Report snapshot, startup flags |
//! | Contexts | [`scheduler`] | Real-time callback and housekeeping loop |
//!
//! ## Quick start
//!
//! ```ignore
//! use pedal_devkit::config::PedalConfig;
//! use pedal_devkit::controls::DevKitControls;
//! use pedal_devkit::process::Passthrough;
//! use pedal_devkit::scheduler::Pedal;
//!
//! let cfg = PedalConfig::new();
//! let mut pedal = Pedal::new(
//!     DevKitControls::new(pins, adc, &cfg),
//!     Passthrough::new(cfg.invert_left_output),
//!     midi_port,
//!     oled,
//!     serial_log,
//!     startup,
//!     &cfg,
//!     clock.now(),
//! );
//!
//! // Audio interrupt, once per block:
//! pedal.audio_callback(clock.now(), [in_l, in_r], [out_l, out_r]);
//!
//! // Main loop:
//! loop {
//!     pedal.poll(clock.now());
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | Log output and `defmt::Format` on public types |
//!
//! ## Timing
//!
//! - **Block size:** 48 frames ([`constants::AUDIO_BLOCK_SIZE`])
//! - **Sample rate:** 48 kHz ([`constants::AUDIO_SAMPLE_RATE`])
//! - **Control tick:** one per audio block, 1 kHz by default
//! - **Debounce window:** 8 ms ([`constants::DEBOUNCE_WINDOW_MS`])

#![no_std]

mod fmt;

pub mod constants;
pub mod config;
pub mod error;
pub mod time;
pub mod controls;
pub mod led;
pub mod bypass;
pub mod midi;
pub mod process;
pub mod diagnostics;
pub mod scheduler;
