//! Startup errors and status flags.
//!
//! Only initialization can fail. Once the audio callback is running every
//! operation is infallible; pin errors are absorbed at the component that
//! sees them.

use core::fmt;

/// Peripherals checked during startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    Audio,
    Adc,
    Gpio,
    Midi,
    Display,
    Storage,
}

impl Peripheral {
    pub const fn name(self) -> &'static str {
        match self {
            Peripheral::Audio => "audio",
            Peripheral::Adc => "adc",
            Peripheral::Gpio => "gpio",
            Peripheral::Midi => "midi",
            Peripheral::Display => "display",
            Peripheral::Storage => "storage",
        }
    }
}

/// Fatal startup failure. Raised before the real-time context starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// A mandatory peripheral failed to initialize.
    Peripheral(Peripheral),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Peripheral(p) => write!(f, "{} failed to initialize", p.name()),
        }
    }
}

/// Non-fatal results collected at startup and surfaced through diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartupStatus {
    /// Storage write/read-back verification passed.
    pub storage_ok: bool,
    /// Display accepted its first frame.
    pub display_ok: bool,
}

impl StartupStatus {
    pub const fn new() -> Self {
        StartupStatus {
            storage_ok: false,
            display_ok: false,
        }
    }

    /// Turn the outcome of a mandatory peripheral's bring-up into a result.
    pub fn require(peripheral: Peripheral, ok: bool) -> Result<(), InitError> {
        if ok {
            Ok(())
        } else {
            error!("startup: {} failed", peripheral.name());
            Err(InitError::Peripheral(peripheral))
        }
    }

    /// Record an optional peripheral's outcome.
    pub fn record(&mut self, peripheral: Peripheral, ok: bool) {
        match peripheral {
            Peripheral::Storage => self.storage_ok = ok,
            Peripheral::Display => self.display_ok = ok,
            _ => {}
        }
        if !ok {
            warn!("startup: {} unavailable", peripheral.name());
        }
    }
}
