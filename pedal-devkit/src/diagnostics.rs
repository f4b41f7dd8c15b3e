//! Periodic status snapshot for the serial log and the OLED.
//!
//! [`Diagnostics`] is assembled by housekeeping from the latest
//! [`ControlSnapshot`] and MIDI state. Its `Display` impl renders the report
//! block the hardware test prints every 200 ms:
//!
//! ```text
//! --- Controls ---
//! Pot1:	    0	Pot2:	    0	Pot3:	    0	Expression:	    0
//! 3-way Toggle:	Center
//! 2-way Toggle:	Left
//! Footswitch:	Off	Momentary:	Off
//! Encoder:	0
//! Bypass:	Bypassed
//! SD Card Test:	Fail
//! --- MIDI ---
//! time:	0	type: Unknown	Channel:  0	Data MSB: 0	Data LSB: 0
//! ```

use core::fmt;

use crate::controls::ControlSnapshot;
use crate::error::StartupStatus;
use crate::midi::MidiEvent;
use crate::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    pub now: Instant,
    pub controls: ControlSnapshot,
    pub startup: StartupStatus,
    /// Most recent MIDI event of any type.
    pub last_midi: Option<MidiEvent>,
    pub midi_received: u32,
    pub midi_forwarded: u32,
    /// Outbound notes lost to a full queue.
    pub midi_dropped: u32,
}

fn on_off(on: bool) -> &'static str {
    if on {
        "On"
    } else {
        "Off"
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.controls;
        writeln!(f, "--- Controls ---")?;
        writeln!(
            f,
            "Pot1:\t{:5}\tPot2:\t{:5}\tPot3:\t{:5}\tExpression:\t{:5}",
            c.pot_codes[0], c.pot_codes[1], c.pot_codes[2], c.pot_codes[3]
        )?;
        writeln!(f, "3-way Toggle:\t{}", c.toggle3.name())?;
        writeln!(f, "2-way Toggle:\t{}", if c.toggle { "Right" } else { "Left" })?;
        writeln!(
            f,
            "Footswitch:\t{}\tMomentary:\t{}",
            on_off(c.footswitch),
            on_off(c.pushbutton)
        )?;
        writeln!(f, "Encoder:\t{}", c.encoder)?;
        writeln!(f, "Bypass:\t{}", c.bypass.name())?;
        writeln!(
            f,
            "SD Card Test:\t{}",
            if self.startup.storage_ok { "Pass" } else { "Fail" }
        )?;
        writeln!(f, "--- MIDI ---")?;
        let event = self.last_midi.unwrap_or_default();
        write!(
            f,
            "time:\t{}\ttype: {}\tChannel:  {}\tData MSB: {}\tData LSB: {}",
            self.now.as_millis(),
            event.kind,
            event.channel,
            event.data[0],
            event.data[1]
        )?;
        if self.midi_dropped > 0 {
            write!(f, "\tDropped: {}", self.midi_dropped)?;
        }
        Ok(())
    }
}

/// Renders diagnostics on the panel display. Called from housekeeping at the
/// display refresh interval.
pub trait StatusDisplay {
    fn refresh(&mut self, diagnostics: &Diagnostics);
}

/// Sends diagnostics to the serial log. Called at the report interval.
pub trait Reporter {
    fn report(&mut self, diagnostics: &Diagnostics);
}

/// Stand-in for a board without a display.
impl StatusDisplay for () {
    fn refresh(&mut self, _diagnostics: &Diagnostics) {}
}

impl Reporter for () {
    fn report(&mut self, _diagnostics: &Diagnostics) {}
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::bypass::BypassState;
    use crate::controls::Position;
    use crate::midi::MidiMessageType;
    use std::string::ToString;

    #[test]
    fn default_report() {
        let text = Diagnostics::default().to_string();
        let lines: std::vec::Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- Controls ---");
        assert_eq!(
            lines[1],
            "Pot1:\t    0\tPot2:\t    0\tPot3:\t    0\tExpression:\t    0"
        );
        assert_eq!(lines[2], "3-way Toggle:\tCenter");
        assert_eq!(lines[3], "2-way Toggle:\tLeft");
        assert_eq!(lines[4], "Footswitch:\tOff\tMomentary:\tOff");
        assert_eq!(lines[5], "Encoder:\t0");
        assert_eq!(lines[6], "Bypass:\tBypassed");
        assert_eq!(lines[7], "SD Card Test:\tFail");
        assert_eq!(lines[8], "--- MIDI ---");
        assert_eq!(
            lines[9],
            "time:\t0\ttype: Unknown\tChannel:  0\tData MSB: 0\tData LSB: 0"
        );
    }

    #[test]
    fn populated_report() {
        let diag = Diagnostics {
            now: Instant::from_millis(1234),
            controls: ControlSnapshot {
                pot_codes: [65535, 12, 300, 4000],
                toggle: true,
                toggle3: Position::Right,
                footswitch: true,
                encoder: -3,
                bypass: BypassState::Active,
                ..ControlSnapshot::default()
            },
            startup: StartupStatus {
                storage_ok: true,
                display_ok: true,
            },
            last_midi: Some(MidiEvent::new(MidiMessageType::ControlChange, 2, [7, 99])),
            midi_dropped: 1,
            ..Diagnostics::default()
        };
        let text = diag.to_string();
        assert!(text.contains("Pot1:\t65535\tPot2:\t   12\tPot3:\t  300\tExpression:\t 4000"));
        assert!(text.contains("3-way Toggle:\tRight\n"));
        assert!(text.contains("2-way Toggle:\tRight\n"));
        assert!(text.contains("Footswitch:\tOn\tMomentary:\tOff\n"));
        assert!(text.contains("Encoder:\t-3\n"));
        assert!(text.contains("Bypass:\tActive\n"));
        assert!(text.contains("SD Card Test:\tPass\n"));
        assert!(text.ends_with(
            "time:\t1234\ttype: CC\tChannel:  2\tData MSB: 7\tData LSB: 99\tDropped: 1"
        ));
    }
}
