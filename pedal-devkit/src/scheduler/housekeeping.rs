//! The cooperative main-loop context.

use crate::bypass::BypassState;
use crate::config::PedalConfig;
use crate::controls::ControlSnapshot;
use crate::diagnostics::{Diagnostics, Reporter, StatusDisplay};
use crate::error::StartupStatus;
use crate::midi::{MidiPassthrough, MidiTransport};
use crate::time::{Instant, Interval};

/// What one [`Housekeeping::poll()`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollOutcome {
    /// Messages handed to the MIDI transport.
    pub midi_sent: usize,
    /// The display was refreshed.
    pub displayed: bool,
    /// A report was emitted.
    pub reported: bool,
}

/// Background work: MIDI passthrough, display refresh and periodic reports.
///
/// Never touches control state directly; everything it shows comes from the
/// snapshot passed to [`poll()`](Self::poll).
pub struct Housekeeping<M, D, R> {
    midi: M,
    passthrough: MidiPassthrough,
    display: D,
    reporter: R,
    display_gate: Interval,
    report_gate: Interval,
    startup: StartupStatus,
    last_bypass: Option<BypassState>,
}

impl<M, D, R> Housekeeping<M, D, R>
where
    M: MidiTransport,
    D: StatusDisplay,
    R: Reporter,
{
    /// Both interval gates start counting from `start`.
    pub fn new(
        midi: M,
        display: D,
        reporter: R,
        startup: StartupStatus,
        config: &PedalConfig,
        start: Instant,
    ) -> Self {
        Housekeeping {
            midi,
            passthrough: MidiPassthrough::new(config.outbound_channel),
            display,
            reporter,
            display_gate: Interval::new(config.display_interval_ms, start),
            report_gate: Interval::new(config.report_interval_ms, start),
            startup,
            last_bypass: None,
        }
    }

    /// One cooperative iteration.
    ///
    /// MIDI is drained on every call; the display and the report only when
    /// their intervals have elapsed.
    pub fn poll(&mut self, now: Instant, controls: &ControlSnapshot) -> PollOutcome {
        if self.last_bypass != Some(controls.bypass) {
            if self.last_bypass.is_some() {
                info!("bypass: {}", controls.bypass.name());
            }
            self.last_bypass = Some(controls.bypass);
        }

        let midi_sent = self.passthrough.drain(&mut self.midi);

        let mut outcome = PollOutcome {
            midi_sent,
            ..PollOutcome::default()
        };
        let display_due = self.display_gate.ready(now);
        let report_due = self.report_gate.ready(now);
        if display_due || report_due {
            let diagnostics = self.diagnostics(now, controls);
            if display_due {
                self.display.refresh(&diagnostics);
                outcome.displayed = true;
            }
            if report_due {
                self.reporter.report(&diagnostics);
                outcome.reported = true;
            }
        }
        outcome
    }

    /// Assemble the status view for `controls` at `now`.
    pub fn diagnostics(&self, now: Instant, controls: &ControlSnapshot) -> Diagnostics {
        Diagnostics {
            now,
            controls: *controls,
            startup: self.startup,
            last_midi: self.passthrough.last_event(),
            midi_received: self.passthrough.received(),
            midi_forwarded: self.passthrough.forwarded(),
            midi_dropped: self.passthrough.dropped(),
        }
    }

    pub fn passthrough(&self) -> &MidiPassthrough {
        &self.passthrough
    }

    /// Peripheral results recorded during bring-up.
    pub fn startup(&self) -> StartupStatus {
        self.startup
    }

    pub fn midi(&self) -> &M {
        &self.midi
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Hand back the collaborators.
    pub fn release(self) -> (M, D, R) {
        (self.midi, self.display, self.reporter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::tests::RecordingWriter;
    use crate::midi::{MidiEvent, MidiInbox, MidiPort};

    #[derive(Default)]
    struct Counter {
        calls: u32,
        last: Option<Diagnostics>,
    }

    impl StatusDisplay for Counter {
        fn refresh(&mut self, diagnostics: &Diagnostics) {
            self.calls += 1;
            self.last = Some(*diagnostics);
        }
    }

    impl Reporter for Counter {
        fn report(&mut self, diagnostics: &Diagnostics) {
            self.calls += 1;
            self.last = Some(*diagnostics);
        }
    }

    fn t(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn intervals_gate_display_and_report() {
        let inbox: MidiInbox<4> = MidiInbox::new();
        let port = MidiPort::new(&inbox, RecordingWriter::new());
        let cfg = PedalConfig::new();
        let mut hk = Housekeeping::new(
            port,
            Counter::default(),
            Counter::default(),
            StartupStatus::new(),
            &cfg,
            t(0),
        );
        let snap = ControlSnapshot::default();

        let mut displays = 0;
        let mut reports = 0;
        for ms in 0..=402 {
            let out = hk.poll(t(ms), &snap);
            displays += out.displayed as u32;
            reports += out.reported as u32;
        }
        // Fires at 17, 34, ... (every 17 ms) and 201, 402
        assert_eq!(displays, 402 / 17);
        assert_eq!(reports, 2);
        assert_eq!(hk.display().calls, displays);
        assert_eq!(hk.reporter().last.map(|d| d.now), Some(t(402)));
    }

    #[test]
    fn midi_drained_every_poll() {
        let inbox: MidiInbox<4> = MidiInbox::new();
        let port = MidiPort::new(&inbox, RecordingWriter::new());
        let cfg = PedalConfig::new();
        let mut hk = Housekeeping::new(port, (), (), StartupStatus::new(), &cfg, t(0));
        let snap = ControlSnapshot::default();

        inbox.push(MidiEvent::note_on(1, 60, 100));
        assert_eq!(hk.poll(t(1), &snap).midi_sent, 1);
        inbox.push(MidiEvent::control_change(1, 7, 3));
        assert_eq!(hk.poll(t(2), &snap).midi_sent, 0);

        let diag = hk.diagnostics(t(2), &snap);
        assert_eq!(diag.last_midi, Some(MidiEvent::control_change(1, 7, 3)));
        assert_eq!(diag.midi_received, 2);
        assert_eq!(diag.midi_forwarded, 1);

        let (port, (), ()) = hk.release();
        assert_eq!(port.release().sent[0], [0x90, 60, 100]);
    }

    #[test]
    fn diagnostics_carry_startup_flags() {
        let inbox: MidiInbox<4> = MidiInbox::new();
        let port = MidiPort::new(&inbox, RecordingWriter::new());
        let mut startup = StartupStatus::new();
        startup.record(crate::error::Peripheral::Storage, true);
        let hk = Housekeeping::new(port, (), (), startup, &PedalConfig::new(), t(0));
        assert!(hk.diagnostics(t(0), &ControlSnapshot::default()).startup.storage_ok);
    }
}
