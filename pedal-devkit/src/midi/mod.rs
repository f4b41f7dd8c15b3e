//! MIDI event types, transport seam and note passthrough.
//!
//! Byte-level framing is done by the transport: this module only sees
//! decoded [`MidiEvent`]s and emits raw 3-byte [`OutboundMessage`]s.
//!
//! ```text
//!  UART RX ISR ──push──► MidiInbox ──pop──► MidiPassthrough ──► pending ──send──► UART TX
//!                         (SPSC)            (housekeeping)
//! ```

mod passthrough;
pub mod queue;

pub use passthrough::{MidiPassthrough, OutboundChannel};
pub use queue::EventQueue;

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::constants::MIDI_INBOX_SLOTS;
use crate::time::Instant;

/// Decoded message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiMessageType {
    NoteOff,
    NoteOn,
    PolyphonicKeyPressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    SystemCommon,
    SystemRealTime,
    ChannelMode,
    /// Anything the decoder could not classify.
    #[default]
    Unknown,
}

impl MidiMessageType {
    /// Short label for reports, at most 15 characters.
    pub const fn name(self) -> &'static str {
        match self {
            MidiMessageType::NoteOff => "NoteOff",
            MidiMessageType::NoteOn => "NoteOn",
            MidiMessageType::PolyphonicKeyPressure => "PolyKeyPres.",
            MidiMessageType::ControlChange => "CC",
            MidiMessageType::ProgramChange => "Prog. Change",
            MidiMessageType::ChannelPressure => "Chn. Pressure",
            MidiMessageType::PitchBend => "PitchBend",
            MidiMessageType::SystemCommon => "Sys. Common",
            MidiMessageType::SystemRealTime => "Sys. Realtime",
            MidiMessageType::ChannelMode => "Chn. Mode",
            MidiMessageType::Unknown => "Unknown",
        }
    }

    pub const fn is_note(self) -> bool {
        matches!(self, MidiMessageType::NoteOn | MidiMessageType::NoteOff)
    }
}

impl fmt::Display for MidiMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded MIDI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiEvent {
    pub kind: MidiMessageType,
    /// Channel, 0–15.
    pub channel: u8,
    /// Data bytes; for notes `[note, velocity]`.
    pub data: [u8; 2],
    /// When the transport received the event.
    pub timestamp: Instant,
}

impl MidiEvent {
    pub const fn new(kind: MidiMessageType, channel: u8, data: [u8; 2]) -> Self {
        MidiEvent {
            kind,
            channel,
            data,
            timestamp: Instant::ZERO,
        }
    }

    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(MidiMessageType::NoteOn, channel, [note, velocity])
    }

    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(MidiMessageType::NoteOff, channel, [note, velocity])
    }

    pub const fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::new(MidiMessageType::ControlChange, channel, [controller, value])
    }

    pub const fn at(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Raw 3-byte channel message ready for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutboundMessage {
    bytes: [u8; 3],
}

impl OutboundMessage {
    pub const fn new(status: u8, data1: u8, data2: u8) -> Self {
        OutboundMessage {
            bytes: [status, data1, data2],
        }
    }

    pub const fn status(&self) -> u8 {
        self.bytes[0]
    }

    pub const fn note(&self) -> u8 {
        self.bytes[1]
    }

    pub const fn velocity(&self) -> u8 {
        self.bytes[2]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// MIDI transport collaborator: pre-decoded input, raw output.
pub trait MidiTransport {
    type Error;

    fn has_events(&self) -> bool;

    fn pop_event(&mut self) -> Option<MidiEvent>;

    /// Transmit one complete message.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Byte sink for outgoing MIDI (UART transmitter, USB endpoint, ...).
pub trait MidiWriter {
    type Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Interrupt-fed receive queue.
///
/// The decoder pushes from its interrupt through a shared reference; the
/// housekeeping loop drains it. Events arriving while full are dropped and
/// counted.
pub struct MidiInbox<const N: usize> {
    queue: EventQueue<MidiEvent, N>,
    overflows: AtomicU32,
}

impl<const N: usize> MidiInbox<N> {
    pub const fn new() -> Self {
        MidiInbox {
            queue: EventQueue::new(),
            overflows: AtomicU32::new(0),
        }
    }

    /// Producer side. Returns `false` if the event was dropped.
    pub fn push(&self, event: MidiEvent) -> bool {
        if self.queue.push(event).is_ok() {
            true
        } else {
            self.overflows.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    pub fn pop(&self) -> Option<MidiEvent> {
        self.queue.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Events dropped because the inbox was full.
    pub fn overflows(&self) -> u32 {
        self.overflows.load(Ordering::Relaxed)
    }
}

/// Inbox sized for the kit's UART receive path.
pub type DevKitInbox = MidiInbox<MIDI_INBOX_SLOTS>;

impl<const N: usize> Default for MidiInbox<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`MidiTransport`] over a shared inbox and a byte writer.
pub struct MidiPort<'a, W, const N: usize> {
    inbox: &'a MidiInbox<N>,
    writer: W,
}

impl<'a, W: MidiWriter, const N: usize> MidiPort<'a, W, N> {
    pub fn new(inbox: &'a MidiInbox<N>, writer: W) -> Self {
        MidiPort { inbox, writer }
    }

    pub fn inbox(&self) -> &MidiInbox<N> {
        self.inbox
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn release(self) -> W {
        self.writer
    }
}

impl<W: MidiWriter, const N: usize> MidiTransport for MidiPort<'_, W, N> {
    type Error = W::Error;

    fn has_events(&self) -> bool {
        !self.inbox.is_empty()
    }

    fn pop_event(&mut self) -> Option<MidiEvent> {
        self.inbox.pop()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), W::Error> {
        self.writer.write(bytes)
    }
}
