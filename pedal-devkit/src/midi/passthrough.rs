//! Note passthrough: forwards incoming notes to the MIDI output.

use super::{EventQueue, MidiEvent, MidiMessageType, MidiTransport, OutboundMessage};
use crate::constants::{MIDI_OUTBOX_SLOTS, NOTE_ON_STATUS};

/// Channel nibble written into forwarded note messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutboundChannel {
    /// Always send on this channel (0–15).
    Fixed(u8),
    /// Keep the incoming event's channel.
    Preserve,
}

impl Default for OutboundChannel {
    fn default() -> Self {
        OutboundChannel::Fixed(0)
    }
}

/// Records the last event and translates notes into outbound messages.
///
/// Every NoteOn and NoteOff becomes exactly one note-on-status message with
/// the original note number. NoteOff is sent as velocity 0, so receivers see
/// the running-status style release. All other event types are only recorded.
pub struct MidiPassthrough {
    outbound_channel: OutboundChannel,
    last_event: Option<MidiEvent>,
    pending: EventQueue<OutboundMessage, MIDI_OUTBOX_SLOTS>,
    received: u32,
    forwarded: u32,
    dropped: u32,
}

impl MidiPassthrough {
    pub const fn new(outbound_channel: OutboundChannel) -> Self {
        MidiPassthrough {
            outbound_channel,
            last_event: None,
            pending: EventQueue::new(),
            received: 0,
            forwarded: 0,
            dropped: 0,
        }
    }

    /// Record `event` and return the message to forward, if any.
    pub fn on_event(&mut self, event: MidiEvent) -> Option<OutboundMessage> {
        self.last_event = Some(event);
        self.received = self.received.wrapping_add(1);

        let velocity = match event.kind {
            MidiMessageType::NoteOn => event.data[1],
            MidiMessageType::NoteOff => 0,
            _ => return None,
        };
        let channel = match self.outbound_channel {
            OutboundChannel::Fixed(ch) => ch,
            OutboundChannel::Preserve => event.channel,
        };
        Some(OutboundMessage::new(
            NOTE_ON_STATUS | (channel & 0x0F),
            event.data[0],
            velocity,
        ))
    }

    /// Drain every queued event from `transport`, then send what is pending.
    ///
    /// Messages the transport refuses stay queued, in order, for the next
    /// call. Returns the number of messages sent.
    pub fn drain<T: MidiTransport>(&mut self, transport: &mut T) -> usize {
        let mut sent = self.flush(transport);
        while transport.has_events() {
            let Some(event) = transport.pop_event() else {
                break;
            };
            if let Some(message) = self.on_event(event) {
                if self.pending.push(message).is_err() {
                    self.dropped = self.dropped.wrapping_add(1);
                    warn!("midi: outbound queue full, note {} dropped", message.note());
                }
            }
            sent += self.flush(transport);
        }
        sent
    }

    /// Send pending messages until the queue empties or the transport fails.
    fn flush<T: MidiTransport>(&mut self, transport: &mut T) -> usize {
        let mut sent = 0;
        while let Some(message) = self.pending.peek() {
            if transport.send(message.as_bytes()).is_err() {
                debug!("midi: send failed, {} pending", self.pending.len());
                break;
            }
            self.pending.pop();
            self.forwarded = self.forwarded.wrapping_add(1);
            sent += 1;
        }
        sent
    }

    /// Most recent event of any type.
    pub fn last_event(&self) -> Option<MidiEvent> {
        self.last_event
    }

    /// Messages waiting for the transport.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn received(&self) -> u32 {
        self.received
    }

    pub fn forwarded(&self) -> u32 {
        self.forwarded
    }

    /// Messages lost because the outbound queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for MidiPassthrough {
    fn default() -> Self {
        Self::new(OutboundChannel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::tests::RecordingWriter;
    use crate::midi::{MidiInbox, MidiPort};

    #[test]
    fn note_on_forwards_velocity() {
        let mut thru = MidiPassthrough::default();
        let out = thru.on_event(MidiEvent::note_on(1, 60, 100));
        assert_eq!(out, Some(OutboundMessage::new(0x90, 60, 100)));
        assert_eq!(out.unwrap().as_bytes(), &[0x90, 60, 100]);
    }

    #[test]
    fn note_off_forwards_zero_velocity() {
        let mut thru = MidiPassthrough::default();
        let out = thru.on_event(MidiEvent::note_off(1, 60, 64));
        assert_eq!(out, Some(OutboundMessage::new(0x90, 60, 0)));
    }

    #[test]
    fn control_change_is_recorded_only() {
        let mut thru = MidiPassthrough::default();
        let cc = MidiEvent::control_change(3, 7, 127);
        assert_eq!(thru.on_event(cc), None);
        assert_eq!(thru.last_event(), Some(cc));
    }

    #[test]
    fn unknown_event_is_recorded_only() {
        let mut thru = MidiPassthrough::default();
        let junk = MidiEvent::new(MidiMessageType::Unknown, 200, [255, 255]);
        assert_eq!(thru.on_event(junk), None);
        assert_eq!(thru.last_event(), Some(junk));
        assert_eq!(thru.received(), 1);
    }

    #[test]
    fn preserve_channel_policy() {
        let mut thru = MidiPassthrough::new(OutboundChannel::Preserve);
        let out = thru.on_event(MidiEvent::note_on(5, 64, 10)).unwrap();
        assert_eq!(out.status(), 0x95);

        let mut fixed = MidiPassthrough::new(OutboundChannel::Fixed(9));
        let out = fixed.on_event(MidiEvent::note_off(5, 64, 10)).unwrap();
        assert_eq!(out.status(), 0x99);
        assert_eq!(out.velocity(), 0);
    }

    #[test]
    fn drain_forwards_notes_in_order() {
        let inbox: MidiInbox<8> = MidiInbox::new();
        inbox.push(MidiEvent::note_on(0, 60, 100));
        inbox.push(MidiEvent::control_change(0, 1, 2));
        inbox.push(MidiEvent::note_off(0, 60, 50));
        let mut port = MidiPort::new(&inbox, RecordingWriter::new());
        let mut thru = MidiPassthrough::default();

        assert_eq!(thru.drain(&mut port), 2);
        let writer = port.release();
        assert_eq!(writer.count, 2);
        assert_eq!(writer.sent[0], [0x90, 60, 100]);
        assert_eq!(writer.sent[1], [0x90, 60, 0]);
        assert_eq!(thru.last_event().map(|e| e.kind), Some(MidiMessageType::NoteOff));
        assert_eq!(thru.forwarded(), 2);
    }

    #[test]
    fn failed_sends_stay_pending() {
        let inbox: MidiInbox<8> = MidiInbox::new();
        let mut writer = RecordingWriter::new();
        writer.fail = true;
        let mut port = MidiPort::new(&inbox, writer);
        let mut thru = MidiPassthrough::default();

        inbox.push(MidiEvent::note_on(0, 60, 1));
        inbox.push(MidiEvent::note_on(0, 61, 2));
        assert_eq!(thru.drain(&mut port), 0);
        assert_eq!(thru.pending(), 2);

        let mut writer = port.release();
        writer.fail = false;
        let mut port = MidiPort::new(&inbox, writer);
        assert_eq!(thru.drain(&mut port), 2);
        assert_eq!(thru.pending(), 0);
        let writer = port.release();
        assert_eq!(writer.sent[0][1], 60);
        assert_eq!(writer.sent[1][1], 61);
    }

    #[test]
    fn full_outbound_queue_drops_and_counts() {
        let inbox: MidiInbox<40> = MidiInbox::new();
        let mut writer = RecordingWriter::new();
        writer.fail = true;
        let mut port = MidiPort::new(&inbox, writer);
        let mut thru = MidiPassthrough::default();

        let capacity = MIDI_OUTBOX_SLOTS - 1;
        for note in 0..(capacity as u8 + 3) {
            inbox.push(MidiEvent::note_on(0, note, 1));
        }
        thru.drain(&mut port);
        assert_eq!(thru.pending(), capacity);
        assert_eq!(thru.dropped(), 3);
    }
}
