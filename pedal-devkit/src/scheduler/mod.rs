//! The two execution contexts.
//!
//! [`Realtime`] runs inside the audio callback and owns every piece of
//! control state. [`Housekeeping`] runs in the cooperative main loop and only
//! ever sees completed [`ControlSnapshot`]s. [`Pedal`] bundles both for
//! applications that drive them from one place; [`Pedal::split()`] hands them
//! to separate contexts.
//!
//! When the callback and the main loop run at different priorities, publish
//! snapshots through a [`SnapshotChannel`] instead of sharing `Realtime`.

mod housekeeping;

pub use housekeeping::{Housekeeping, PollOutcome};

use crate::config::PedalConfig;
use crate::controls::{ControlSnapshot, ControlSurface};
use crate::diagnostics::{Reporter, StatusDisplay};
use crate::error::StartupStatus;
use crate::midi::{EventQueue, MidiTransport};
use crate::process::AudioProcessor;
use crate::time::{Clock, Instant};

/// Real-time context: controls plus the audio processor.
pub struct Realtime<C, P> {
    controls: C,
    processor: P,
    snapshot: ControlSnapshot,
    callbacks: u32,
}

impl<C: ControlSurface, P: AudioProcessor> Realtime<C, P> {
    /// Idle context: default snapshot, no callbacks run yet.
    pub fn new(controls: C, processor: P) -> Self {
        Realtime {
            controls,
            processor,
            snapshot: ControlSnapshot::default(),
            callbacks: 0,
        }
    }

    /// One audio block.
    ///
    /// Stages run in a fixed order: debounce, LED PWM tick, encoder
    /// accumulate, bypass, audio. The snapshot passed to the processor (and
    /// returned) is taken after the bypass stage.
    pub fn audio_callback(
        &mut self,
        now: Instant,
        input: [&[f32]; 2],
        output: [&mut [f32]; 2],
    ) -> ControlSnapshot {
        self.controls.debounce(now);
        self.controls.update_leds();
        self.controls.update_encoder();
        self.controls.update_bypass();
        self.snapshot = self.controls.snapshot(now);
        self.processor.process(&self.snapshot, input, output);
        self.callbacks = self.callbacks.wrapping_add(1);
        self.snapshot
    }

    /// State at the end of the last callback.
    pub fn snapshot(&self) -> ControlSnapshot {
        self.snapshot
    }

    /// Callbacks run so far, wrapping.
    pub fn callbacks(&self) -> u32 {
        self.callbacks
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }
}

/// Lock-free hand-off of snapshots from the callback to the main loop.
///
/// Holds at most one unread snapshot. Publishing while one is unread keeps
/// the older one, so the reader always gets a complete copy and is at most
/// one poll period behind.
pub struct SnapshotChannel {
    slot: EventQueue<ControlSnapshot, 2>,
}

impl SnapshotChannel {
    pub const fn new() -> Self {
        SnapshotChannel {
            slot: EventQueue::new(),
        }
    }

    /// Writer side, called from the audio callback. Returns `false` when the
    /// previous snapshot has not been read yet.
    pub fn publish(&self, snapshot: ControlSnapshot) -> bool {
        self.slot.push(snapshot).is_ok()
    }

    /// Reader side. `None` if nothing new was published since the last take.
    pub fn take(&self) -> Option<ControlSnapshot> {
        self.slot.pop()
    }
}

impl Default for SnapshotChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Both contexts behind one value.
pub struct Pedal<C, P, M, D, R> {
    realtime: Realtime<C, P>,
    housekeeping: Housekeeping<M, D, R>,
}

impl<C, P, M, D, R> Pedal<C, P, M, D, R>
where
    C: ControlSurface,
    P: AudioProcessor,
    M: MidiTransport,
    D: StatusDisplay,
    R: Reporter,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        controls: C,
        processor: P,
        midi: M,
        display: D,
        reporter: R,
        startup: StartupStatus,
        config: &PedalConfig,
        start: Instant,
    ) -> Self {
        Pedal {
            realtime: Realtime::new(controls, processor),
            housekeeping: Housekeeping::new(midi, display, reporter, startup, config, start),
        }
    }

    pub fn audio_callback(
        &mut self,
        now: Instant,
        input: [&[f32]; 2],
        output: [&mut [f32]; 2],
    ) -> ControlSnapshot {
        self.realtime.audio_callback(now, input, output)
    }

    /// One main-loop iteration against the latest snapshot.
    pub fn poll(&mut self, now: Instant) -> PollOutcome {
        let snapshot = self.realtime.snapshot();
        self.housekeeping.poll(now, &snapshot)
    }

    /// [`poll()`](Self::poll) at the clock's current time.
    pub fn poll_clock<K: Clock + ?Sized>(&mut self, clock: &K) -> PollOutcome {
        self.poll(clock.now())
    }

    pub fn realtime(&self) -> &Realtime<C, P> {
        &self.realtime
    }

    pub fn housekeeping(&self) -> &Housekeeping<M, D, R> {
        &self.housekeeping
    }

    /// Borrow the two contexts separately.
    pub fn split(&mut self) -> (&mut Realtime<C, P>, &mut Housekeeping<M, D, R>) {
        (&mut self.realtime, &mut self.housekeeping)
    }
}
