//! Fixed-capacity lock-free single-producer single-consumer queue.
//!
//! Carries decoded MIDI events from the UART receive interrupt to the
//! housekeeping loop, and outbound messages waiting for the transmitter.
//!
//! # Safety contract
//!
//! - At most one context calls [`push()`](EventQueue::push) at a time.
//! - At most one context calls [`pop()`](EventQueue::pop) or
//!   [`peek()`](EventQueue::peek) at a time.
//!
//! The two sides may preempt each other freely.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Ring of `N` slots holding at most `N - 1` items; one slot stays empty so
/// that `write == read` unambiguously means "empty".
pub struct EventQueue<T, const N: usize> {
    slots: [UnsafeCell<MaybeUninit<T>>; N],
    /// Next slot the producer fills. Written only by the producer.
    write: AtomicUsize,
    /// Next slot the consumer drains. Written only by the consumer.
    read: AtomicUsize,
}

// SAFETY: each slot is touched by exactly one side at a time: the producer
// owns `[write, read - 1)`, the consumer owns `[read, write)`. Publishing an
// index with Release after the slot access and loading the other side's index
// with Acquire orders the slot accesses across contexts.
unsafe impl<T: Send, const N: usize> Sync for EventQueue<T, N> {}
unsafe impl<T: Send, const N: usize> Send for EventQueue<T, N> {}

impl<T, const N: usize> EventQueue<T, N> {
    /// Create an empty queue. `N` must be at least 2.
    pub const fn new() -> Self {
        assert!(N >= 2, "EventQueue needs at least 2 slots");
        EventQueue {
            // SAFETY: an array of MaybeUninit needs no initialization.
            slots: unsafe { MaybeUninit::<[UnsafeCell<MaybeUninit<T>>; N]>::uninit().assume_init() },
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
        }
    }

    #[inline]
    const fn next(index: usize) -> usize {
        if index + 1 == N {
            0
        } else {
            index + 1
        }
    }

    /// Producer side. Hands the item back if the queue is full.
    pub fn push(&self, item: T) -> Result<(), T> {
        let write = self.write.load(Ordering::Relaxed);
        let next = Self::next(write);
        if next == self.read.load(Ordering::Acquire) {
            return Err(item);
        }
        // SAFETY: `write` is outside the consumer's range until published.
        unsafe { (*self.slots[write].get()).write(item) };
        self.write.store(next, Ordering::Release);
        Ok(())
    }

    /// Consumer side. `None` when empty.
    pub fn pop(&self) -> Option<T> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: `read != write`, so the producer published this slot.
        let item = unsafe { (*self.slots[read].get()).assume_init_read() };
        self.read.store(Self::next(read), Ordering::Release);
        Some(item)
    }

    /// Consumer side. Copy of the oldest item without removing it.
    pub fn peek(&self) -> Option<T>
    where
        T: Copy,
    {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: as in `pop`; the slot stays owned by the consumer.
        Some(unsafe { (*self.slots[read].get()).assume_init_read() })
    }

    pub fn is_empty(&self) -> bool {
        self.read.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        Self::next(self.write.load(Ordering::Acquire)) == self.read.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        if write >= read {
            write - read
        } else {
            N - read + write
        }
    }

    /// Usable capacity, `N - 1`.
    pub const fn capacity(&self) -> usize {
        N - 1
    }
}

impl<T, const N: usize> Default for EventQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for EventQueue<T, N> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}
