//! crossbeam-backed event channel.
//!
//! The scan worker and the relocator hold [`EventSender`] clones; the
//! presentation layer keeps the single [`EventReceiver`] and drains it on
//! its own schedule.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{Event, RelocateEvent, ScanEvent};

/// Sends events from the core library.
///
/// Cheap to clone and safe to move into the scan worker.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is dropped, the event is silently discarded so
    /// progress reporting stays optional.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }

    /// Report scan progress
    pub fn scan(&self, event: ScanEvent) {
        self.send(Event::Scan(event));
    }

    /// Report copy/move progress
    pub fn relocate(&self, event: RelocateEvent) {
        self.send(Event::Relocate(event));
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Everything queued right now, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }

    /// Blocking iterator that ends once every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for event channels.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// Sender whose receiver is already gone; every event is dropped.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}
