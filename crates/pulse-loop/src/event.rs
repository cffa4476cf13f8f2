//! Scheduled events.

use std::cell::{Cell, RefCell};

use pulse_types::Fault;

/// The callable a scheduled event invokes.
///
/// The handler receives the event itself, so it can cancel or reschedule
/// its own occurrence from inside the invocation.
pub type EventHandler = Box<dyn FnMut(&Event) -> Result<(), Fault>>;

/// A scheduled, possibly recurring invocation of a handler.
///
/// Events are owned by the loop's timer map; schedule calls hand out weak
/// [`EventListener`](crate::EventListener)s. `due_time` is mutable through
/// [`reschedule`](Event::reschedule); `cancelled` is a one-way flag.
pub struct Event {
    handler: RefCell<EventHandler>,
    recurring: bool,
    interval: u64,
    due_time: Cell<u64>,
    cancelled: Cell<bool>,
}

impl Event {
    pub(crate) fn new(handler: EventHandler, recurring: bool, interval: u64, due_time: u64) -> Self {
        Self {
            handler: RefCell::new(handler),
            recurring,
            interval,
            due_time: Cell::new(due_time),
            cancelled: Cell::new(false),
        }
    }

    /// Marks the event cancelled.
    ///
    /// Idempotent and irreversible: the next processing step that would
    /// have fired the event drops it instead. A cancelled recurring event
    /// is not reinserted.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Returns `true` once the event has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Moves the event's due time to `time_point`.
    ///
    /// Takes effect even while the event sits in the current tick's local
    /// queue: the loop relocates it instead of firing.
    pub fn reschedule(&self, time_point: u64) {
        self.due_time.set(time_point);
    }

    /// The counter slot the event is due at.
    #[must_use]
    pub fn due_time(&self) -> u64 {
        self.due_time.get()
    }

    /// Whether the event reinserts itself after firing.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.recurring
    }

    /// The reinsertion interval of a recurring event.
    #[must_use]
    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub(crate) fn fire(&self) -> Result<(), Fault> {
        let mut handler = self.handler.borrow_mut();
        (*handler)(self)
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("due_time", &self.due_time.get())
            .field("recurring", &self.recurring)
            .field("interval", &self.interval)
            .field("cancelled", &self.cancelled.get())
            .finish_non_exhaustive()
    }
}
