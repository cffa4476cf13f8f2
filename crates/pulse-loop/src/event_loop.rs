//! The loop core: timer map, scheduling, processing.

use std::cell::Cell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use parking_lot::lock_api::{Mutex, RawMutex};
use pulse_types::Fault;

use crate::error::LoopError;
use crate::event::{Event, EventHandler};
use crate::listener::EventListener;
use crate::policy::SchedulePolicy;

type EventQueue = VecDeque<Rc<Event>>;
type TimerMap = BTreeMap<u64, EventQueue>;

/// A time-indexed scheduler driven by an external counter.
///
/// The loop is constructed behind an [`Rc`] so that handlers (and the
/// debounce/throttle adapters) can hold a weak self-handle and schedule
/// re-entrantly. The lock type `R` guards the timer map alone; it is held
/// only across map mutations, never across handler invocations — which is
/// what makes scheduling from inside a firing handler safe.
///
/// See the crate docs for the scheduling table and execution model.
pub struct EventLoop<R: RawMutex = parking_lot::RawMutex> {
    timers: Mutex<R, TimerMap>,
    counter: Cell<u64>,
    this: Weak<Self>,
}

impl EventLoop {
    /// Creates a loop guarded by the default [`parking_lot::RawMutex`].
    #[must_use]
    pub fn new() -> Rc<Self> {
        Self::with_lock()
    }
}

impl<R: RawMutex> EventLoop<R> {
    /// Creates a loop over a caller-chosen lock primitive.
    ///
    /// Use [`NullLock`](crate::NullLock) when the host has nothing to
    /// synchronize.
    #[must_use]
    pub fn with_lock() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            timers: Mutex::new(TimerMap::new()),
            counter: Cell::new(0),
            this: this.clone(),
        })
    }

    pub(crate) fn weak(&self) -> Weak<Self> {
        self.this.clone()
    }

    // ── Scheduling ──────────────────────────────────────────

    /// Schedules `handler` to fire once on the next tick.
    pub fn schedule_immediate<F>(&self, handler: F) -> EventListener
    where
        F: FnMut(&Event) -> Result<(), Fault> + 'static,
    {
        self.schedule_with_policy(0, SchedulePolicy::Immediate, handler)
    }

    /// Schedules `handler` to fire once, `delay` units from now.
    pub fn schedule<F>(&self, delay: u64, handler: F) -> EventListener
    where
        F: FnMut(&Event) -> Result<(), Fault> + 'static,
    {
        self.schedule_with_policy(delay, SchedulePolicy::Delayed, handler)
    }

    /// Schedules `handler` to fire every `delay` units, starting `delay`
    /// units from now.
    pub fn schedule_recurring<F>(&self, delay: u64, handler: F) -> EventListener
    where
        F: FnMut(&Event) -> Result<(), Fault> + 'static,
    {
        self.schedule_with_policy(delay, SchedulePolicy::RecurringDelayed, handler)
    }

    /// Schedules `handler` to fire on every tick.
    pub fn always<F>(&self, handler: F) -> EventListener
    where
        F: FnMut(&Event) -> Result<(), Fault> + 'static,
    {
        self.schedule_with_policy(0, SchedulePolicy::Always, handler)
    }

    /// Inserts an event according to `policy` and returns its listener.
    ///
    /// The returned [`EventListener`] can cancel or reschedule the event,
    /// or be downgraded into an [`EventGuard`](crate::EventGuard) for
    /// scope-bound cancellation.
    pub fn schedule_with_policy<F>(
        &self,
        delay: u64,
        policy: SchedulePolicy,
        handler: F,
    ) -> EventListener
    where
        F: FnMut(&Event) -> Result<(), Fault> + 'static,
    {
        let handler: EventHandler = Box::new(handler);
        let mut timers = self.timers.lock();
        let counter = self.counter.get();

        let (slot, recurring, interval) = match policy {
            SchedulePolicy::Immediate => (counter, false, 0),
            SchedulePolicy::Delayed => (counter + delay, false, 0),
            SchedulePolicy::RecurringImmediate => (counter, true, delay),
            SchedulePolicy::RecurringDelayed => (counter + delay, true, delay),
            SchedulePolicy::Always => (counter, true, 0),
        };

        let event = Rc::new(Event::new(handler, recurring, interval, slot));
        let listener = Rc::downgrade(&event);
        timers.entry(slot).or_default().push_back(event);

        tracing::trace!(slot, ?policy, "event scheduled");
        listener
    }

    // ── Processing ──────────────────────────────────────────

    /// Drives the loop to time `now`.
    ///
    /// Drains every timer-map entry at or before `now` into a local queue
    /// (under the lock), then fires the drained events in order — ascending
    /// by original due slot, FIFO within a slot — with the lock released.
    /// Recurring events reinsert at `now + interval` unless cancelled;
    /// events whose due time was pushed past `now` while queued relocate
    /// instead of firing. Finally the counter advances to `now`.
    ///
    /// Events scheduled by the handlers fired here land in the live map and
    /// fire no earlier than the next call.
    ///
    /// # Errors
    ///
    /// [`LoopError::HandlerFault`] when a handler fails. The faulting event
    /// is already removed (and, if recurring, not reinserted); drained
    /// events it preceded are dropped, and the counter keeps its pre-tick
    /// value.
    pub fn process(&self, now: u64) -> Result<(), LoopError> {
        let mut queue = self.drain_due(now);
        tracing::debug!(now, drained = queue.len(), "processing tick");

        while let Some(event) = queue.pop_front() {
            if event.is_cancelled() {
                continue;
            }

            if event.due_time() <= now {
                event.fire().map_err(LoopError::HandlerFault)?;

                if event.is_recurring() && !event.is_cancelled() {
                    let mut timers = self.timers.lock();
                    timers
                        .entry(now + event.interval())
                        .or_default()
                        .push_back(event);
                }
            } else {
                // Rescheduled while queued for this tick; relocate.
                let mut timers = self.timers.lock();
                timers.entry(event.due_time()).or_default().push_back(event);
            }
        }

        self.counter.set(now);
        Ok(())
    }

    fn drain_due(&self, now: u64) -> EventQueue {
        let mut timers = self.timers.lock();
        let mut queue = EventQueue::new();

        let due: Vec<u64> = timers.range(..=now).map(|(slot, _)| *slot).collect();
        for slot in due {
            if let Some(mut events) = timers.remove(&slot) {
                queue.append(&mut events);
            }
        }
        queue
    }

    // ── Introspection & reset ───────────────────────────────

    /// The loop's current counter: the `now` of the last completed tick.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.counter.get()
    }

    /// Returns `true` when no events are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.lock().is_empty()
    }

    /// Number of events currently held by the timer map.
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.timers.lock().values().map(VecDeque::len).sum()
    }

    /// Rewinds the counter to zero.
    ///
    /// # Errors
    ///
    /// [`LoopError::NotEmpty`] while any event is still scheduled; the
    /// counter is only allowed to jump backward when nothing can observe
    /// the jump.
    pub fn reset(&self) -> Result<(), LoopError> {
        let timers = self.timers.lock();
        if !timers.is_empty() {
            return Err(LoopError::NotEmpty);
        }
        self.counter.set(0);
        Ok(())
    }
}
