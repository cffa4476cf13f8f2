//! Weak event handles and their RAII guard.

use std::rc::Weak;

use crate::event::Event;

/// A weak, revocable handle to a scheduled [`Event`].
///
/// Upgrade to reach the event while it is still owned by the loop;
/// a one-shot event expires once fired, a cancelled event expires when the
/// loop next touches its slot.
pub type EventListener = Weak<Event>;

/// Scoped owner of an [`EventListener`]: cancels the event on drop.
///
/// Guards are move-only (as all Rust values are); assigning a fresh guard
/// into a binding drops the previous one, which cancels its event first —
/// the replace-then-cancel-prior behavior falls out of ordinary drop
/// semantics.
///
/// # Example
///
/// ```
/// use pulse_loop::{EventGuard, EventLoop};
///
/// let event_loop = EventLoop::new();
/// let fired = std::rc::Rc::new(std::cell::Cell::new(false));
///
/// {
///     let flag = fired.clone();
///     let _guard = EventGuard::from(event_loop.schedule(100, move |_| {
///         flag.set(true);
///         Ok(())
///     }));
/// }
/// // guard dropped: the event is cancelled before its slot arrives
/// event_loop.process(110).unwrap();
/// assert!(!fired.get());
/// ```
#[derive(Debug, Default)]
pub struct EventGuard {
    listener: EventListener,
}

impl EventGuard {
    /// Wraps a listener into a guard.
    #[must_use]
    pub fn new(listener: EventListener) -> Self {
        Self { listener }
    }

    /// Cancels the guarded event now, if it is still reachable.
    pub fn release(&self) {
        if let Some(event) = self.listener.upgrade() {
            event.cancel();
        }
    }

    /// Read-only access to the guarded listener.
    #[must_use]
    pub fn listener(&self) -> &EventListener {
        &self.listener
    }
}

impl From<EventListener> for EventGuard {
    fn from(listener: EventListener) -> Self {
        Self::new(listener)
    }
}

impl Drop for EventGuard {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_guard_is_empty_and_inert() {
        let guard = EventGuard::default();
        assert!(guard.listener().upgrade().is_none());
        guard.release();
        drop(guard);
    }
}
