//! Time-indexed cooperative event loop for the Pulse runtime.
//!
//! The loop owns a timer map — an ordered map from counter slots to event
//! queues — and is driven entirely from outside: the host feeds it a
//! monotonically non-decreasing counter through
//! [`EventLoop::process`]. Units are opaque; the loop never reads a clock.
//!
//! ```text
//!        schedule(delay, f)                process(now)
//!              │                                │
//!              ▼                                ▼
//!      ┌───────────────────────┐   drain ≤ now   ┌──────────────┐
//!      │ timer map             │ ───────────────►│ local queue  │
//!      │  slot → [events…]     │                 │ fire in order│
//!      │  (host-supplied lock) │ ◄───────────────│              │
//!      └───────────────────────┘  reinsert       └──────────────┘
//!                                 (recurring / rescheduled)
//! ```
//!
//! # Execution Model
//!
//! Single-threaded and cooperative: handlers run to completion on the
//! thread that calls `process`, and the lock guarding the timer map is held
//! only across map mutations, never across handler invocations. The lock
//! type is injected ([`EventLoop`] is generic over a
//! [`RawMutex`](parking_lot::lock_api::RawMutex)); [`NullLock`] serves
//! hosts with nothing to synchronize.
//!
//! # Scheduling
//!
//! | Policy | Slot | Recurring | Interval |
//! |--------|------|-----------|----------|
//! | [`Immediate`](SchedulePolicy::Immediate) | counter | no | — |
//! | [`Delayed`](SchedulePolicy::Delayed) | counter + delay | no | — |
//! | [`RecurringImmediate`](SchedulePolicy::RecurringImmediate) | counter | yes | delay |
//! | [`RecurringDelayed`](SchedulePolicy::RecurringDelayed) | counter + delay | yes | delay |
//! | [`Always`](SchedulePolicy::Always) | counter | yes | 0 |
//!
//! Every schedule call returns an [`EventListener`]: a weak handle that can
//! cancel or reschedule the event, and that an [`EventGuard`] can turn into
//! a scope-bound cancellation.
//!
//! Events scheduled by a firing handler never fire within the same tick;
//! they become visible to the next `process` call whose `now` covers their
//! slot.
//!
//! # Time Utilities
//!
//! [`EventLoop::wait`] resolves a promise after a delay,
//! [`EventLoop::timeout`] races a promise against one, and
//! [`EventLoop::debounce`] / [`EventLoop::throttle`] adapt plain callables
//! to trailing-edge / leading-edge invocation.
//!
//! # Example
//!
//! ```
//! use pulse_loop::EventLoop;
//!
//! let event_loop = EventLoop::new();
//! let fired = std::rc::Rc::new(std::cell::Cell::new(false));
//!
//! let flag = fired.clone();
//! event_loop.schedule(100, move |_| {
//!     flag.set(true);
//!     Ok(())
//! });
//!
//! event_loop.process(90).unwrap();
//! assert!(!fired.get());
//! event_loop.process(110).unwrap();
//! assert!(fired.get());
//! ```

mod error;
mod event;
mod event_loop;
mod listener;
mod lock;
mod policy;
mod time;

pub use error::LoopError;
pub use event::{Event, EventHandler};
pub use event_loop::EventLoop;
pub use listener::{EventGuard, EventListener};
pub use lock::NullLock;
pub use policy::SchedulePolicy;
pub use time::{Timeout, TimeoutResult};

// Re-exports: handlers fail with faults, wait/timeout yield promises.
pub use pulse_promise::{Promise, PromisePtr};
pub use pulse_types::Fault;
