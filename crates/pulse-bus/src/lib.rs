//! Type-indexed publish/subscribe for the Pulse runtime.
//!
//! A [`Shouter`] delivers typed messages to zero or more handlers,
//! synchronously and in registration order. Messages are *nominal*: a
//! message is a marker type implementing [`Message`], and two marker types
//! are distinct channels even when their payload tuples coincide.
//!
//! ```text
//! ┌──────────┐ shout::<M>(&payload)  ┌─────────────────────────┐
//! │ Producer │ ────────────────────► │         Shouter         │
//! └──────────┘                       │  TypeId(M) → [h1, h2…]  │
//!                                    └───────────┬─────────────┘
//!                                        in-order│synchronous
//!                         ┌───────────┬──────────┴──┬───────────┐
//!                         ▼           ▼             ▼           ▼
//!                      handler 1   handler 2    handler 3   (cancelled,
//!                                                             skipped)
//! ```
//!
//! # Delivery Contract
//!
//! - Handlers run in registration order, at most once per broadcast.
//! - A broadcast iterates a snapshot taken before the first invocation: a
//!   handler registered *during* a broadcast of the same message is not
//!   invoked by that broadcast.
//! - A handler cancelled during a broadcast is skipped if it has not run
//!   yet, and never runs on later broadcasts.
//! - A handler returning `Err` aborts the broadcast; handlers not yet
//!   invoked are skipped and the failure surfaces out of
//!   [`Shouter::shout`] as [`BusError::HandlerFault`].
//! - No retry, no buffering.
//!
//! # Revocation
//!
//! [`Shouter::listen`] returns a [`Listener`]: a weak, revocable handle.
//! `cancel` is idempotent, and the handler's storage is reclaimed no later
//! than the next broadcast of its message. A [`ListenerGuard`] cancels on
//! drop for scope-bound subscriptions.
//!
//! # Composition
//!
//! A [`ShouterGroup`] composes member shouters with *disjoint* declared
//! message sets and routes `listen`/`shout` to the owning member. Declaring
//! overlapping sets is a construction-time error.
//!
//! # Example
//!
//! ```
//! use pulse_bus::{Message, Shouter};
//!
//! struct Connected;
//! impl Message for Connected {
//!     type Payload = (String, u16);
//! }
//!
//! let bus = Shouter::new();
//! let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//!
//! let sink = seen.clone();
//! let _listener = bus.listen::<Connected>(move |(host, port)| {
//!     sink.borrow_mut().push(format!("{host}:{port}"));
//!     Ok(())
//! });
//!
//! bus.shout::<Connected>(&("localhost".to_string(), 4222)).unwrap();
//! assert_eq!(seen.borrow().as_slice(), ["localhost:4222"]);
//! ```

mod error;
mod group;
mod listener;
mod message;
mod shouter;

pub use error::BusError;
pub use group::{GroupMember, ShouterGroup};
pub use listener::{Listener, ListenerGuard};
pub use message::Message;
pub use shouter::Shouter;

// Re-export for handler signatures.
pub use pulse_types::Fault;
