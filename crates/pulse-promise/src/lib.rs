//! JavaScript-style promises for the Pulse runtime.
//!
//! A [`Promise`] is a single-assignment cell that is either `Pending`,
//! `Resolved` with a value, or `Rejected` with a [`Fault`]. Settlement is
//! terminal, observation is synchronous, and there is no executor: chain
//! handlers run inside whatever call performs the settlement.
//!
//! ```text
//!            resolve(v)                      then / rescue / finally
//! Pending ────────────────► Resolved(v) ───► handler(v) ──► next promise
//!    │
//!    │       reject(e)
//!    └───────────────────► Rejected(Fault) ─► handler(e) ──► next promise
//! ```
//!
//! # Settlement Rules
//!
//! - Settling a non-pending promise is a contract violation and panics.
//! - `reject` on a pending promise with **no settle callback attached**
//!   stores the rejection and returns
//!   [`PromiseError::UnhandledRejection`]; the factory
//!   [`Promise::rejected`] is the one way to create a rejection that waits
//!   silently for a later handler.
//! - Attaching a handler to an already-settled promise dispatches it
//!   synchronously, before the chaining call returns.
//!
//! # Chaining
//!
//! Handlers return a [`Chain`] describing what the next promise should do:
//! resolve with a value, reject with a fault (the "handler raised" case),
//! or follow another promise (piping). The chained-type rules of the
//! engine are expressed with ordinary named types — `()` when both arms are
//! void, [`Option`] when one arm is, [`Either`] when the arms disagree —
//! chosen by the caller as the common next type.
//!
//! # Composition
//!
//! [`all2`]/[`all3`]/[`all4`] resolve with a tuple of every input's value
//! and reject with the first input rejection; [`all_unit`] is the
//! unit-promise special case. [`race2`]/[`race3`] settle like the first
//! input to settle, with [`Race2`]/[`Race3`] sum results;
//! [`race_all`] covers the homogeneous case. Cancellation of a promise is
//! deliberately unsupported; racing against a timer is the idiom instead.
//!
//! # Example
//!
//! ```
//! use pulse_promise::{Chain, Promise};
//!
//! let source = Promise::<i32>::pending();
//! let doubled = source.then(|n| Chain::Value(n * 2)).unwrap();
//!
//! source.resolve(21).unwrap();
//! assert_eq!(doubled.value(), Some(42));
//! ```

mod chain;
mod compose;
mod error;
mod promise;
mod state;

pub use chain::{Chain, Either, Settlement};
pub use compose::{all2, all3, all4, all_unit, race2, race3, race_all, Race2, Race3};
pub use error::PromiseError;
pub use promise::{Promise, PromisePtr};
pub use state::PromiseState;

// Re-export: rejection payloads travel as faults.
pub use pulse_types::Fault;
