//! Shared leaf types for the Pulse runtime.
//!
//! This crate is the bottom of the dependency stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  pulse-loop    : Event loop, time utilities     │
//! │  pulse-promise : Promise engine                 │
//! │  pulse-bus     : Shouter/listener bus           │
//! ├─────────────────────────────────────────────────┤
//! │  pulse-types   : Fault, ErrorCode  ◄── HERE     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! It provides two things and nothing else:
//!
//! - [`Fault`] — a type-erased, rethrowable carrier for rejection payloads.
//!   Promises reject with a `Fault`, bus and event handlers fail with a
//!   `Fault`, and consumers recover the original value by dynamic type
//!   match.
//! - [`ErrorCode`] — the unified error interface every Pulse error enum
//!   implements, together with the [`assert_error_code`] /
//!   [`assert_error_codes`] test helpers.
//!
//! # Error Code Convention
//!
//! Codes are `UPPER_SNAKE_CASE`, prefixed per crate:
//!
//! | Crate | Prefix | Example |
//! |-------|--------|---------|
//! | `pulse-promise` | `PROMISE_` | `PROMISE_UNHANDLED_REJECTION` |
//! | `pulse-bus` | `BUS_` | `BUS_AMBIGUOUS_MESSAGE` |
//! | `pulse-loop` | `LOOP_` | `LOOP_HANDLER_FAULT` |

mod error;
mod fault;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use fault::Fault;
