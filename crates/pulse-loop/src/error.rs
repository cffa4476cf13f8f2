//! Loop layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`LoopError::HandlerFault`] | `LOOP_HANDLER_FAULT` | No |
//! | [`LoopError::NotEmpty`] | `LOOP_NOT_EMPTY` | Yes |

use pulse_types::{ErrorCode, Fault};
use thiserror::Error;

/// Loop layer error.
#[derive(Debug, Error)]
pub enum LoopError {
    /// A fired handler failed during [`process`](crate::EventLoop::process).
    ///
    /// The faulting event had already been removed from the timer map; a
    /// recurring one is not reinserted, and events drained for the same
    /// tick but not yet fired are dropped with it. No retry.
    #[error("event handler failed: {0}")]
    HandlerFault(Fault),

    /// [`reset`](crate::EventLoop::reset) was called while events were
    /// still scheduled.
    ///
    /// Drain or cancel the remaining events, then retry.
    #[error("event loop still holds scheduled events")]
    NotEmpty,
}

impl ErrorCode for LoopError {
    fn code(&self) -> &'static str {
        match self {
            Self::HandlerFault(_) => "LOOP_HANDLER_FAULT",
            Self::NotEmpty => "LOOP_NOT_EMPTY",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::HandlerFault(_) => false,
            Self::NotEmpty => true,
        }
    }
}
