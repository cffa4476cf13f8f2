//! Promise layer errors.
//!
//! Only the recoverable condition lives here. Contract violations —
//! settling an already-settled promise — are programming errors and panic
//! instead of returning.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`PromiseError::UnhandledRejection`] | `PROMISE_UNHANDLED_REJECTION` | Yes |

use pulse_types::{ErrorCode, Fault};
use thiserror::Error;

/// Promise layer error.
#[derive(Debug, Clone, Error)]
pub enum PromiseError {
    /// A pending promise was rejected with no settle callback attached.
    ///
    /// The rejection is stored (the promise *is* rejected afterwards), and
    /// the fault surfaces here so the failure cannot pass silently. To
    /// create a rejection that waits for a later handler, use the
    /// [`Promise::rejected`](crate::Promise::rejected) factory instead.
    #[error("unhandled promise rejection: {0}")]
    UnhandledRejection(Fault),
}

impl PromiseError {
    /// The fault that went unhandled.
    #[must_use]
    pub fn fault(&self) -> &Fault {
        match self {
            Self::UnhandledRejection(fault) => fault,
        }
    }
}

impl ErrorCode for PromiseError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnhandledRejection(_) => "PROMISE_UNHANDLED_REJECTION",
        }
    }

    fn is_recoverable(&self) -> bool {
        // The caller can catch the error and chain a handler onto the (now
        // rejected) promise, or route the fault elsewhere.
        true
    }
}
