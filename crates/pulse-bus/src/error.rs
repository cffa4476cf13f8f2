//! Bus layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`BusError::AmbiguousMessage`] | `BUS_AMBIGUOUS_MESSAGE` | No |
//! | [`BusError::UnknownMessage`] | `BUS_UNKNOWN_MESSAGE` | No |
//! | [`BusError::HandlerFault`] | `BUS_HANDLER_FAULT` | No |

use pulse_types::{ErrorCode, Fault};
use thiserror::Error;

/// Bus layer error.
#[derive(Debug, Error)]
pub enum BusError {
    /// Two group members declared the same message type.
    ///
    /// Group membership must be disjoint; this is a construction-time
    /// mistake in the caller, not a runtime condition.
    #[error("message {0} is declared by more than one group member")]
    AmbiguousMessage(&'static str),

    /// No group member declared the requested message type.
    #[error("no group member serves message {0}")]
    UnknownMessage(&'static str),

    /// A handler failed during a broadcast.
    ///
    /// Handlers registered after the failing one were skipped for that
    /// pass; the bus itself remains consistent.
    #[error("handler failed during broadcast: {0}")]
    HandlerFault(Fault),
}

impl ErrorCode for BusError {
    fn code(&self) -> &'static str {
        match self {
            Self::AmbiguousMessage(_) => "BUS_AMBIGUOUS_MESSAGE",
            Self::UnknownMessage(_) => "BUS_UNKNOWN_MESSAGE",
            Self::HandlerFault(_) => "BUS_HANDLER_FAULT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_types::assert_error_codes;

    fn all_variants() -> Vec<BusError> {
        vec![
            BusError::AmbiguousMessage("x"),
            BusError::UnknownMessage("x"),
            BusError::HandlerFault(Fault::wrap("x")),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "BUS_");
    }

    #[test]
    fn display_names_the_message() {
        let err = BusError::UnknownMessage("net::Connected");
        assert!(err.to_string().contains("net::Connected"));
    }
}
