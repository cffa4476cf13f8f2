//! Unified error interface for Pulse crates.
//!
//! Every public error enum in the workspace implements [`ErrorCode`] so that
//! callers can branch on a stable, machine-readable code and decide whether
//! the failure is worth retrying, without matching on concrete enum types
//! from three different crates.
//!
//! # Example
//!
//! ```
//! use pulse_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum StoreError {
//!     Missing(String),
//!     Busy,
//! }
//!
//! impl ErrorCode for StoreError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing(_) => "STORE_MISSING",
//!             Self::Busy => "STORE_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! let err = StoreError::Busy;
//! assert_eq!(err.code(), "STORE_BUSY");
//! assert!(err.is_recoverable());
//! ```

/// Machine-readable error code and recoverability for Pulse errors.
///
/// # Code Format
///
/// - `UPPER_SNAKE_CASE`
/// - Prefixed with the owning crate's domain (`PROMISE_`, `BUS_`, `LOOP_`)
/// - Stable once defined; changing a code is a breaking change
///
/// # Recoverability
///
/// An error is recoverable when retrying, or an action available to the
/// caller, can make the operation succeed (e.g. draining the event loop
/// before resetting its counter). It is not recoverable when the input
/// itself is wrong and will stay wrong on retry.
pub trait ErrorCode {
    /// Returns the machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the caller can do something about this error.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error's code follows the workspace conventions.
///
/// Checks that the code is non-empty, `UPPER_SNAKE_CASE`, and carries the
/// expected prefix.
///
/// # Panics
///
/// Panics with a descriptive message when a check fails; intended for use
/// inside tests.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'",
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE",
    );
}

/// Validates a batch of error codes; use with every variant of an enum.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Permanent => "TEST_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn codes_and_recoverability() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Permanent.is_recoverable());
    }

    #[test]
    fn all_variants_pass_convention_check() {
        assert_error_codes(&[TestError::Transient, TestError::Permanent], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_is_rejected() {
        assert_error_code(&TestError::Transient, "OTHER_");
    }

    #[test]
    fn snake_case_checker() {
        assert!(is_upper_snake_case("LOOP_NOT_EMPTY"));
        assert!(is_upper_snake_case("CODE_2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("_LOOP"));
        assert!(!is_upper_snake_case("LOOP_"));
        assert!(!is_upper_snake_case("LOOP__X"));
        assert!(!is_upper_snake_case("Loop_X"));
    }
}
