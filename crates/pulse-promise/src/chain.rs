//! Handler argument and result types for promise chaining.

use std::any::Any;

use pulse_types::Fault;

use crate::promise::PromisePtr;

/// How a promise ended: its terminal value or its fault.
///
/// This is what a `finally` handler receives, and what the engine hands to
/// the settle callback internally. For a void promise (`T = ()`) the
/// resolved arm carries the unit value.
#[derive(Debug, Clone)]
pub enum Settlement<T> {
    /// The promise resolved with this value.
    Resolved(T),
    /// The promise rejected with this fault.
    Rejected(Fault),
}

impl<T> Settlement<T> {
    /// The resolved value, if this settlement is a resolution.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// The fault, if this settlement is a rejection.
    #[must_use]
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Resolved(_) => None,
            Self::Rejected(fault) => Some(fault),
        }
    }
}

/// What a chain handler tells the next promise to do.
///
/// | Variant | Next promise |
/// |---------|--------------|
/// | `Value(v)` | resolves with `v` |
/// | `Error(fault)` | rejects with `fault` |
/// | `Pending(p)` | settles exactly like `p` (pipe) |
///
/// `Error` is how a handler "raises": there is no unwinding across the
/// engine, a failing handler simply returns the fault it would have thrown.
pub enum Chain<U> {
    /// Resolve the next promise with a plain value.
    Value(U),
    /// Reject the next promise with a fault.
    Error(Fault),
    /// Couple the next promise to another promise's settlement.
    Pending(PromisePtr<U>),
}

impl<U> Chain<U> {
    /// Shorthand for `Chain::Error(Fault::wrap(payload))`.
    #[must_use]
    pub fn error<V: Any>(payload: V) -> Self {
        Self::Error(Fault::wrap(payload))
    }
}

/// A value of one of two unrelated types.
///
/// The chained-type rule for handlers whose arms return different non-void
/// types: the caller picks `Either<X, Y>` as the common next type and maps
/// each arm into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<A, B> {
    /// The resolve arm's type.
    Left(A),
    /// The reject arm's type.
    Right(B),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_accessors() {
        let resolved: Settlement<i32> = Settlement::Resolved(3);
        assert_eq!(resolved.value(), Some(&3));
        assert!(resolved.fault().is_none());

        let rejected: Settlement<i32> = Settlement::Rejected(Fault::wrap("no"));
        assert!(rejected.value().is_none());
        assert!(rejected.fault().is_some_and(|f| f.is::<&'static str>()));
    }

    #[test]
    fn chain_error_wraps() {
        let chain: Chain<()> = Chain::error(9_u16);
        match chain {
            Chain::Error(fault) => assert_eq!(fault.downcast_ref::<u16>(), Some(&9)),
            _ => panic!("expected Chain::Error"),
        }
    }
}
