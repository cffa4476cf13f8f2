//! The error-value container.
//!
//! A [`Fault`] carries an arbitrary rejection payload in type-erased form.
//! It is the Pulse analogue of a caught exception: the promise engine stores
//! one in every rejected promise, bus and event handlers return one to fail
//! a dispatch, and whoever ends up holding it can probe for the concrete
//! payload type to recover the original value.
//!
//! # Guarantees
//!
//! - **Round trip.** For any value `v` of type `V`, `Fault::wrap(v)`
//!   followed by `downcast_ref::<V>()` yields `Some(&v)`. Consumers probing
//!   for an unrelated type observe only the erased identity (`is::<X>()`
//!   is `false`, `downcast_ref::<X>()` is `None`).
//! - **Idempotent wrap.** Wrapping a value that is already a `Fault` is the
//!   identity operation; faults never nest.
//! - **Never empty.** A fault is constructed from a payload and always
//!   holds one; there is no vacant state to misuse.
//!
//! # Example
//!
//! ```
//! use pulse_types::Fault;
//!
//! let fault = Fault::wrap("connection lost".to_string());
//!
//! assert!(fault.is::<String>());
//! assert_eq!(
//!     fault.downcast_ref::<String>().map(String::as_str),
//!     Some("connection lost"),
//! );
//! assert!(!fault.is::<i32>());
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A type-erased, shareable carrier for a rejection payload.
///
/// Cloning a `Fault` is cheap and yields a handle to the same payload, so a
/// single rejection can flow down a promise chain and into any number of
/// reject handlers without copying the underlying value.
///
/// `Fault` is a single-thread type, like the rest of the Pulse core; values
/// that must cross threads are the host's responsibility.
#[derive(Clone)]
pub struct Fault {
    payload: Rc<dyn Any>,
    type_name: &'static str,
}

impl Fault {
    /// Wraps an arbitrary value into a fault.
    ///
    /// If `value` is itself already a `Fault`, it is returned unchanged
    /// instead of being wrapped a second time, so faults never nest no
    /// matter how many hands they pass through.
    ///
    /// # Example
    ///
    /// ```
    /// use pulse_types::Fault;
    ///
    /// let inner = Fault::wrap(404_u32);
    /// let outer = Fault::wrap(inner.clone());
    ///
    /// // Identity, not nesting:
    /// assert!(outer.is::<u32>());
    /// assert_eq!(outer.downcast_ref::<u32>(), Some(&404));
    /// ```
    #[must_use]
    pub fn wrap<V: Any>(value: V) -> Self {
        let type_name = std::any::type_name::<V>();
        let boxed: Box<dyn Any> = Box::new(value);
        match boxed.downcast::<Fault>() {
            Ok(fault) => *fault,
            Err(payload) => Self {
                payload: Rc::from(payload),
                type_name,
            },
        }
    }

    /// Returns `true` if the contained payload is of type `V`.
    #[must_use]
    pub fn is<V: Any>(&self) -> bool {
        self.payload.is::<V>()
    }

    /// Probes the payload by type, returning a reference on match.
    ///
    /// This is the recovery half of the round trip: the consumer that knows
    /// (or guesses) the payload type gets the original value back; everyone
    /// else sees an opaque fault.
    #[must_use]
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.payload.downcast_ref::<V>()
    }

    /// The payload's type name as captured at wrap time.
    ///
    /// Diagnostic only; the string comes from [`std::any::type_name`] and
    /// has no stability guarantee.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show the payload where we can; fall back to the type name.
        if let Some(text) = self.downcast_ref::<String>() {
            write!(f, "fault: {text}")
        } else if let Some(text) = self.downcast_ref::<&'static str>() {
            write!(f, "fault: {text}")
        } else {
            write!(f, "fault of type {}", self.type_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_value_and_type() {
        let fault = Fault::wrap("boom".to_string());

        assert!(fault.is::<String>());
        assert_eq!(fault.downcast_ref::<String>().map(String::as_str), Some("boom"));
    }

    #[test]
    fn unrelated_probe_sees_only_erased_identity() {
        let fault = Fault::wrap(42_i32);

        assert!(!fault.is::<String>());
        assert!(fault.downcast_ref::<u32>().is_none());
        assert_eq!(fault.downcast_ref::<i32>(), Some(&42));
    }

    #[test]
    fn wrapping_a_fault_is_identity() {
        let original = Fault::wrap(7_u8);
        let rewrapped = Fault::wrap(Fault::wrap(original.clone()));

        assert!(rewrapped.is::<u8>());
        assert_eq!(rewrapped.downcast_ref::<u8>(), Some(&7));
        assert_eq!(rewrapped.type_name(), original.type_name());
    }

    #[test]
    fn clones_share_the_payload() {
        let fault = Fault::wrap(vec![1, 2, 3]);
        let other = fault.clone();

        let a = fault.downcast_ref::<Vec<i32>>().map(|v| v.as_ptr());
        let b = other.downcast_ref::<Vec<i32>>().map(|v| v.as_ptr());
        assert_eq!(a, b);
    }

    #[test]
    fn display_shows_string_payloads() {
        let fault = Fault::wrap("not again".to_string());
        assert_eq!(fault.to_string(), "fault: not again");

        let opaque = Fault::wrap(3.5_f64);
        assert_eq!(opaque.to_string(), "fault of type f64");
    }

    #[test]
    fn type_name_is_captured_at_wrap_time() {
        struct Marker;
        let fault = Fault::wrap(Marker);
        assert!(fault.type_name().ends_with("Marker"));
    }
}
