//! The promise cell and its chaining operations.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use pulse_types::Fault;

use crate::chain::{Chain, Settlement};
use crate::error::PromiseError;
use crate::state::PromiseState;

/// Shared handle to a promise.
///
/// Promises are heap-allocated and reference-counted; a chained promise is
/// kept alive by the settle callback installed in its antecedent until the
/// antecedent settles.
pub type PromisePtr<T> = Rc<Promise<T>>;

/// The settle callback: consumes the settlement, drives the next promise.
pub(crate) type SettleCallback<T> = Box<dyn FnOnce(Settlement<T>) -> Result<(), PromiseError>>;

/// Pending promises hold the (at most one) settle callback; settled
/// promises hold their terminal settlement.
enum Inner<T> {
    Pending { on_settle: Option<SettleCallback<T>> },
    Settled(Settlement<T>),
}

/// A single-assignment value-or-fault cell.
///
/// See the crate docs for the settlement and chaining rules. `T = ()` is
/// the void case: a promise that conveys completion without a payload.
///
/// # Panics
///
/// `resolve` and `reject` panic when the promise is already settled; that
/// is a contract violation, not a recoverable condition.
pub struct Promise<T> {
    inner: RefCell<Inner<T>>,
}

impl<T: Clone + 'static> Promise<T> {
    /// Creates a pending promise.
    #[must_use]
    pub fn pending() -> PromisePtr<T> {
        Rc::new(Self {
            inner: RefCell::new(Inner::Pending { on_settle: None }),
        })
    }

    /// Creates a promise that is already resolved with `value`.
    #[must_use]
    pub fn resolved(value: T) -> PromisePtr<T> {
        Rc::new(Self {
            inner: RefCell::new(Inner::Settled(Settlement::Resolved(value))),
        })
    }

    /// Creates a promise that is already rejected with `payload`.
    ///
    /// This is the only way to obtain a rejected promise without a settle
    /// callback attached and without surfacing
    /// [`PromiseError::UnhandledRejection`]: the fault waits silently until
    /// a chaining operation attaches a handler, which then runs
    /// immediately.
    #[must_use]
    pub fn rejected<V: Any>(payload: V) -> PromisePtr<T> {
        Rc::new(Self {
            inner: RefCell::new(Inner::Settled(Settlement::Rejected(Fault::wrap(payload)))),
        })
    }

    /// Creates a pending promise and hands it to `launcher` before
    /// returning it.
    ///
    /// The launcher typically dispatches the promise somewhere that will
    /// settle it later:
    ///
    /// ```
    /// use pulse_promise::Promise;
    ///
    /// let mut outbox = Vec::new();
    /// let p = Promise::<u8>::with(|p| outbox.push(p.clone()));
    /// assert!(p.is_pending());
    /// assert_eq!(outbox.len(), 1);
    /// ```
    #[must_use]
    pub fn with(launcher: impl FnOnce(&PromisePtr<T>)) -> PromisePtr<T> {
        let promise = Self::pending();
        launcher(&promise);
        promise
    }

    // ── Observation ─────────────────────────────────────────

    /// The current state.
    #[must_use]
    pub fn state(&self) -> PromiseState {
        match &*self.inner.borrow() {
            Inner::Pending { .. } => PromiseState::Pending,
            Inner::Settled(Settlement::Resolved(_)) => PromiseState::Resolved,
            Inner::Settled(Settlement::Rejected(_)) => PromiseState::Rejected,
        }
    }

    /// Returns `true` while the promise is unsettled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    /// Returns `true` once the promise has resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state() == PromiseState::Resolved
    }

    /// Returns `true` once the promise has rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.state() == PromiseState::Rejected
    }

    /// Returns `true` once the promise has settled either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    /// The resolved value, if any.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        match &*self.inner.borrow() {
            Inner::Settled(Settlement::Resolved(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// The rejection fault, if any.
    #[must_use]
    pub fn fault(&self) -> Option<Fault> {
        match &*self.inner.borrow() {
            Inner::Settled(Settlement::Rejected(fault)) => Some(fault.clone()),
            _ => None,
        }
    }

    /// Whether a settle callback is currently attached.
    #[must_use]
    pub fn has_settle_callback(&self) -> bool {
        match &*self.inner.borrow() {
            Inner::Pending { on_settle } => on_settle.is_some(),
            Inner::Settled(_) => false,
        }
    }

    // ── Settlement ──────────────────────────────────────────

    /// Resolves the promise with `value`.
    ///
    /// Invokes the settle callback synchronously if one is attached.
    ///
    /// # Errors
    ///
    /// Whatever the settle callback surfaces — in practice an
    /// [`PromiseError::UnhandledRejection`] from further down the chain.
    ///
    /// # Panics
    ///
    /// If the promise is already settled.
    pub fn resolve(&self, value: T) -> Result<(), PromiseError> {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            let Inner::Pending { on_settle } = &mut *inner else {
                panic!("attempted to resolve an already settled promise");
            };
            let callback = on_settle.take();
            let argument = callback.as_ref().map(|_| value.clone());
            *inner = Inner::Settled(Settlement::Resolved(value));
            callback.zip(argument)
        };

        tracing::trace!(value_type = std::any::type_name::<T>(), "promise resolved");
        match callback {
            Some((callback, value)) => callback(Settlement::Resolved(value)),
            None => Ok(()),
        }
    }

    /// Rejects the promise with `payload`, wrapped into a [`Fault`] unless
    /// it already is one.
    ///
    /// Invokes the settle callback synchronously if one is attached.
    ///
    /// # Errors
    ///
    /// [`PromiseError::UnhandledRejection`] when no settle callback is
    /// attached at the moment of rejection (the promise still transitions
    /// to rejected), or whatever an attached callback surfaces from
    /// further down the chain.
    ///
    /// # Panics
    ///
    /// If the promise is already settled.
    pub fn reject<V: Any>(&self, payload: V) -> Result<(), PromiseError> {
        let fault = Fault::wrap(payload);
        let callback = {
            let mut inner = self.inner.borrow_mut();
            let Inner::Pending { on_settle } = &mut *inner else {
                panic!("attempted to reject an already settled promise");
            };
            let callback = on_settle.take();
            *inner = Inner::Settled(Settlement::Rejected(fault.clone()));
            callback
        };

        tracing::trace!(fault = %fault, "promise rejected");
        match callback {
            Some(callback) => callback(Settlement::Rejected(fault)),
            None => Err(PromiseError::UnhandledRejection(fault)),
        }
    }

    /// Installs the settle callback.
    ///
    /// If the promise is already settled the callback runs before this
    /// returns. Installing over an existing callback replaces it; chaining
    /// operations install at most once per promise.
    pub(crate) fn install(&self, callback: SettleCallback<T>) -> Result<(), PromiseError> {
        let immediate = {
            let mut inner = self.inner.borrow_mut();
            match &mut *inner {
                Inner::Pending { on_settle } => {
                    *on_settle = Some(callback);
                    None
                }
                Inner::Settled(settlement) => Some((callback, settlement.clone())),
            }
        };

        match immediate {
            Some((callback, settlement)) => callback(settlement),
            None => Ok(()),
        }
    }

    // ── Chaining ────────────────────────────────────────────

    /// Attaches a resolve handler; rejection propagates unchanged
    /// down-chain.
    ///
    /// # Errors
    ///
    /// If this promise is already settled the handler runs synchronously,
    /// and an unhandled rejection further down the chain surfaces here.
    pub fn then<U, F>(&self, on_resolve: F) -> Result<PromisePtr<U>, PromiseError>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Chain<U> + 'static,
    {
        self.then_or(on_resolve, |fault| Chain::Error(fault))
    }

    /// Attaches both a resolve and a reject handler.
    ///
    /// The next promise's type `U` is the common type both arms agree on:
    /// `()` when both are void, `Option<X>` when one arm has nothing to
    /// say, [`Either<X, Y>`](crate::Either) when they disagree.
    ///
    /// # Errors
    ///
    /// See [`Promise::then`].
    pub fn then_or<U, FR, FE>(
        &self,
        on_resolve: FR,
        on_reject: FE,
    ) -> Result<PromisePtr<U>, PromiseError>
    where
        U: Clone + 'static,
        FR: FnOnce(T) -> Chain<U> + 'static,
        FE: FnOnce(Fault) -> Chain<U> + 'static,
    {
        let next = Promise::<U>::pending();
        let chained = next.clone();
        self.install(Box::new(move |settlement| {
            let chain = match settlement {
                Settlement::Resolved(value) => on_resolve(value),
                Settlement::Rejected(fault) => on_reject(fault),
            };
            route(chain, &chained)
        }))?;
        Ok(next)
    }

    /// Attaches a reject handler; resolution passes through unchanged.
    ///
    /// # Errors
    ///
    /// See [`Promise::then`].
    pub fn rescue<F>(&self, on_reject: F) -> Result<PromisePtr<T>, PromiseError>
    where
        F: FnOnce(Fault) -> Chain<T> + 'static,
    {
        self.then_or(Chain::Value, on_reject)
    }

    /// Attaches a handler that runs on settlement of either kind.
    ///
    /// The handler receives the [`Settlement`] and its return settles the
    /// next promise exactly like a `then` handler's would.
    ///
    /// # Errors
    ///
    /// See [`Promise::then`].
    pub fn finally<U, F>(&self, on_settle: F) -> Result<PromisePtr<U>, PromiseError>
    where
        U: Clone + 'static,
        F: FnOnce(Settlement<T>) -> Chain<U> + 'static,
    {
        let next = Promise::<U>::pending();
        let chained = next.clone();
        self.install(Box::new(move |settlement| route(on_settle(settlement), &chained)))?;
        Ok(next)
    }

    /// Couples `target` to this promise: when this promise settles, the
    /// target settles with the same state and value.
    ///
    /// Piping an already-settled promise settles the target synchronously.
    ///
    /// # Errors
    ///
    /// Whatever the target's own settlement surfaces.
    pub fn pipe(&self, target: &PromisePtr<T>) -> Result<(), PromiseError> {
        let target = target.clone();
        self.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => target.resolve(value),
            Settlement::Rejected(fault) => target.reject(fault),
        }))
    }
}

/// Applies a handler's [`Chain`] decision to the next promise.
fn route<U: Clone + 'static>(chain: Chain<U>, next: &PromisePtr<U>) -> Result<(), PromiseError> {
    match chain {
        Chain::Value(value) => next.resolve(value),
        Chain::Error(fault) => next.reject(fault),
        Chain::Pending(promise) => promise.pipe(next),
    }
}

impl<T> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.inner.borrow() {
            Inner::Pending { .. } => "Pending",
            Inner::Settled(Settlement::Resolved(_)) => "Resolved",
            Inner::Settled(Settlement::Rejected(_)) => "Rejected",
        };
        f.debug_struct("Promise").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // ── Factories ───────────────────────────────────────────

    #[test]
    fn pending_factory() {
        let p = Promise::<()>::pending();
        assert_eq!(p.state(), PromiseState::Pending);
        assert!(p.is_pending());
        assert!(!p.is_settled());
        assert!(p.value().is_none());
        assert!(!p.has_settle_callback());
    }

    #[test]
    fn resolved_factory() {
        let p = Promise::resolved(100);
        assert_eq!(p.state(), PromiseState::Resolved);
        assert!(p.is_settled());
        assert_eq!(p.value(), Some(100));
        assert!(!p.has_settle_callback());
    }

    #[test]
    fn rejected_factory_holds_its_fault_silently() {
        let p = Promise::<String>::rejected("rejected promise".to_string());
        assert_eq!(p.state(), PromiseState::Rejected);
        let fault = p.fault().expect("fault stored");
        assert_eq!(
            fault.downcast_ref::<String>().map(String::as_str),
            Some("rejected promise"),
        );
    }

    #[test]
    fn with_factory_hands_out_the_promise() {
        let p = Promise::<i32>::with(|p| {
            p.resolve(7).expect("resolve in launcher");
        });
        assert_eq!(p.value(), Some(7));
    }

    // ── Settlement ──────────────────────────────────────────

    #[test]
    fn resolve_settles() {
        let p = Promise::<bool>::pending();
        p.resolve(true).expect("resolve");
        assert!(p.is_resolved());
        assert_eq!(p.value(), Some(true));
    }

    #[test]
    fn reject_without_callback_is_unhandled_but_settles() {
        let p = Promise::<bool>::pending();
        let err = p.reject("rejected".to_string()).unwrap_err();

        let PromiseError::UnhandledRejection(fault) = err;
        assert_eq!(
            fault.downcast_ref::<String>().map(String::as_str),
            Some("rejected"),
        );
        assert!(p.is_rejected());
    }

    #[test]
    #[should_panic(expected = "already settled")]
    fn double_resolve_panics() {
        let p = Promise::resolved(());
        let _ = p.resolve(());
    }

    #[test]
    #[should_panic(expected = "already settled")]
    fn reject_after_resolve_panics() {
        let p = Promise::resolved(1);
        let _ = p.reject("late");
    }

    #[test]
    #[should_panic(expected = "already settled")]
    fn resolve_after_factory_rejection_panics() {
        let p = Promise::<i32>::rejected("x");
        let _ = p.resolve(0);
    }

    // ── Chaining ────────────────────────────────────────────

    #[test]
    fn then_attaches_a_settle_callback() {
        let p = Promise::<i32>::pending();
        let _next = p.then(Chain::Value).expect("then");
        assert!(p.has_settle_callback());
    }

    #[test]
    fn then_forwards_the_resolved_value() {
        let p = Promise::<i32>::pending();
        let next = p.then(Chain::Value).expect("then");

        p.resolve(10).expect("resolve");
        assert_eq!(next.value(), Some(10));
        assert!(!p.has_settle_callback());
    }

    #[test]
    fn then_rejection_propagates_and_surfaces_unhandled() {
        let p = Promise::<i32>::pending();
        let next = p.then(Chain::Value).expect("then");

        let err = p.reject("rejected".to_string()).unwrap_err();
        let PromiseError::UnhandledRejection(fault) = err;
        assert_eq!(
            fault.downcast_ref::<String>().map(String::as_str),
            Some("rejected"),
        );

        assert!(next.is_rejected());
        assert!(next.fault().is_some_and(|f| f.is::<String>()));
    }

    #[test]
    fn handler_error_rejects_the_next_promise() {
        let p = Promise::<i32>::pending();
        let next = p.then::<i32, _>(|_| Chain::error("broke")).expect("then");
        let seen = Rc::new(Cell::new(false));

        let s = seen.clone();
        let _tail = next
            .rescue(move |fault| {
                s.set(fault.is::<&'static str>());
                Chain::Value(0)
            })
            .expect("rescue");

        p.resolve(5).expect("resolve");
        assert!(seen.get());
    }

    #[test]
    fn handler_may_return_a_promise_to_pipe() {
        let p = Promise::<i32>::pending();
        let inner = Promise::<i32>::pending();

        let inner_for_handler = inner.clone();
        let next = p
            .then(move |_| Chain::Pending(inner_for_handler))
            .expect("then");

        p.resolve(1).expect("resolve");
        assert!(next.is_pending());

        inner.resolve(99).expect("inner resolve");
        assert_eq!(next.value(), Some(99));
    }

    #[test]
    fn chaining_on_settled_promise_dispatches_synchronously() {
        let p = Promise::resolved(4);
        let next = p.then(|n| Chain::Value(n + 1)).expect("then");
        assert_eq!(next.value(), Some(5));
    }

    #[test]
    fn then_on_factory_rejected_surfaces_down_chain_rejection() {
        let p = Promise::<i32>::rejected("held".to_string());
        // The rethrow arm re-rejects the next promise, which has no
        // handler of its own yet.
        let err = p.then(Chain::Value).unwrap_err();
        assert!(err.fault().is::<String>());
    }

    #[test]
    fn rescue_consumes_a_factory_rejection() {
        let p = Promise::<i32>::rejected("held".to_string());
        let next = p
            .rescue(|fault| {
                assert!(fault.is::<String>());
                Chain::Value(-1)
            })
            .expect("rescue");
        assert_eq!(next.value(), Some(-1));
    }

    #[test]
    fn rescue_passes_resolution_through() {
        let p = Promise::<i32>::pending();
        let next = p.rescue(|_| Chain::Value(0)).expect("rescue");

        p.resolve(8).expect("resolve");
        assert_eq!(next.value(), Some(8));
    }

    #[test]
    fn finally_sees_the_value() {
        let p = Promise::<i32>::pending();
        let seen = Rc::new(Cell::new(0));

        let s = seen.clone();
        let next = p
            .finally(move |settlement| {
                if let Some(&value) = settlement.value() {
                    s.set(value);
                }
                Chain::Value("done".to_string())
            })
            .expect("finally");

        p.resolve(-100).expect("resolve");
        assert_eq!(seen.get(), -100);
        assert_eq!(next.value(), Some("done".to_string()));
    }

    #[test]
    fn finally_sees_the_fault() {
        let p = Promise::<i32>::pending();
        let seen = Rc::new(Cell::new(false));

        let s = seen.clone();
        let next = p
            .finally(move |settlement| {
                s.set(settlement.fault().is_some());
                Chain::Value(())
            })
            .expect("finally");

        p.reject("rejected".to_string()).expect("handled rejection");
        assert!(seen.get());
        assert!(next.is_resolved());
    }

    // ── Piping ──────────────────────────────────────────────

    #[test]
    fn pipe_forwards_resolution() {
        let source = Promise::<u8>::pending();
        let target = Promise::<u8>::pending();

        source.pipe(&target).expect("pipe");
        source.resolve(3).expect("resolve");
        assert_eq!(target.value(), Some(3));
    }

    #[test]
    fn pipe_forwards_rejection() {
        let source = Promise::<u8>::pending();
        let target = Promise::<u8>::pending();
        let seen = Rc::new(Cell::new(false));

        source.pipe(&target).expect("pipe");
        let s = seen.clone();
        let _tail = target
            .rescue(move |fault| {
                s.set(fault.is::<&'static str>());
                Chain::Value(0)
            })
            .expect("rescue");

        source.reject("gone").expect("handled rejection");
        assert!(seen.get());
        assert!(target.is_rejected());
    }

    #[test]
    fn pipe_of_settled_source_settles_target_synchronously() {
        let source = Promise::resolved("ready".to_string());
        let target = Promise::<String>::pending();

        source.pipe(&target).expect("pipe");
        assert_eq!(target.value(), Some("ready".to_string()));
    }

    // ── Lifetime ────────────────────────────────────────────

    #[test]
    fn chained_promise_lives_through_its_antecedent() {
        let p = Promise::<i32>::pending();
        let next = p.then(Chain::Value).expect("then");
        let weak_next = Rc::downgrade(&next);
        drop(next);

        // The callback installed in `p` keeps the chained promise alive.
        assert!(weak_next.upgrade().is_some());

        p.resolve(1).expect("resolve");
        // Settlement consumed the callback; the chained promise may go.
        assert!(weak_next.upgrade().is_none());
    }
}
