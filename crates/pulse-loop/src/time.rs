//! Promise-producing and rate-limiting time utilities.
//!
//! Everything here is sugar over [`EventLoop::schedule`] and the promise
//! engine: `wait` turns a delay into a promise, `timeout` races a promise
//! against one, and `debounce`/`throttle` wrap plain callables in
//! trailing-edge / leading-edge invocation policies.

use std::cell::RefCell;
use std::rc::Rc;

use parking_lot::lock_api::RawMutex;
use pulse_promise::{race2, Chain, Promise, PromiseError, PromisePtr, Race2};
use pulse_types::Fault;

use crate::event_loop::EventLoop;
use crate::listener::EventGuard;

/// The unit value a [`wait`](EventLoop::wait) promise resolves with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout;

/// The outcome of racing a promise against a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutResult<T> {
    /// The promise settled first.
    Completed(T),
    /// The deadline won.
    TimedOut,
}

impl<T> TimeoutResult<T> {
    /// Returns `true` when the deadline won.
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// The completed value, if the promise won.
    #[must_use]
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::TimedOut => None,
        }
    }
}

impl<R: RawMutex> EventLoop<R> {
    /// Returns a promise that resolves with [`Timeout`] once `delay` units
    /// have elapsed on the loop.
    #[must_use]
    pub fn wait(&self, delay: u64) -> PromisePtr<Timeout> {
        Promise::with(|promise| {
            let promise = promise.clone();
            self.schedule(delay, move |_| {
                promise.resolve(Timeout).map_err(Fault::wrap)
            });
        })
    }

    /// Races `promise` against [`wait(delay)`](EventLoop::wait).
    ///
    /// The returned promise resolves with
    /// [`TimeoutResult::Completed`] (or rejects with the original fault)
    /// when the input settles first, and resolves with
    /// [`TimeoutResult::TimedOut`] when the deadline arrives first.
    ///
    /// # Errors
    ///
    /// An already-settled input dispatches synchronously; an unhandled
    /// rejection down the new chain surfaces here.
    pub fn timeout<T>(
        &self,
        delay: u64,
        promise: &PromisePtr<T>,
    ) -> Result<PromisePtr<TimeoutResult<T>>, PromiseError>
    where
        T: Clone + 'static,
    {
        let raced = race2(promise, &self.wait(delay))?;
        raced.then(|winner| {
            Chain::Value(match winner {
                Race2::First(value) => TimeoutResult::Completed(value),
                Race2::Second(Timeout) => TimeoutResult::TimedOut,
            })
        })
    }

    /// Like [`timeout`](EventLoop::timeout), but builds the racing promise
    /// in place: `launcher` receives the fresh pending promise to dispatch
    /// wherever it will be settled.
    ///
    /// # Errors
    ///
    /// See [`timeout`](EventLoop::timeout).
    pub fn timeout_with<T>(
        &self,
        delay: u64,
        launcher: impl FnOnce(&PromisePtr<T>),
    ) -> Result<PromisePtr<TimeoutResult<T>>, PromiseError>
    where
        T: Clone + 'static,
    {
        self.timeout(delay, &Promise::with(launcher))
    }

    /// Wraps `functor` for trailing-edge invocation.
    ///
    /// Each call records its arguments. While the armed event is alive its
    /// due time is pushed out to `now + delay`; otherwise a fresh delayed
    /// event is scheduled. When the quiet period finally elapses, `functor`
    /// runs once with the most recent arguments; its fault, if any,
    /// surfaces out of the `process` call that fires it.
    ///
    /// Calls made after the loop has been dropped are discarded with a
    /// warning.
    pub fn debounce<A, F>(&self, delay: u64, functor: F) -> impl FnMut(A)
    where
        A: 'static,
        F: FnMut(A) -> Result<(), Fault> + 'static,
    {
        let this = self.weak();
        let functor = Rc::new(RefCell::new(functor));
        let latest: Rc<RefCell<Option<A>>> = Rc::new(RefCell::new(None));
        let mut guard = EventGuard::default();

        move |args: A| {
            *latest.borrow_mut() = Some(args);

            let Some(event_loop) = this.upgrade() else {
                tracing::warn!("debounced call after event loop drop; discarding");
                return;
            };

            if let Some(event) = guard.listener().upgrade() {
                if !event.is_cancelled() {
                    event.reschedule(event_loop.now() + delay);
                    return;
                }
            }

            let functor = functor.clone();
            let latest = latest.clone();
            guard = EventGuard::new(event_loop.schedule(delay, move |_| {
                match latest.borrow_mut().take() {
                    Some(args) => {
                        let mut functor = functor.borrow_mut();
                        (*functor)(args)
                    }
                    None => Ok(()),
                }
            }));
        }
    }

    /// Wraps `functor` for leading-edge invocation.
    ///
    /// An armed call runs `functor` synchronously and disarms the wrapper
    /// for `delay` units; calls made while disarmed are dropped and return
    /// `Ok(())`. The disarm window is itself a scheduled event: the wrapper
    /// rearms when that event fires.
    ///
    /// Calls made after the loop has been dropped are discarded with a
    /// warning.
    pub fn throttle<A, F>(&self, delay: u64, mut functor: F) -> impl FnMut(A) -> Result<(), Fault>
    where
        A: 'static,
        F: FnMut(A) -> Result<(), Fault> + 'static,
    {
        let this = self.weak();
        let mut window = EventGuard::default();

        move |args: A| {
            // A live window event means the wrapper is disarmed.
            if window.listener().upgrade().is_some() {
                return Ok(());
            }

            let Some(event_loop) = this.upgrade() else {
                tracing::warn!("throttled call after event loop drop; discarding");
                return Ok(());
            };

            window = EventGuard::new(event_loop.schedule(delay, |_| Ok(())));
            functor(args)
        }
    }
}
