//! Disjunction: a promise that settles like the first input to settle.
//!
//! The winner is whichever input settles first, in either direction:
//! a first rejection rejects the race, a first resolution resolves it.
//! Everything after the first settlement is ignored.
//!
//! Inputs of different types need a sum result — [`Race2`]/[`Race3`] tag
//! the winner by position. When every input shares one type the sum
//! collapses and [`race_all`] returns the type itself.

use crate::chain::Settlement;
use crate::error::PromiseError;
use crate::promise::{Promise, PromisePtr};

/// The winner of a two-way race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Race2<A, B> {
    /// The first input won.
    First(A),
    /// The second input won.
    Second(B),
}

/// The winner of a three-way race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Race3<A, B, C> {
    /// The first input won.
    First(A),
    /// The second input won.
    Second(B),
    /// The third input won.
    Third(C),
}

/// Races two promises of distinct types.
///
/// # Errors
///
/// An input that is already settled dispatches synchronously; if the race
/// promise's own settlement ends up unhandled it surfaces here.
pub fn race2<A, B>(
    a: &PromisePtr<A>,
    b: &PromisePtr<B>,
) -> Result<PromisePtr<Race2<A, B>>, PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let next = Promise::<Race2<A, B>>::pending();

    {
        let next = next.clone();
        a.install(Box::new(move |settlement| {
            if !next.is_pending() {
                return Ok(());
            }
            match settlement {
                Settlement::Resolved(value) => next.resolve(Race2::First(value)),
                Settlement::Rejected(fault) => next.reject(fault),
            }
        }))?;
    }
    {
        let next = next.clone();
        b.install(Box::new(move |settlement| {
            if !next.is_pending() {
                return Ok(());
            }
            match settlement {
                Settlement::Resolved(value) => next.resolve(Race2::Second(value)),
                Settlement::Rejected(fault) => next.reject(fault),
            }
        }))?;
    }

    Ok(next)
}

/// Races three promises of distinct types.
///
/// # Errors
///
/// See [`race2`].
pub fn race3<A, B, C>(
    a: &PromisePtr<A>,
    b: &PromisePtr<B>,
    c: &PromisePtr<C>,
) -> Result<PromisePtr<Race3<A, B, C>>, PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let next = Promise::<Race3<A, B, C>>::pending();

    {
        let next = next.clone();
        a.install(Box::new(move |settlement| {
            if !next.is_pending() {
                return Ok(());
            }
            match settlement {
                Settlement::Resolved(value) => next.resolve(Race3::First(value)),
                Settlement::Rejected(fault) => next.reject(fault),
            }
        }))?;
    }
    {
        let next = next.clone();
        b.install(Box::new(move |settlement| {
            if !next.is_pending() {
                return Ok(());
            }
            match settlement {
                Settlement::Resolved(value) => next.resolve(Race3::Second(value)),
                Settlement::Rejected(fault) => next.reject(fault),
            }
        }))?;
    }
    {
        let next = next.clone();
        c.install(Box::new(move |settlement| {
            if !next.is_pending() {
                return Ok(());
            }
            match settlement {
                Settlement::Resolved(value) => next.resolve(Race3::Third(value)),
                Settlement::Rejected(fault) => next.reject(fault),
            }
        }))?;
    }

    Ok(next)
}

/// Races any number of promises of one shared type.
///
/// An empty slice yields a promise that never settles.
///
/// # Errors
///
/// See [`race2`].
pub fn race_all<T>(promises: &[PromisePtr<T>]) -> Result<PromisePtr<T>, PromiseError>
where
    T: Clone + 'static,
{
    let next = Promise::<T>::pending();

    for promise in promises {
        let next = next.clone();
        promise.install(Box::new(move |settlement| {
            if !next.is_pending() {
                return Ok(());
            }
            match settlement {
                Settlement::Resolved(value) => next.resolve(value),
                Settlement::Rejected(fault) => next.reject(fault),
            }
        }))?;
    }

    Ok(next)
}
