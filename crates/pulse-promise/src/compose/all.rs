//! Conjunction: a promise that resolves once every input has resolved.
//!
//! `all2`/`all3`/`all4` take inputs of mixed types and resolve with the
//! tuple of their values, in input order. The first input to reject rejects
//! the combined promise; settlements after the first rejection are ignored.
//! `all_unit` is the all-void special case: no working area, just a
//! countdown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::chain::Settlement;
use crate::error::PromiseError;
use crate::promise::{Promise, PromisePtr};

struct Slots2<A, B> {
    first: Option<A>,
    second: Option<B>,
}

/// Combines two promises into a promise of their value pair.
///
/// # Errors
///
/// An input that is already rejected dispatches synchronously; if the
/// combined rejection ends up unhandled it surfaces here.
pub fn all2<A, B>(
    a: &PromisePtr<A>,
    b: &PromisePtr<B>,
) -> Result<PromisePtr<(A, B)>, PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let next = Promise::<(A, B)>::pending();
    let slots = Rc::new(RefCell::new(Slots2 {
        first: None,
        second: None,
    }));

    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        a.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().first = Some(value);
                complete2(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }
    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        b.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().second = Some(value);
                complete2(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }

    Ok(next)
}

fn complete2<A, B>(
    slots: &Rc<RefCell<Slots2<A, B>>>,
    next: &PromisePtr<(A, B)>,
) -> Result<(), PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    if !next.is_pending() {
        return Ok(());
    }
    let ready = {
        let mut slots = slots.borrow_mut();
        if slots.first.is_some() && slots.second.is_some() {
            slots.first.take().zip(slots.second.take())
        } else {
            None
        }
    };
    match ready {
        Some((a, b)) => next.resolve((a, b)),
        None => Ok(()),
    }
}

struct Slots3<A, B, C> {
    first: Option<A>,
    second: Option<B>,
    third: Option<C>,
}

/// Combines three promises into a promise of their value triple.
///
/// # Errors
///
/// See [`all2`].
pub fn all3<A, B, C>(
    a: &PromisePtr<A>,
    b: &PromisePtr<B>,
    c: &PromisePtr<C>,
) -> Result<PromisePtr<(A, B, C)>, PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let next = Promise::<(A, B, C)>::pending();
    let slots = Rc::new(RefCell::new(Slots3 {
        first: None,
        second: None,
        third: None,
    }));

    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        a.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().first = Some(value);
                complete3(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }
    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        b.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().second = Some(value);
                complete3(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }
    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        c.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().third = Some(value);
                complete3(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }

    Ok(next)
}

fn complete3<A, B, C>(
    slots: &Rc<RefCell<Slots3<A, B, C>>>,
    next: &PromisePtr<(A, B, C)>,
) -> Result<(), PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    if !next.is_pending() {
        return Ok(());
    }
    let ready = {
        let mut slots = slots.borrow_mut();
        if slots.first.is_some() && slots.second.is_some() && slots.third.is_some() {
            match (slots.first.take(), slots.second.take(), slots.third.take()) {
                (Some(a), Some(b), Some(c)) => Some((a, b, c)),
                _ => None,
            }
        } else {
            None
        }
    };
    match ready {
        Some(tuple) => next.resolve(tuple),
        None => Ok(()),
    }
}

struct Slots4<A, B, C, D> {
    first: Option<A>,
    second: Option<B>,
    third: Option<C>,
    fourth: Option<D>,
}

/// Combines four promises into a promise of their value quadruple.
///
/// # Errors
///
/// See [`all2`].
pub fn all4<A, B, C, D>(
    a: &PromisePtr<A>,
    b: &PromisePtr<B>,
    c: &PromisePtr<C>,
    d: &PromisePtr<D>,
) -> Result<PromisePtr<(A, B, C, D)>, PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
{
    let next = Promise::<(A, B, C, D)>::pending();
    let slots = Rc::new(RefCell::new(Slots4 {
        first: None,
        second: None,
        third: None,
        fourth: None,
    }));

    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        a.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().first = Some(value);
                complete4(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }
    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        b.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().second = Some(value);
                complete4(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }
    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        c.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().third = Some(value);
                complete4(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }
    {
        let slots = Rc::clone(&slots);
        let next = next.clone();
        d.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(value) => {
                slots.borrow_mut().fourth = Some(value);
                complete4(&slots, &next)
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }

    Ok(next)
}

fn complete4<A, B, C, D>(
    slots: &Rc<RefCell<Slots4<A, B, C, D>>>,
    next: &PromisePtr<(A, B, C, D)>,
) -> Result<(), PromiseError>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
{
    if !next.is_pending() {
        return Ok(());
    }
    let ready = {
        let mut slots = slots.borrow_mut();
        let filled = slots.first.is_some()
            && slots.second.is_some()
            && slots.third.is_some()
            && slots.fourth.is_some();
        if filled {
            match (
                slots.first.take(),
                slots.second.take(),
                slots.third.take(),
                slots.fourth.take(),
            ) {
                (Some(a), Some(b), Some(c), Some(d)) => Some((a, b, c, d)),
                _ => None,
            }
        } else {
            None
        }
    };
    match ready {
        Some(tuple) => next.resolve(tuple),
        None => Ok(()),
    }
}

/// Combines unit promises into a unit promise.
///
/// Resolves when the last input resolves; rejects with the first input
/// rejection. An empty slice resolves immediately.
///
/// # Errors
///
/// See [`all2`].
pub fn all_unit(promises: &[PromisePtr<()>]) -> Result<PromisePtr<()>, PromiseError> {
    let next = Promise::<()>::pending();
    if promises.is_empty() {
        next.resolve(())?;
        return Ok(next);
    }

    let remaining = Rc::new(Cell::new(promises.len()));
    for promise in promises {
        let remaining = Rc::clone(&remaining);
        let next = next.clone();
        promise.install(Box::new(move |settlement| match settlement {
            Settlement::Resolved(()) => {
                remaining.set(remaining.get() - 1);
                if remaining.get() == 0 && next.is_pending() {
                    next.resolve(())
                } else {
                    Ok(())
                }
            }
            Settlement::Rejected(fault) if next.is_pending() => next.reject(fault),
            Settlement::Rejected(_) => Ok(()),
        }))?;
    }
    Ok(next)
}
