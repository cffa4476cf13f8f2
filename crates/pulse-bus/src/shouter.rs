//! The multicast endpoint.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use pulse_types::Fault;

use crate::error::BusError;
use crate::listener::{Listener, Revoke};
use crate::message::Message;

/// A boxed handler for message `M`.
type Handler<M> = Box<dyn FnMut(&<M as Message>::Payload) -> Result<(), Fault>>;

/// One stored handler: the callable plus its tombstone flag.
pub(crate) struct HandlerCell<M: Message> {
    func: RefCell<Handler<M>>,
    cancelled: Cell<bool>,
}

impl<M: Message> Revoke for HandlerCell<M> {
    fn revoke(&self) {
        self.cancelled.set(true);
    }

    fn is_revoked(&self) -> bool {
        self.cancelled.get()
    }
}

/// The ordered handler sequence of one message type.
struct Channel<M: Message> {
    handlers: Vec<Rc<HandlerCell<M>>>,
}

impl<M: Message> Default for Channel<M> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

/// A typed multicast endpoint.
///
/// One shouter serves any number of message types, each with an independent,
/// ordered handler sequence. See the crate docs for the delivery contract.
///
/// A shouter is a single-thread object; it hands out [`Listener`]s freely
/// but keeps ownership of every handler.
#[derive(Default)]
pub struct Shouter {
    channels: RefCell<HashMap<TypeId, Box<dyn Any>>>,
}

impl Shouter {
    /// Creates a shouter with no registered handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the sequence of message `M`.
    ///
    /// Subsequent broadcasts of `M` invoke the handler in registration
    /// order. The returned [`Listener`] revokes it; dropping the listener
    /// leaves the handler in place.
    pub fn listen<M: Message>(
        &self,
        handler: impl FnMut(&M::Payload) -> Result<(), Fault> + 'static,
    ) -> Listener {
        let cell = Rc::new(HandlerCell::<M> {
            func: RefCell::new(Box::new(handler)),
            cancelled: Cell::new(false),
        });

        let mut channels = self.channels.borrow_mut();
        let channel = channels
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Channel::<M>::default()));
        // Entries are keyed by the message's TypeId, so the stored box is
        // always the matching Channel<M>.
        if let Some(channel) = channel.downcast_mut::<Channel<M>>() {
            channel.handlers.push(Rc::clone(&cell));
        }

        tracing::trace!(channel = std::any::type_name::<M>(), "handler registered");
        let revoke_cell: Rc<dyn Revoke> = cell;
        Listener::new(Rc::downgrade(&revoke_cell))
    }

    /// Cancels through a listener; equivalent to [`Listener::cancel`].
    pub fn cancel(&self, listener: &Listener) {
        listener.cancel();
    }

    /// Broadcasts `payload` to every live handler of `M`, in order.
    ///
    /// The handler sequence is snapshot before the first invocation:
    /// handlers registered during the broadcast wait for the next one, and
    /// handlers cancelled during the broadcast are skipped if they have not
    /// run yet. Cancelled entries left over from earlier passes are
    /// reclaimed here.
    ///
    /// # Errors
    ///
    /// [`BusError::HandlerFault`] when a handler fails; handlers after it
    /// in the snapshot are skipped.
    pub fn shout<M: Message>(&self, payload: &M::Payload) -> Result<(), BusError> {
        let snapshot: Vec<Rc<HandlerCell<M>>> = {
            let mut channels = self.channels.borrow_mut();
            let Some(channel) = channels
                .get_mut(&TypeId::of::<M>())
                .and_then(|c| c.downcast_mut::<Channel<M>>())
            else {
                return Ok(());
            };
            channel.handlers.retain(|cell| !cell.cancelled.get());
            channel.handlers.clone()
        };

        tracing::trace!(
            channel = std::any::type_name::<M>(),
            handlers = snapshot.len(),
            "shout"
        );

        for cell in snapshot {
            if cell.cancelled.get() {
                continue;
            }
            // A handler that is already running higher up the stack (a
            // recursive shout of its own message) cannot be re-entered and
            // is skipped for that inner pass.
            let Ok(mut func) = cell.func.try_borrow_mut() else {
                continue;
            };
            (*func)(payload).map_err(BusError::HandlerFault)?;
        }
        Ok(())
    }

    /// Number of live (non-cancelled) handlers registered for `M`.
    #[must_use]
    pub fn handler_count<M: Message>(&self) -> usize {
        self.channels
            .borrow()
            .get(&TypeId::of::<M>())
            .and_then(|c| c.downcast_ref::<Channel<M>>())
            .map_or(0, |channel| {
                channel
                    .handlers
                    .iter()
                    .filter(|cell| !cell.cancelled.get())
                    .count()
            })
    }
}
