//! Shouter groups.
//!
//! A group composes shouters whose declared message sets are disjoint and
//! routes every operation to the member that owns the message type. The
//! disjointness check happens when a member is added, so an ambiguous
//! composition never becomes observable at dispatch time.
//!
//! ```text
//!          listen::<M> / shout::<M>
//!                    │
//!             ┌──────▼──────┐
//!             │ ShouterGroup│   TypeId(M) → member
//!             └──┬───────┬──┘
//!         ┌──────▼──┐ ┌──▼──────┐
//!         │ member 0│ │ member 1│     declared sets disjoint
//!         └─────────┘ └─────────┘
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;

use pulse_types::Fault;

use crate::error::BusError;
use crate::listener::Listener;
use crate::message::Message;
use crate::shouter::Shouter;

/// A shouter plus the message types it declares to serve.
///
/// Built fluently, then handed to [`ShouterGroup::add_member`]:
///
/// ```
/// use std::rc::Rc;
/// use pulse_bus::{GroupMember, Message, Shouter, ShouterGroup};
///
/// struct Opened;
/// impl Message for Opened {
///     type Payload = ();
/// }
///
/// let mut group = ShouterGroup::new();
/// group
///     .add_member(GroupMember::new(Rc::new(Shouter::new())).serves::<Opened>())
///     .unwrap();
/// ```
pub struct GroupMember {
    shouter: Rc<Shouter>,
    declared: Vec<(TypeId, &'static str)>,
}

impl GroupMember {
    /// Starts a member declaration around an existing shouter.
    #[must_use]
    pub fn new(shouter: Rc<Shouter>) -> Self {
        Self {
            shouter,
            declared: Vec::new(),
        }
    }

    /// Declares that this member serves message `M`.
    #[must_use]
    pub fn serves<M: Message>(mut self) -> Self {
        self.declared
            .push((TypeId::of::<M>(), std::any::type_name::<M>()));
        self
    }
}

/// Routes bus operations across member shouters by message type.
#[derive(Default)]
pub struct ShouterGroup {
    members: Vec<Rc<Shouter>>,
    routes: HashMap<TypeId, usize>,
}

impl ShouterGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member, claiming its declared message types.
    ///
    /// # Errors
    ///
    /// [`BusError::AmbiguousMessage`] when any declared type is already
    /// claimed by an earlier member. The group is left unchanged in that
    /// case.
    pub fn add_member(&mut self, member: GroupMember) -> Result<(), BusError> {
        for &(type_id, name) in &member.declared {
            if self.routes.contains_key(&type_id) {
                return Err(BusError::AmbiguousMessage(name));
            }
        }

        let index = self.members.len();
        for &(type_id, _) in &member.declared {
            self.routes.insert(type_id, index);
        }
        self.members.push(member.shouter);
        Ok(())
    }

    /// Registers a handler on the member that serves `M`.
    ///
    /// # Errors
    ///
    /// [`BusError::UnknownMessage`] when no member declared `M`.
    pub fn listen<M: Message>(
        &self,
        handler: impl FnMut(&M::Payload) -> Result<(), Fault> + 'static,
    ) -> Result<Listener, BusError> {
        Ok(self.member_for::<M>()?.listen::<M>(handler))
    }

    /// Broadcasts through the member that serves `M`.
    ///
    /// # Errors
    ///
    /// [`BusError::UnknownMessage`] when no member declared `M`;
    /// [`BusError::HandlerFault`] when a handler fails.
    pub fn shout<M: Message>(&self, payload: &M::Payload) -> Result<(), BusError> {
        self.member_for::<M>()?.shout::<M>(payload)
    }

    /// Number of member shouters.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    fn member_for<M: Message>(&self) -> Result<&Shouter, BusError> {
        self.routes
            .get(&TypeId::of::<M>())
            .map(|&index| self.members[index].as_ref())
            .ok_or_else(|| BusError::UnknownMessage(std::any::type_name::<M>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_types::ErrorCode;
    use std::cell::Cell;

    struct First;
    impl Message for First {
        type Payload = ();
    }

    struct Second;
    impl Message for Second {
        type Payload = (i32,);
    }

    fn two_member_group() -> ShouterGroup {
        let mut group = ShouterGroup::new();
        group
            .add_member(GroupMember::new(Rc::new(Shouter::new())).serves::<First>())
            .expect("first member");
        group
            .add_member(GroupMember::new(Rc::new(Shouter::new())).serves::<Second>())
            .expect("second member");
        group
    }

    #[test]
    fn dispatches_to_the_owning_member() {
        let group = two_member_group();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let f = first.clone();
        let _l1 = group
            .listen::<First>(move |()| {
                f.set(f.get() + 1);
                Ok(())
            })
            .expect("listen First");
        let s = second.clone();
        let _l2 = group
            .listen::<Second>(move |&(value,)| {
                s.set(s.get() + value);
                Ok(())
            })
            .expect("listen Second");

        group.shout::<First>(&()).expect("shout First");
        group.shout::<Second>(&(5,)).expect("shout Second");

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 5);
    }

    #[test]
    fn overlapping_declaration_is_rejected() {
        let mut group = ShouterGroup::new();
        group
            .add_member(GroupMember::new(Rc::new(Shouter::new())).serves::<First>())
            .expect("first member");

        let err = group
            .add_member(
                GroupMember::new(Rc::new(Shouter::new()))
                    .serves::<Second>()
                    .serves::<First>(),
            )
            .unwrap_err();

        assert_eq!(err.code(), "BUS_AMBIGUOUS_MESSAGE");
        // The rejected member must not have claimed anything.
        assert_eq!(group.member_count(), 1);
        assert!(matches!(
            group.shout::<Second>(&(1,)),
            Err(BusError::UnknownMessage(_))
        ));
    }

    #[test]
    fn undeclared_message_is_an_error() {
        let group = two_member_group();
        struct Unserved;
        impl Message for Unserved {
            type Payload = ();
        }

        let err = group.shout::<Unserved>(&()).unwrap_err();
        assert_eq!(err.code(), "BUS_UNKNOWN_MESSAGE");
        assert!(group.listen::<Unserved>(|()| Ok(())).is_err());
    }

    #[test]
    fn member_shared_with_the_group_stays_usable_directly() {
        let shouter = Rc::new(Shouter::new());
        let mut group = ShouterGroup::new();
        group
            .add_member(GroupMember::new(shouter.clone()).serves::<First>())
            .expect("member");

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        shouter.listen::<First>(move |()| {
            c.set(c.get() + 1);
            Ok(())
        });

        group.shout::<First>(&()).expect("group shout");
        shouter.shout::<First>(&()).expect("direct shout");
        assert_eq!(count.get(), 2);
    }
}
