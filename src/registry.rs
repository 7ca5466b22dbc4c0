//! The two named actors of a swap and access to them by role.

use crate::Actor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Alice,
    Bob,
}

impl Role {
    pub fn counterparty(self) -> Role {
        match self {
            Role::Alice => Role::Bob,
            Role::Bob => Role::Alice,
        }
    }
}

/// Owns both actors; lookups by role are total.
#[derive(Debug)]
pub struct Registry {
    alice: Actor,
    bob: Actor,
}

impl Registry {
    pub fn new(alice: Actor, bob: Actor) -> Self {
        Self { alice, bob }
    }

    pub fn get(&self, role: Role) -> &Actor {
        match role {
            Role::Alice => &self.alice,
            Role::Bob => &self.bob,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut Actor {
        match role {
            Role::Alice => &mut self.alice,
            Role::Bob => &mut self.bob,
        }
    }

    /// The actor in `role` together with their counterparty, both mutable.
    pub fn pair_mut(&mut self, role: Role) -> (&mut Actor, &mut Actor) {
        match role {
            Role::Alice => (&mut self.alice, &mut self.bob),
            Role::Bob => (&mut self.bob, &mut self.alice),
        }
    }
}
