//! Access decisions. Pure functions of the caller and, where relevant, the
//! record being touched; handlers decide what a denial turns into.

use entities::{album, message};

use crate::auth_middleware::Principal;

/// Decides who counts as an administrator.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, principal: &Principal) -> bool;
}

/// A single designated administrator, matched by exact email.
#[derive(Debug, Clone)]
pub struct AdminEmail {
    email: String,
}

impl AdminEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

impl AdminPolicy for AdminEmail {
    fn is_admin(&self, principal: &Principal) -> bool {
        principal.email == self.email
    }
}

/// Anonymous callers are never administrators.
pub fn admin_only(policy: &dyn AdminPolicy, principal: Option<&Principal>) -> bool {
    principal.is_some_and(|p| policy.is_admin(p))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// Records that may name an owning user.
pub trait Owned {
    fn owner_id(&self) -> Option<i32>;
}

impl Owned for message::Model {
    fn owner_id(&self) -> Option<i32> {
        Some(self.sender_id)
    }
}

impl Owned for album::Model {
    fn owner_id(&self) -> Option<i32> {
        None
    }
}

/// Reads always pass. Writes pass only for the owner; unowned records refuse them.
pub fn owner_or_read_only<R: Owned>(principal: &Principal, record: &R, action: Action) -> bool {
    match action {
        Action::Read => true,
        Action::Write => record.owner_id() == Some(principal.id),
    }
}
