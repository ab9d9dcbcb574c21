//! Current-user lookup.
//!
//! The directory trusts whatever user the provider returns and refuses to
//! operate when there is none.

use std::sync::{PoisonError, RwLock};

use facturo_core::UserId;

/// Supplies the signed-in user, if any.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}

/// A fixed identity, e.g. from a CLI flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity(Option<UserId>);

impl StaticIdentity {
    #[must_use]
    pub const fn user(user_id: UserId) -> Self {
        Self(Some(user_id))
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.0
    }
}

/// Identity that can sign in and out while the directory is running.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: RwLock<Option<UserId>>,
}

impl SessionIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user_id: UserId) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user_id);
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<UserId> {
        *self.user.read().unwrap_or_else(PoisonError::into_inner)
    }
}
