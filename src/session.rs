//! Auth session context.
//!
//! The signed-in user is an explicit value handed to every cart, checkout and tracker
//! operation. Sign-in itself happens elsewhere; this only holds the result.

use crate::errors::{Error, Result};
use tracing::info;

/// A signed-in user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Stable user id used as the owner key on carts and orders
    pub id: String,
    /// Name for the account menu, if the provider has one
    pub display_name: Option<String>,
}

impl AuthUser {
    /// Creates a user with no display name
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    /// Name for the account menu, falling back to a generic label
    #[must_use]
    pub fn menu_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or("My Account")
    }
}

/// Session state: populated on login, cleared on logout
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<AuthUser>,
}

impl Session {
    /// A session that is already signed in
    #[must_use]
    pub const fn signed_in(user: AuthUser) -> Self {
        Self { user: Some(user) }
    }

    /// Stores the signed-in user, replacing any previous one
    pub fn login(&mut self, user: AuthUser) {
        info!("User {} signed in", user.id);
        self.user = Some(user);
    }

    /// Clears the session
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("User {} signed out", user.id);
        }
    }

    /// The current user, if any
    #[must_use]
    pub const fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// The current user, or `Error::NotAuthenticated`
    pub fn require_user(&self) -> Result<&AuthUser> {
        self.user.as_ref().ok_or(Error::NotAuthenticated)
    }
}
