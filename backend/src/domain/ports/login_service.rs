//! Driving ports for account creation and credential checks.
//!
//! The session authenticator and the HTTP adapter depend on these traits
//! rather than on the credential store, so either side can be replaced by a
//! test double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User, UserId};

/// Create accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new user; `Conflict` when the username is taken.
    async fn register(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Verify submitted credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the matching user id, or `InvalidCredentials`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Read account details for an authenticated identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
