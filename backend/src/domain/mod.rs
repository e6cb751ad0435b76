//! Domain primitives, services and ports.
//!
//! Purpose: hold everything that does not depend on a transport or a store.
//! Inbound adapters turn raw input into the validated value types defined
//! here; outbound adapters implement the driven ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserId, Username: account identity.
//! - LoginCredentials, PasswordHash, SessionToken: authentication values.
//! - Item, ItemId, ItemName, Quantity, ItemPatch: inventory entries.
//! - CredentialStore, SessionAuthenticator, ItemRepository: domain services.

pub mod auth;
pub mod credential_store;
mod document_mapping;
pub mod error;
pub mod item;
pub mod item_repository;
pub mod ports;
pub mod session_authenticator;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordHash, SessionDigest, SessionToken,
};
pub use self::credential_store::CredentialStore;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::item::{
    Item, ItemId, ItemName, ItemPatch, ItemValidationError, QUANTITY_UNIT, Quantity,
};
pub use self::item_repository::{ItemRepository, STARTER_ITEMS};
pub use self::session_authenticator::{DEFAULT_SESSION_TTL_MINUTES, SessionAuthenticator};
pub use self::trace_id::TraceId;
pub use self::user::{USERNAME_MAX, User, UserId, UserRecord, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use herbarium::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
