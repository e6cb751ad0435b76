//! Ports at the hexagonal boundary.
//!
//! Driven ports (`DocumentStore`, `PasswordHasher`, `SessionStore`) are
//! implemented in `outbound`; driving ports (`LoginService`, `ItemsQuery`,
//! ...) are implemented by domain services and consumed by `inbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod document_store;
mod items;
mod login_service;
mod password_hasher;
mod session_store;

#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{Collection, Document, DocumentStore, DocumentStoreError, Filter, ID_FIELD};
#[cfg(test)]
pub use items::{MockItemsCommand, MockItemsQuery};
pub use items::{ItemsCommand, ItemsQuery};
#[cfg(test)]
pub use login_service::{MockLoginService, MockRegistrationService, MockUsersQuery};
pub use login_service::{LoginService, RegistrationService, UsersQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionRecord, SessionStore, SessionStoreError};
