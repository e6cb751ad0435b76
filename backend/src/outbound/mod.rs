//! Outbound adapters implementing driven domain ports.
//!
//! - **document**: in-process JSON document store
//! - **password**: Argon2id password hasher
//! - **session**: in-process session table
//!
//! Adapters translate between domain types and their storage form. They
//! contain no business logic; ownership rules live in the domain services.

pub mod document;
pub mod password;
pub mod session;
