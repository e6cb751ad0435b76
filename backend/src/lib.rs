//! Herb inventory service: session authentication and per-user item storage.
//!
//! The [`domain`] owns the rules and the ports it drives. [`outbound`] holds
//! the in-process adapters behind those ports, and [`inbound::http`] exposes
//! the JSON API over Actix Web.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
