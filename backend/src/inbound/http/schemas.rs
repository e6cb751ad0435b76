//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their wire shape and register under the domain
//! type's path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Username and password did not match.
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    /// No authenticated session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The record does not exist for the caller.
    #[schema(rename = "not_found")]
    NotFound,
    /// The username is already taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Unexpected server failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "item not found")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "2f1c6a4e-93a4-4c3e-9a4b-6d3f0b6d9a11")]
    trace_id: Option<String>,
    /// Field-level detail for validation failures: `{ field, code }`.
    details: Option<serde_json::Value>,
}
