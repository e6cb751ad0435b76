//! Turn rejected request fields into `invalid_request` errors.
//!
//! Every validation failure carries `details: { field, code }` so clients
//! can highlight the offending input.

use serde_json::json;

use crate::domain::{
    Error, ItemId, ItemValidationError, LoginValidationError, UserValidationError,
};

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Username(inner) => {
            let code = match inner {
                UserValidationError::UsernameTooLong { .. } => "username_too_long",
                _ => "empty_username",
            };
            field_error("username", code, inner.to_string())
        }
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

pub(crate) fn map_item_validation_error(err: ItemValidationError) -> Error {
    let (field, code) = match err {
        ItemValidationError::InvalidId => ("id", "invalid_uuid"),
        ItemValidationError::EmptyName => ("name", "empty_name"),
    };
    field_error(field, code, err.to_string())
}

/// Parse an item id taken from the request path.
pub(crate) fn parse_item_id(raw: &str) -> Result<ItemId, Error> {
    ItemId::new(raw).map_err(map_item_validation_error)
}
