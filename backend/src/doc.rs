//! OpenAPI documentation.
//!
//! [`ApiDoc`] collects every handler path, the request/response bodies and
//! the domain error wrappers from [`crate::inbound::http::schemas`]. Swagger
//! UI serves it in debug builds; `cargo run --bin openapi-dump` prints it.

use crate::inbound::http::items::{CreateItemRequest, ItemResponse, UpdateItemRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{CredentialsRequest, CurrentUserResponse, RegisteredResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the herb inventory API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Herbarium API",
        description = "Per-user herb inventory behind session cookie authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CredentialsRequest,
        RegisteredResponse,
        CurrentUserResponse,
        ItemResponse,
        CreateItemRequest,
        UpdateItemRequest,
    )),
    tags(
        (name = "users", description = "Registration, login and session state"),
        (name = "items", description = "The caller's herb inventory"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
