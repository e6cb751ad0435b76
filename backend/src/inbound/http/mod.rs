//! HTTP inbound adapter exposing the JSON API.

pub mod error;
pub mod health;
pub mod items;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

pub use error::ApiResult;

use actix_web::web::ServiceConfig;

/// Register every `/api/v1` handler on the enclosing scope.
///
/// The scope must be wrapped in session middleware and have
/// [`state::HttpState`] available as app data.
pub fn api_services(cfg: &mut ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(items::list_items)
        .service(items::create_item)
        .service(items::get_item)
        .service(items::update_item)
        .service(items::delete_item);
}
