//! Inventory handlers. Every route resolves the owner from the session first.
//!
//! ```text
//! GET    /api/v1/items
//! POST   /api/v1/items        {"name":"Mint","quantity":"5"}
//! GET    /api/v1/items/{id}
//! PATCH  /api/v1/items/{id}   {"quantity":"7"}
//! DELETE /api/v1/items/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemName, ItemPatch, Quantity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_item_validation_error, parse_item_id};

/// Item as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    #[schema(example = "7f9c24e5-1d3b-4c6a-9a57-0b1d2c3e4f50")]
    pub id: String,
    #[schema(example = "Mint")]
    pub name: String,
    #[schema(example = "5g")]
    pub quantity: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().as_ref().to_owned(),
            quantity: item.quantity().as_ref().to_owned(),
        }
    }
}

/// Body of `POST /items`. A missing `g` suffix on `quantity` is added.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[schema(example = "Mint")]
    pub name: String,
    #[schema(example = "5")]
    pub quantity: String,
}

/// Body of `PATCH /items/{id}`; omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Spearmint")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "7")]
    pub quantity: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    responses(
        (status = 200, description = "Caller's items", body = [ItemResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listItems"
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ItemResponse>>> {
    let owner = session.require_user_id(&state.sessions).await?;
    let items = state.items.list_for_owner(&owner).await?;
    Ok(web::Json(items.into_iter().map(ItemResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateItemRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id(&state.sessions).await?;
    let CreateItemRequest { name, quantity } = payload.into_inner();
    let name = ItemName::new(name).map_err(map_item_validation_error)?;
    let item = state
        .items_command
        .add(&owner, name, Quantity::new(quantity))
        .await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "getItem"
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItemResponse>> {
    let owner = session.require_user_id(&state.sessions).await?;
    let id = parse_item_id(&path)?;
    let item = state.items.get(&owner, id).await?;
    Ok(web::Json(item.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "updateItem"
)]
#[patch("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateItemRequest>,
) -> ApiResult<web::Json<ItemResponse>> {
    let owner = session.require_user_id(&state.sessions).await?;
    let id = parse_item_id(&path)?;
    let UpdateItemRequest { name, quantity } = payload.into_inner();
    let patch = ItemPatch::try_from_parts(name.as_deref(), quantity.as_deref())
        .map_err(map_item_validation_error)?;
    let item = state.items_command.edit(&owner, id, patch).await?;
    Ok(web::Json(item.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id(&state.sessions).await?;
    let id = parse_item_id(&path)?;
    state.items_command.delete(&owner, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockItemsCommand;
    use crate::inbound::http::test_utils::{TestHarness, login_cookie, test_app};
    use actix_web::cookie::Cookie;
    use actix_web::http::{Method, StatusCode};
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    const MISSING_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[actix_web::test]
    async fn add_list_delete_round_trip() {
        let harness = TestHarness::new();
        harness.register("bob", "pw1").await;
        let app = actix_test::init_service(test_app(harness.state())).await;
        let cookie = login_cookie(&app, "bob", "pw1").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/items")
                .cookie(cookie.clone())
                .set_json(CreateItemRequest {
                    name: "Mint".into(),
                    quantity: "5".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: ItemResponse = actix_test::read_body_json(res).await;
        assert_eq!(created.quantity, "5g");

        let listed: Vec<ItemResponse> = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/items")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(listed, vec![created.clone()]);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/items/{}", created.id))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let listed: Vec<ItemResponse> = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/items")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert!(listed.is_empty());
    }

    #[rstest]
    #[case(Method::GET, "/api/v1/items")]
    #[case(Method::POST, "/api/v1/items")]
    #[case(Method::GET, "/api/v1/items/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case(Method::PATCH, "/api/v1/items/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case(Method::DELETE, "/api/v1/items/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[actix_web::test]
    async fn anonymous_requests_are_unauthorised(#[case] method: Method, #[case] uri: &str) {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(harness.state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::default()
                .method(method)
                .uri(uri)
                .set_json(json!({ "name": "Mint", "quantity": "5" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let payload: Value = actix_test::read_body_json(res).await;
        assert_eq!(payload["code"], "unauthorized");
    }

    async fn owned_by_alice(harness: &TestHarness) -> String {
        harness.register("alice", "secret").await;
        harness.register("bob", "pw1").await;
        harness.add_item("alice", "Basil", "5").await
    }

    #[rstest]
    #[case(Method::GET)]
    #[case(Method::PATCH)]
    #[case(Method::DELETE)]
    #[actix_web::test]
    async fn foreign_items_look_missing(#[case] method: Method) {
        let harness = TestHarness::new();
        let alices_item = owned_by_alice(&harness).await;
        let app = actix_test::init_service(test_app(harness.state())).await;
        let bob = login_cookie(&app, "bob", "pw1").await;

        let foreign = call_item(&app, method.clone(), &alices_item, bob.clone()).await;
        let missing = call_item(&app, method, MISSING_ID, bob).await;
        assert_eq!(foreign.0, StatusCode::NOT_FOUND);
        assert_eq!(missing.0, StatusCode::NOT_FOUND);
        assert_eq!(foreign.1["code"], missing.1["code"]);
    }

    async fn call_item<S, B>(
        app: &S,
        method: Method,
        id: &str,
        cookie: Cookie<'static>,
    ) -> (StatusCode, Value)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::default()
                .method(method)
                .uri(&format!("/api/v1/items/{id}"))
                .cookie(cookie)
                .set_json(json!({ "name": "Stolen" }))
                .to_request(),
        )
        .await;
        let status = res.status();
        let body = actix_test::read_body(res).await;
        (status, serde_json::from_slice(&body).expect("error json"))
    }

    #[actix_web::test]
    async fn patch_keeps_omitted_fields() {
        let harness = TestHarness::new();
        let id = owned_by_alice(&harness).await;
        let app = actix_test::init_service(test_app(harness.state())).await;
        let alice = login_cookie(&app, "alice", "secret").await;

        let updated: ItemResponse = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::patch()
                .uri(&format!("/api/v1/items/{id}"))
                .cookie(alice)
                .set_json(UpdateItemRequest {
                    quantity: Some("10G".into()),
                    ..UpdateItemRequest::default()
                })
                .to_request(),
        )
        .await;
        assert_eq!(updated.name, "Basil");
        assert_eq!(updated.quantity, "10g");
    }

    #[actix_web::test]
    async fn blank_quantity_is_stored_as_bare_unit() {
        let harness = TestHarness::new();
        harness.register("bob", "pw1").await;
        let app = actix_test::init_service(test_app(harness.state())).await;
        let cookie = login_cookie(&app, "bob", "pw1").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/items")
                .cookie(cookie)
                .set_json(json!({ "name": "Mint", "quantity": " " }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: ItemResponse = actix_test::read_body_json(res).await;
        assert_eq!(created.quantity, "g");
    }

    #[rstest]
    #[case(json!({ "name": "  ", "quantity": "5" }), "name")]
    #[case(json!({ "name": "", "quantity": "" }), "name")]
    #[actix_web::test]
    async fn blank_fields_are_rejected(#[case] body: Value, #[case] field: &str) {
        let harness = TestHarness::new();
        harness.register("bob", "pw1").await;
        let mut commands = MockItemsCommand::new();
        commands.expect_add().never();
        let mut state = harness.state();
        state.items_command = Arc::new(commands);
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "bob", "pw1").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/items")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let payload: Value = actix_test::read_body_json(res).await;
        assert_eq!(payload["details"]["field"], field);
    }

    #[actix_web::test]
    async fn malformed_path_id_is_bad_request() {
        let harness = TestHarness::new();
        harness.register("bob", "pw1").await;
        let app = actix_test::init_service(test_app(harness.state())).await;
        let cookie = login_cookie(&app, "bob", "pw1").await;
        let (status, body) = call_item(&app, Method::GET, "basil", cookie).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "invalid_uuid");
    }
}
