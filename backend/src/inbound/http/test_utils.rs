//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::TimeDelta;

use crate::Trace;
use crate::domain::{
    CredentialStore, DEFAULT_SESSION_TTL_MINUTES, ItemName, ItemRepository, LoginCredentials,
    Quantity, SessionAuthenticator, Username,
};
use crate::inbound::http::api_services;
use crate::inbound::http::state::HttpState;
use crate::outbound::document::InMemoryDocumentStore;
use crate::outbound::session::InMemorySessionStore;
use crate::test_support::StubHasher;

/// Session middleware for tests: fresh key, cookie named `session`, no
/// `Secure` flag so plain HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Real domain services over in-memory adapters and a fast hasher.
pub struct TestHarness {
    credentials: Arc<CredentialStore>,
    items: Arc<ItemRepository>,
    sessions: Arc<SessionAuthenticator>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let credentials = Arc::new(CredentialStore::new(
            store.clone(),
            Arc::new(StubHasher::default()),
        ));
        let sessions = Arc::new(SessionAuthenticator::new(
            credentials.clone(),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(mockable::DefaultClock),
            TimeDelta::minutes(DEFAULT_SESSION_TTL_MINUTES),
        ));
        Self {
            credentials,
            items: Arc::new(ItemRepository::new(store)),
            sessions,
        }
    }

    pub fn state(&self) -> HttpState {
        HttpState {
            registration: self.credentials.clone(),
            users: self.credentials.clone(),
            sessions: self.sessions.clone(),
            items: self.items.clone(),
            items_command: self.items.clone(),
        }
    }

    pub async fn register(&self, username: &str, password: &str) {
        let credentials =
            LoginCredentials::try_from_parts(username, password).expect("credential shape");
        self.credentials
            .register(&credentials)
            .await
            .expect("registration succeeds");
    }

    /// Add an item for an already registered user; returns its id.
    pub async fn add_item(&self, username: &str, name: &str, quantity: &str) -> String {
        let username = Username::new(username).expect("username");
        let record = self
            .credentials
            .find_by_username(&username)
            .await
            .expect("lookup")
            .expect("user registered");
        let item = self
            .items
            .add(
                record.user.id(),
                ItemName::new(name).expect("name"),
                Quantity::new(quantity),
            )
            .await
            .expect("add item");
        item.id().to_string()
    }
}

/// Full `/api/v1` surface with trace and session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(api_services),
        )
}

/// Log in through the API and return the issued session cookie.
pub async fn login_cookie<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    session_cookie(&res).expect("session cookie issued")
}
