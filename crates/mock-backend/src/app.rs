//! Router, shared state and handlers.
//!
//! Paths come from [`helpdesk_sdk::routes`] and are nested under
//! [`API_PREFIX`], so the SDK's default base URL points straight at this
//! service.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::Router;
use axum::extract::{Json, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::routing::{get, post, put};
use helpdesk_models::{
    AuthResponse, ConnectionStatus, ConversationEntry, CrmContact, EmailAddress, Integration,
    LoginRequest, ProfileUpdate, SignupRequest, Ticket, TicketId, UserProfile,
};
use helpdesk_sdk::SecretCipher;
use helpdesk_sdk::routes as paths;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::BackendError;
use crate::store::Store;

/// Every route lives under this prefix.
pub const API_PREFIX: &str = "/v1";

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: AppConfig,
    /// Seals API keys on signup and profile update.
    cipher: Box<dyn SecretCipher>,
    store: RwLock<Store>,
}

impl AppState {
    pub fn new(config: AppConfig, cipher: impl SecretCipher + 'static, store: Store) -> Self {
        Self {
            config,
            cipher: Box::new(cipher),
            store: RwLock::new(store),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(paths::LOGIN, post(login))
        .route(paths::SIGNUP, post(signup))
        .route(paths::USER, get(profile))
        .route(paths::USER_BY_ID, put(update_profile))
        .route(paths::TICKETS, get(list_tickets))
        .route(paths::TICKET, get(get_ticket))
        .route(paths::TICKET_CONVERSATIONS, get(get_conversations))
        .route(paths::HUBSPOT_STATUS, get(hubspot_status))
        .route(paths::HUBSPOT_CONTACTS, get(list_contacts))
        .route(paths::HUBSPOT_CONTACT, get(find_contact))
        .route(paths::HUBSPOT_CONNECT, get(connect_hubspot));

    Router::new().nest(API_PREFIX, api).with_state(state)
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Query of `GET /hubspot/contact`.
#[derive(Deserialize)]
struct ContactQuery {
    email: String,
}

/// Query of `GET /hubspot/connect`.
#[derive(Deserialize)]
struct ConnectQuery {
    token: String,
}

fn bearer(headers: &HeaderMap) -> Result<&str, BackendError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| BackendError::Unauthorized("missing bearer token".into()))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// `POST /user/login`
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let auth = state.write().login(&req)?;
    info!(user_id = %auth.user.id, "login");
    Ok(Json(auth))
}

/// `POST /user/signup`
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let auth = state.write().signup(req, state.cipher.as_ref())?;
    Ok((StatusCode::CREATED, Json(auth)))
}

/// `GET /user`: the stored profile, API key sealed.
async fn profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, BackendError> {
    let store = state.read();
    let user = store.authenticate(bearer(&headers)?)?;
    Ok(Json(user.profile.clone()))
}

/// `PUT /user/{id}`: only the token holder may update their own profile.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, BackendError> {
    let mut store = state.write();
    let caller = store.authenticate(bearer(&headers)?)?.profile.id.clone();
    if caller != id {
        return Err(BackendError::Unauthorized(format!(
            "cannot update user {id}"
        )));
    }
    Ok(Json(store.update_user(&id, &update, state.cipher.as_ref())?))
}

// ---------------------------------------------------------------------------
// Freshdesk
// ---------------------------------------------------------------------------

/// `GET /freshdesk/tickets`
async fn list_tickets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Ticket>>, BackendError> {
    let store = state.read();
    store
        .authenticate(bearer(&headers)?)?
        .require(Integration::Freshdesk)?;
    Ok(Json(store.tickets()))
}

/// `GET /freshdesk/tickets/{id}`
async fn get_ticket(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Ticket>, BackendError> {
    let store = state.read();
    store
        .authenticate(bearer(&headers)?)?
        .require(Integration::Freshdesk)?;
    let id = TicketId::new(id);
    store
        .ticket(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| BackendError::NotFound(format!("ticket {id}")))
}

/// `GET /freshdesk/tickets/{id}/conversations`
async fn get_conversations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Vec<ConversationEntry>>, BackendError> {
    let store = state.read();
    store
        .authenticate(bearer(&headers)?)?
        .require(Integration::Freshdesk)?;
    let id = TicketId::new(id);
    store
        .conversations(id)
        .map(|thread| Json(thread.to_vec()))
        .ok_or_else(|| BackendError::NotFound(format!("ticket {id}")))
}

// ---------------------------------------------------------------------------
// HubSpot
// ---------------------------------------------------------------------------

/// `GET /hubspot/status`: never 400, this is how clients detect linkage.
async fn hubspot_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ConnectionStatus>, BackendError> {
    let store = state.read();
    let user = store.authenticate(bearer(&headers)?)?;
    Ok(Json(ConnectionStatus {
        connected: user.hubspot_linked,
    }))
}

/// `GET /hubspot/contacts`
async fn list_contacts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<CrmContact>>, BackendError> {
    let store = state.read();
    store
        .authenticate(bearer(&headers)?)?
        .require(Integration::HubSpot)?;
    Ok(Json(store.contacts().to_vec()))
}

/// `GET /hubspot/contact?email=`: 404 when nobody matches.
async fn find_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ContactQuery>,
) -> Result<Json<CrmContact>, BackendError> {
    let store = state.read();
    store
        .authenticate(bearer(&headers)?)?
        .require(Integration::HubSpot)?;
    let email = EmailAddress::parse(&query.email)
        .map_err(|e| BackendError::BadRequest(e.to_string()))?;
    debug!("contact lookup");
    store
        .find_contact(email.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| BackendError::NotFound("contact".into()))
}

/// `GET /hubspot/connect?token=`: link the CRM and send the browser back.
async fn connect_hubspot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Redirect, BackendError> {
    state.write().link_hubspot(&query.token)?;
    let target = format!(
        "{}/?hubspot=connected",
        state.config.app_url.trim_end_matches('/')
    );
    Ok(Redirect::to(&target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use helpdesk_sdk::{
        BackendClient, Enricher, ExposeSecret, PassphraseCipher, SdkConfig, reveal_or_empty,
    };
    use serde_json::{Value, json};

    use crate::store::{DEMO_API_KEY, DEMO_EMAIL, DEMO_PASSWORD};

    fn state() -> Arc<AppState> {
        let config = AppConfig::from_lookup(|_| None);
        let cipher = PassphraseCipher::with_default_passphrase();
        let store = Store::seeded(&cipher);
        Arc::new(AppState::new(config, cipher, store))
    }

    fn server() -> TestServer {
        TestServer::new(router(state())).unwrap()
    }

    async fn login(server: &TestServer) -> AuthResponse {
        let res = server
            .post("/v1/user/login")
            .json(&json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }))
            .await;
        res.assert_status_ok();
        res.json::<AuthResponse>()
    }

    async fn link_hubspot(server: &TestServer, token: &str) {
        server
            .get("/v1/hubspot/connect")
            .add_query_param("token", token)
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    // -- users -------------------------------------------------------------

    #[tokio::test]
    async fn login_returns_token_and_sealed_profile() {
        let server = server();
        let auth = login(&server).await;

        assert!(!auth.tokens.is_empty());
        let sealed = auth.user.freshdesk_api_key.unwrap();
        let cipher = PassphraseCipher::with_default_passphrase();
        assert_eq!(cipher.reveal(&sealed).unwrap().expose_secret(), DEMO_API_KEY);
    }

    #[tokio::test]
    async fn bad_password_is_401_with_error_body() {
        let res = server()
            .post("/v1/user/login")
            .json(&json!({ "email": DEMO_EMAIL, "password": "nope" }))
            .await;

        res.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(res.json::<Value>()["error"], "invalid credentials");
    }

    #[tokio::test]
    async fn signup_seals_key_then_rejects_duplicate() {
        let server = server();
        let body = json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@navy.mil",
            "password": "cobol",
            "freshdeskDomain": "navy",
            "freshdeskApiKey": "navy-fd-key"
        });

        let res = server.post("/v1/user/signup").json(&body).await;
        res.assert_status(StatusCode::CREATED);
        let auth = res.json::<AuthResponse>();
        let sealed = auth.user.freshdesk_api_key.unwrap();
        assert!(sealed.as_str().starts_with("U2FsdGVkX1"));
        let cipher = PassphraseCipher::with_default_passphrase();
        assert_eq!(cipher.reveal(&sealed).unwrap().expose_secret(), "navy-fd-key");

        server
            .post("/v1/user/signup")
            .json(&body)
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn profile_requires_a_valid_token() {
        let server = server();
        server.get("/v1/user").await.assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/v1/user")
            .authorization_bearer("made-up")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let auth = login(&server).await;
        let profile = server
            .get("/v1/user")
            .authorization_bearer(&auth.tokens)
            .await
            .json::<UserProfile>();
        assert_eq!(profile, auth.user);
    }

    #[tokio::test]
    async fn update_profile_is_owner_only() {
        let server = server();
        let auth = login(&server).await;

        server
            .put("/v1/user/someone-else")
            .authorization_bearer(&auth.tokens)
            .json(&json!({ "firstName": "Mallory" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let res = server
            .put(&format!("/v1/user/{}", auth.user.id))
            .authorization_bearer(&auth.tokens)
            .json(&json!({ "firstName": "Renamed", "freshdeskApiKey": "rotated-key" }))
            .await;
        res.assert_status_ok();

        let profile = server
            .get("/v1/user")
            .authorization_bearer(&auth.tokens)
            .await
            .json::<UserProfile>();
        assert_eq!(profile.first_name.as_deref(), Some("Renamed"));
        assert_eq!(profile.last_name.as_deref(), Some("Agent"));
        let cipher = PassphraseCipher::with_default_passphrase();
        let key = reveal_or_empty(&cipher, profile.freshdesk_api_key.as_ref());
        assert_eq!(key.expose_secret(), "rotated-key");
    }

    // -- freshdesk ---------------------------------------------------------

    #[tokio::test]
    async fn tickets_and_threads() {
        let server = server();
        let token = login(&server).await.tokens;

        let tickets = server
            .get("/v1/freshdesk/tickets")
            .authorization_bearer(&token)
            .await
            .json::<Vec<Ticket>>();
        assert_eq!(tickets.len(), 3);

        let ticket = server
            .get("/v1/freshdesk/tickets/1001")
            .authorization_bearer(&token)
            .await
            .json::<Ticket>();
        assert_eq!(ticket.subject, "Cannot export monthly invoices");

        let thread = server
            .get("/v1/freshdesk/tickets/1001/conversations")
            .authorization_bearer(&token)
            .await
            .json::<Vec<ConversationEntry>>();
        assert_eq!(thread.len(), 3);
        assert!(thread[0].incoming);

        server
            .get("/v1/freshdesk/tickets/9999")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn freshdesk_without_settings_is_400() {
        let server = server();
        let auth = login(&server).await;
        server
            .put(&format!("/v1/user/{}", auth.user.id))
            .authorization_bearer(&auth.tokens)
            .json(&json!({ "freshdeskDomain": "" }))
            .await
            .assert_status_ok();

        let res = server
            .get("/v1/freshdesk/tickets")
            .authorization_bearer(&auth.tokens)
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(res.json::<Value>()["error"], "Freshdesk is not configured");
    }

    // -- hubspot -----------------------------------------------------------

    #[tokio::test]
    async fn hubspot_is_gated_until_connected() {
        let server = server();
        let token = login(&server).await.tokens;

        let status = server
            .get("/v1/hubspot/status")
            .authorization_bearer(&token)
            .await
            .json::<ConnectionStatus>();
        assert!(!status.connected);
        server
            .get("/v1/hubspot/contacts")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        link_hubspot(&server, &token).await;

        let status = server
            .get("/v1/hubspot/status")
            .authorization_bearer(&token)
            .await
            .json::<ConnectionStatus>();
        assert!(status.connected);
        let contacts = server
            .get("/v1/hubspot/contacts")
            .authorization_bearer(&token)
            .await
            .json::<Vec<CrmContact>>();
        assert_eq!(contacts.len(), 3);
    }

    #[tokio::test]
    async fn connect_redirects_to_the_app() {
        let server = server();
        let token = login(&server).await.tokens;

        let res = server
            .get("/v1/hubspot/connect")
            .add_query_param("token", &token)
            .await;
        res.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            res.header("location"),
            "http://localhost:5173/?hubspot=connected"
        );

        server
            .get("/v1/hubspot/connect")
            .add_query_param("token", "forged")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn contact_lookup_by_email() {
        let server = server();
        let token = login(&server).await.tokens;
        link_hubspot(&server, &token).await;

        let contact = server
            .get("/v1/hubspot/contact")
            .authorization_bearer(&token)
            .add_query_param("email", "ADA@analytical.io")
            .await
            .json::<CrmContact>();
        assert_eq!(contact.id, "501");
        assert_eq!(contact.lifecycle(), "Customer");

        server
            .get("/v1/hubspot/contact")
            .authorization_bearer(&token)
            .add_query_param("email", "nobody@example.com")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    // -- end to end ---------------------------------------------------------

    #[tokio::test]
    async fn sdk_round_trip_over_http() {
        let state = state();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::clone(&state));
        tokio::spawn(async move { axum::serve(listener, app).await });

        let config = SdkConfig::default().with_api_url(format!("http://{addr}{API_PREFIX}"));
        let client = BackendClient::new(&config).unwrap();
        let session = client.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        let api = client.authenticated(&session);
        let enricher = Enricher::new(api.freshdesk(), api.hubspot());

        let view = enricher.enrich(TicketId::new(1001)).await.unwrap();
        assert_eq!(view.conversations.len(), 3);
        assert!(view.contact.is_none(), "unlinked CRM degrades to no contact");

        state.write().link_hubspot(&session.token).unwrap();
        let view = enricher.enrich(TicketId::new(1002)).await.unwrap();
        assert_eq!(view.contact.unwrap().full_name(), "Grace Hopper");

        let profile = api.profile().await.unwrap();
        let cipher = config.cipher().unwrap();
        let key = reveal_or_empty(&cipher, profile.freshdesk_api_key.as_ref());
        assert_eq!(key.expose_secret(), DEMO_API_KEY);
    }
}
