//! HTTP client for the helpdesk backend.
//!
//! [`BackendClient`] owns the connection pool, the route table and the
//! optional session token. The user/session endpoints live here; the
//! Freshdesk and HubSpot adapters borrow a clone of it.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use helpdesk_sdk::{BackendClient, SdkConfig, TicketingAdapter};
//!
//! # async fn run() -> Result<(), helpdesk_sdk::SdkError> {
//! let client = BackendClient::new(&SdkConfig::from_env())?;
//! let session = client.login("agent@acme.io", "password").await?;
//!
//! let tickets = client.authenticated(&session).freshdesk().list_tickets().await?;
//! println!("{} tickets", tickets.len());
//! # Ok(())
//! # }
//! ```

use helpdesk_models::{
    AuthResponse, Integration, LoginRequest, ProfileUpdate, SignupRequest, UserProfile,
};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::SdkConfig;
use crate::crm::HubSpotAdapter;
use crate::error::{error_message, SdkError};
use crate::routes::Routes;
use crate::session::Session;
use crate::ticketing::FreshdeskAdapter;

/// Client for the backend REST surface.
///
/// Cheap to clone: clones share the underlying connection pool.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    routes: Routes,
    token: Option<String>,
}

impl BackendClient {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Build an unauthenticated client from configuration.
    pub fn new(config: &SdkConfig) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_http(http, &config.api_url))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, api_url: &str) -> Self {
        Self {
            http,
            routes: Routes::new(api_url),
            token: None,
        }
    }

    /// A copy of this client that sends `session`'s bearer token.
    #[must_use]
    pub fn authenticated(&self, session: &Session) -> Self {
        Self {
            http: self.http.clone(),
            routes: self.routes.clone(),
            token: Some(session.token.clone()),
        }
    }

    /// The route table.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// `true` once a session token is attached.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Ticketing adapter sharing this client.
    pub fn freshdesk(&self) -> FreshdeskAdapter {
        FreshdeskAdapter::new(self.clone())
    }

    /// CRM adapter sharing this client.
    pub fn hubspot(&self) -> HubSpotAdapter {
        HubSpotAdapter::new(self.clone())
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// `POST /user/login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SdkError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res = self.http.post(self.routes.login()).json(&body).send().await?;
        let auth: AuthResponse = decode_auth(res).await?;
        info!(user_id = %auth.user.id, "logged in");
        Ok(auth.into())
    }

    /// `POST /user/signup`. The backend seals the API key it receives.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Session, SdkError> {
        let res = self
            .http
            .post(self.routes.signup())
            .json(request)
            .send()
            .await?;
        let auth: AuthResponse = decode_auth(res).await?;
        info!(user_id = %auth.user.id, "account created");
        Ok(auth.into())
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// `GET /user`: the profile with its sealed credential.
    pub async fn profile(&self) -> Result<UserProfile, SdkError> {
        self.get_json(&self.routes.user(), None).await
    }

    /// `PUT /user/{id}`. The backend seals any API key in `update`.
    ///
    /// The response body is not relied upon; apply the update locally with
    /// [`UserProfile::apply`].
    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<(), SdkError> {
        let req = self.http.put(self.routes.user_by_id(id)).json(update);
        let res = self.authorize(req)?.send().await?;
        check_status(res, None).await?;
        info!(user_id = %id, "profile updated");
        Ok(())
    }

    /// URL that starts CRM linking. Open it by full navigation.
    pub fn hubspot_connect_url(&self) -> Result<String, SdkError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SdkError::Config("login required to connect HubSpot".into()))?;
        self.routes.hubspot_connect(token)
    }

    // ------------------------------------------------------------------
    // Plumbing shared with the adapters
    // ------------------------------------------------------------------

    /// Authenticated `GET` decoding a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        integration: Option<Integration>,
    ) -> Result<T, SdkError> {
        self.get_json_with_query(url, &[], integration).await
    }

    /// Authenticated `GET` with query parameters, decoding a JSON body.
    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        integration: Option<Integration>,
    ) -> Result<T, SdkError> {
        debug!(%url, "GET");
        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let res = self.authorize(req)?.send().await?;
        let res = check_status(res, integration).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, SdkError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SdkError::Config("not logged in".into()))?;
        Ok(req.bearer_auth(token))
    }
}

/// Pass 2xx responses through; turn anything else into an [`SdkError`].
async fn check_status(res: Response, integration: Option<Integration>) -> Result<Response, SdkError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "backend returned an error status");
    Err(SdkError::from_status(
        status.as_u16(),
        error_message(&body),
        integration,
    ))
}

/// Login and signup report every rejection as [`SdkError::Auth`].
async fn decode_auth(res: Response) -> Result<AuthResponse, SdkError> {
    let status = res.status();
    if status.is_client_error() {
        let text = res.text().await.unwrap_or_default();
        return Err(SdkError::Auth(error_message(&text)));
    }
    let res = check_status(res, None).await?;
    let bytes = res.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
