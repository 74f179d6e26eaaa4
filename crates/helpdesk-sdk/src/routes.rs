//! Canonical backend REST paths.
//!
//! Every path used by the SDK and by the mock backend comes from this
//! module, so the client and the server agree on one route table.
//!
//! # Route layout
//!
//! ```text
//! POST /user/login                          ← session token + profile
//! POST /user/signup                         ← session token + profile
//! GET  /user                                ← profile (sealed credential)
//! PUT  /user/{id}                           ← profile update
//! GET  /freshdesk/tickets                   ← ticket list
//! GET  /freshdesk/tickets/{id}              ← ticket detail
//! GET  /freshdesk/tickets/{id}/conversations
//! GET  /hubspot/status                      ← { connected }
//! GET  /hubspot/contacts                    ← contact list
//! GET  /hubspot/contact?email=              ← contact lookup
//! GET  /hubspot/connect?token=              ← browser hand-off, never fetched
//! ```
//!
//! Templates use axum's `{param}` capture syntax.

use std::fmt;

use helpdesk_models::TicketId;
use reqwest::Url;

use crate::error::SdkError;

/// `POST` login.
pub const LOGIN: &str = "/user/login";
/// `POST` signup.
pub const SIGNUP: &str = "/user/signup";
/// `GET` current profile.
pub const USER: &str = "/user";
/// `PUT` profile update.
pub const USER_BY_ID: &str = "/user/{id}";
/// `GET` ticket list.
pub const TICKETS: &str = "/freshdesk/tickets";
/// `GET` ticket detail.
pub const TICKET: &str = "/freshdesk/tickets/{id}";
/// `GET` ticket conversation thread.
pub const TICKET_CONVERSATIONS: &str = "/freshdesk/tickets/{id}/conversations";
/// `GET` CRM connection status.
pub const HUBSPOT_STATUS: &str = "/hubspot/status";
/// `GET` CRM contact list.
pub const HUBSPOT_CONTACTS: &str = "/hubspot/contacts";
/// `GET` CRM contact lookup (`?email=`).
pub const HUBSPOT_CONTACT: &str = "/hubspot/contact";
/// CRM linking hand-off (`?token=`).
pub const HUBSPOT_CONNECT: &str = "/hubspot/connect";

/// Absolute URLs for one backend base URL.
///
/// # Examples
///
/// ```
/// use helpdesk_models::TicketId;
/// use helpdesk_sdk::Routes;
///
/// let routes = Routes::new("http://localhost:7005/v1/");
/// assert_eq!(
///     routes.ticket_conversations(TicketId::new(42)),
///     "http://localhost:7005/v1/freshdesk/tickets/42/conversations",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base: String,
}

impl Routes {
    /// Build the table for `base_url` (a trailing `/` is ignored).
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The normalised base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn join(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    // ------------------------------------------------------------------
    // User
    // ------------------------------------------------------------------

    /// Login URL.
    pub fn login(&self) -> String {
        self.join(LOGIN)
    }

    /// Signup URL.
    pub fn signup(&self) -> String {
        self.join(SIGNUP)
    }

    /// Current-profile URL.
    pub fn user(&self) -> String {
        self.join(USER)
    }

    /// Profile-update URL for `id`.
    pub fn user_by_id(&self, id: &str) -> String {
        self.join(&USER_BY_ID.replace("{id}", id))
    }

    // ------------------------------------------------------------------
    // Freshdesk
    // ------------------------------------------------------------------

    /// Ticket list URL.
    pub fn tickets(&self) -> String {
        self.join(TICKETS)
    }

    /// Ticket detail URL.
    pub fn ticket(&self, id: TicketId) -> String {
        self.join(&TICKET.replace("{id}", &id.to_string()))
    }

    /// Ticket conversations URL.
    pub fn ticket_conversations(&self, id: TicketId) -> String {
        self.join(&TICKET_CONVERSATIONS.replace("{id}", &id.to_string()))
    }

    // ------------------------------------------------------------------
    // HubSpot
    // ------------------------------------------------------------------

    /// CRM status URL.
    pub fn hubspot_status(&self) -> String {
        self.join(HUBSPOT_STATUS)
    }

    /// CRM contact list URL.
    pub fn hubspot_contacts(&self) -> String {
        self.join(HUBSPOT_CONTACTS)
    }

    /// CRM contact lookup URL, without the `email` query.
    pub fn hubspot_contact(&self) -> String {
        self.join(HUBSPOT_CONTACT)
    }

    /// CRM linking hand-off URL carrying the session token.
    ///
    /// This must be opened by full navigation (a browser), not fetched.
    pub fn hubspot_connect(&self, token: &str) -> Result<String, SdkError> {
        Url::parse_with_params(&self.join(HUBSPOT_CONNECT), &[("token", token)])
            .map(String::from)
            .map_err(|e| SdkError::Config(format!("invalid backend URL {}: {e}", self.base)))
    }
}

impl fmt::Display for Routes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
