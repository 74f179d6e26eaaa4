//! In-memory users, sessions, tickets and contacts.
//!
//! The store is seeded with one demo account plus a handful of tickets and
//! CRM contacts that correlate with them by requester email. API keys
//! arrive in plaintext and are sealed before they are stored.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use helpdesk_models::{
    AuthResponse, ContactProperties, ConversationEntry, CrmContact, Integration, LoginRequest,
    ProfileUpdate, Requester, SealedCredential, SignupRequest, Ticket, TicketId, UserProfile,
};
use helpdesk_sdk::SecretCipher;
use tracing::info;
use uuid::Uuid;

use crate::error::BackendError;

/// Demo account email.
pub const DEMO_EMAIL: &str = "demo@helpdesk.test";
/// Demo account password.
pub const DEMO_PASSWORD: &str = "demo";
/// Plaintext of the demo account's Freshdesk key.
pub const DEMO_API_KEY: &str = "demo-freshdesk-key";

/// 2024-03-01T10:00:00Z
const SEED_EPOCH: i64 = 1_709_287_200;

/// A registered user.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub profile: UserProfile,
    password: String,
    pub hubspot_linked: bool,
}

impl UserRecord {
    /// Freshdesk calls need both a domain and a stored key.
    pub fn freshdesk_ready(&self) -> bool {
        let domain = self.profile.freshdesk_domain.as_deref().unwrap_or_default();
        let key_set = self
            .profile
            .freshdesk_api_key
            .as_ref()
            .is_some_and(|key| !key.is_empty());
        !domain.trim().is_empty() && key_set
    }

    pub fn require(&self, integration: Integration) -> Result<(), BackendError> {
        let ready = match integration {
            Integration::Freshdesk => self.freshdesk_ready(),
            Integration::HubSpot => self.hubspot_linked,
        };
        if ready {
            Ok(())
        } else {
            Err(BackendError::NotConfigured(integration))
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<String, UserRecord>,
    /// token → user id
    sessions: HashMap<String, String>,
    tickets: BTreeMap<TicketId, Ticket>,
    conversations: HashMap<TicketId, Vec<ConversationEntry>>,
    contacts: Vec<CrmContact>,
}

impl Store {
    /// The demo dataset. The demo key is sealed with `cipher`.
    pub fn seeded(cipher: &dyn SecretCipher) -> Self {
        let mut store = Self::default();

        let demo = UserProfile {
            id: "demo-user".to_string(),
            email: DEMO_EMAIL.to_string(),
            first_name: Some("Demo".to_string()),
            last_name: Some("Agent".to_string()),
            freshdesk_domain: Some("demo".to_string()),
            freshdesk_api_key: Some(cipher.protect(DEMO_API_KEY)),
        };
        store.users.insert(
            demo.id.clone(),
            UserRecord {
                profile: demo,
                password: DEMO_PASSWORD.to_string(),
                hubspot_linked: false,
            },
        );

        for (ticket, thread) in seed_tickets() {
            store.conversations.insert(ticket.id, thread);
            store.tickets.insert(ticket.id, ticket);
        }
        store.contacts = seed_contacts();
        store
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    pub fn signup(
        &mut self,
        request: SignupRequest,
        cipher: &dyn SecretCipher,
    ) -> Result<AuthResponse, BackendError> {
        let email = request.email.trim().to_string();
        if email.is_empty() || request.password.is_empty() {
            return Err(BackendError::BadRequest(
                "email and password are required".into(),
            ));
        }
        if self.user_by_email(&email).is_some() {
            return Err(BackendError::Conflict(format!("{email} is already registered")));
        }

        let profile = UserProfile {
            id: Uuid::new_v4().to_string(),
            email,
            first_name: Some(request.first_name),
            last_name: Some(request.last_name),
            freshdesk_domain: Some(request.freshdesk_domain),
            freshdesk_api_key: seal(cipher, &request.freshdesk_api_key),
        };
        info!(user_id = %profile.id, "user registered");
        self.users.insert(
            profile.id.clone(),
            UserRecord {
                profile: profile.clone(),
                password: request.password,
                hubspot_linked: false,
            },
        );
        Ok(self.open_session(profile))
    }

    pub fn login(&mut self, request: &LoginRequest) -> Result<AuthResponse, BackendError> {
        let user = self
            .user_by_email(request.email.trim())
            .filter(|user| user.password == request.password)
            .ok_or(BackendError::InvalidCredentials)?;
        let profile = user.profile.clone();
        Ok(self.open_session(profile))
    }

    /// The user holding `token`.
    pub fn authenticate(&self, token: &str) -> Result<&UserRecord, BackendError> {
        self.sessions
            .get(token)
            .and_then(|id| self.users.get(id))
            .ok_or_else(|| BackendError::Unauthorized("unknown or expired token".into()))
    }

    pub fn update_user(
        &mut self,
        id: &str,
        update: &ProfileUpdate,
        cipher: &dyn SecretCipher,
    ) -> Result<UserProfile, BackendError> {
        let user = self
            .users
            .get_mut(id)
            .ok_or_else(|| BackendError::NotFound(format!("user {id}")))?;
        user.profile.apply(update);
        if let Some(key) = &update.freshdesk_api_key {
            user.profile.freshdesk_api_key = seal(cipher, key);
        }
        info!(user_id = %id, "profile updated");
        Ok(user.profile.clone())
    }

    /// Mark the token holder's CRM as linked.
    pub fn link_hubspot(&mut self, token: &str) -> Result<(), BackendError> {
        let id = self.authenticate(token)?.profile.id.clone();
        if let Some(user) = self.users.get_mut(&id) {
            user.hubspot_linked = true;
        }
        info!(user_id = %id, "HubSpot linked");
        Ok(())
    }

    fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|user| user.profile.email.eq_ignore_ascii_case(email))
    }

    fn open_session(&mut self, user: UserProfile) -> AuthResponse {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), user.id.clone());
        AuthResponse {
            tokens: token,
            user,
        }
    }

    // ------------------------------------------------------------------
    // Freshdesk
    // ------------------------------------------------------------------

    pub fn tickets(&self) -> Vec<Ticket> {
        self.tickets.values().cloned().collect()
    }

    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    pub fn conversations(&self, id: TicketId) -> Option<&[ConversationEntry]> {
        self.conversations.get(&id).map(Vec::as_slice)
    }

    // ------------------------------------------------------------------
    // HubSpot
    // ------------------------------------------------------------------

    pub fn contacts(&self) -> &[CrmContact] {
        &self.contacts
    }

    /// Case-insensitive match on the contact's primary email.
    pub fn find_contact(&self, email: &str) -> Option<&CrmContact> {
        let email = email.trim();
        self.contacts.iter().find(|contact| {
            contact
                .properties
                .email
                .as_deref()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(email))
        })
    }
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(SEED_EPOCH, 0).unwrap_or_default() + Duration::minutes(minutes)
}

fn entry(id: u64, incoming: bool, minutes: i64, body: &str) -> ConversationEntry {
    ConversationEntry {
        id: Some(id),
        incoming,
        created_at: at(minutes),
        body: Some(body.to_string()),
        body_html: Some(format!("<p>{body}</p>")),
    }
}

fn seed_tickets() -> Vec<(Ticket, Vec<ConversationEntry>)> {
    vec![
        (
            Ticket {
                id: TicketId::new(1001),
                subject: "Cannot export monthly invoices".to_string(),
                status: 2,
                priority: 3,
                requester_email: Some("ada@analytical.io".to_string()),
                requester: Some(Requester {
                    id: Some(501),
                    name: Some("Ada Lovelace".to_string()),
                    email: Some("ada@analytical.io".to_string()),
                    ..Requester::default()
                }),
                created_at: at(0),
                description: Some("The export button spins forever.".to_string()),
                description_html: Some("<p>The export button <b>spins forever</b>.</p>".to_string()),
            },
            vec![
                entry(1, true, 5, "Any update on this?"),
                entry(2, false, 20, "We are looking into it."),
                entry(3, true, 45, "Thanks, it is blocking our month-end."),
            ],
        ),
        (
            Ticket {
                id: TicketId::new(1002),
                subject: "Password reset email never arrives".to_string(),
                status: 3,
                priority: 2,
                requester_email: None,
                requester: Some(Requester {
                    id: Some(502),
                    first_name: Some("Grace".to_string()),
                    last_name: Some("Hopper".to_string()),
                    email: Some("grace@navy.mil".to_string()),
                    ..Requester::default()
                }),
                created_at: at(90),
                description: Some("Tried three times, nothing in spam either.".to_string()),
                description_html: None,
            },
            vec![entry(4, false, 100, "Could you confirm the address you used?")],
        ),
        (
            Ticket {
                id: TicketId::new(1003),
                subject: "Feature request: dark mode".to_string(),
                status: 5,
                priority: 1,
                requester_email: Some("anon@example.org".to_string()),
                requester: None,
                created_at: at(240),
                description: None,
                description_html: Some("<p>Please add a dark theme.</p>".to_string()),
            },
            Vec::new(),
        ),
    ]
}

fn seed_contacts() -> Vec<CrmContact> {
    let contact = |id: &str, first: &str, last: &str, email: &str, company: Option<&str>, stage: &str| {
        CrmContact {
            id: id.to_string(),
            properties: ContactProperties {
                email: Some(email.to_string()),
                firstname: Some(first.to_string()),
                lastname: Some(last.to_string()),
                company: company.map(str::to_string),
                lifecyclestage: Some(stage.to_string()),
                ..ContactProperties::default()
            },
        }
    };
    vec![
        contact("501", "Ada", "Lovelace", "ada@analytical.io", Some("Analytical Engines"), "customer"),
        contact("502", "Grace", "Hopper", "grace@navy.mil", None, "salesqualifiedlead"),
        contact("503", "Alan", "Turing", "alan@bletchley.uk", Some("GC&CS"), "1234567"),
    ]
}

/// Seal a plaintext API key; a blank key clears the stored one.
fn seal(cipher: &dyn SecretCipher, key: &str) -> Option<SealedCredential> {
    let key = key.trim();
    (!key.is_empty()).then(|| cipher.protect(key))
}
