//! User profile and session DTOs for the `/user/*` endpoints.
//!
//! The backend speaks `camelCase` with a Mongo-style `_id`. Secrets are
//! never printed by the `Debug` impls in this module.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SealedCredential
// ---------------------------------------------------------------------------

/// Ciphertext form of a third-party API credential.
///
/// The backend seals the key it receives and only ever returns this form.
/// Opening it is the SDK cipher's job.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct SealedCredential(String);

impl SealedCredential {
    /// Wrap an already-sealed ciphertext string.
    pub fn new(ciphertext: impl Into<String>) -> Self {
        Self(ciphertext.into())
    }

    /// The ciphertext.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the ciphertext is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SealedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealedCredential({} bytes)", self.0.len())
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The authenticated user's profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Freshdesk subdomain (`<domain>.freshdesk.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshdesk_domain: Option<String>,
    /// Sealed Freshdesk API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshdesk_api_key: Option<SealedCredential>,
}

impl UserProfile {
    /// `"first last"`, or the email when no name is set.
    pub fn display_name(&self) -> String {
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.email.clone()
        } else {
            joined
        }
    }

    /// Apply a successful update locally so a cached profile stays in sync.
    ///
    /// The API key is sealed by the backend, so a new key is not applied
    /// here; refetch the profile to see it.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(domain) = &update.freshdesk_domain {
            self.freshdesk_domain = Some(domain.clone());
        }
    }
}

/// Body of `PUT /user/{id}`. Only the set fields are sent.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New Freshdesk subdomain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshdesk_domain: Option<String>,
    /// New Freshdesk API key in plaintext; the backend seals it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshdesk_api_key: Option<String>,
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("freshdesk_domain", &self.freshdesk_domain)
            .field(
                "freshdesk_api_key",
                &self.freshdesk_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl ProfileUpdate {
    /// `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.freshdesk_domain.is_none()
            && self.freshdesk_api_key.is_none()
    }
}

// ---------------------------------------------------------------------------
// Login / signup
// ---------------------------------------------------------------------------

/// Body of `POST /user/login`.
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /user/signup`.
#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Freshdesk subdomain.
    pub freshdesk_domain: String,
    /// Freshdesk API key in plaintext; the backend seals it.
    pub freshdesk_api_key: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("freshdesk_domain", &self.freshdesk_domain)
            .field("freshdesk_api_key", &"<redacted>")
            .finish()
    }
}

/// Response of login and signup: an opaque session token plus the profile.
#[derive(Serialize, Deserialize, Clone)]
pub struct AuthResponse {
    /// Opaque session token.
    pub tokens: String,
    /// The authenticated profile.
    pub user: UserProfile,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("tokens", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
