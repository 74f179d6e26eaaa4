//! The authenticated identity, passed explicitly to whoever needs it.

use std::fmt;

use helpdesk_models::{AuthResponse, UserProfile};
use serde::{Deserialize, Serialize};

/// Session obtained from login or signup.
///
/// * `token` – opaque bearer token for every authenticated call.
/// * `user`  – the profile as returned at login, kept in sync locally
///   after profile updates.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// Authenticated profile.
    pub user: UserProfile,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            token: auth.tokens,
            user: auth.user,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_auth_response_and_redacted_debug() {
        let auth: AuthResponse = serde_json::from_str(
            r#"{"tokens":"tok-123","user":{"_id":"u1","email":"a@b.com"}}"#,
        )
        .unwrap();
        let session = Session::from(auth);
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.user.id, "u1");
        assert!(!format!("{session:?}").contains("tok-123"));
    }
}
