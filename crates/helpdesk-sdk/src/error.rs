//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. Callers branch on it to tell a missing
//! integration (render a setup prompt) from a broken transport (render a
//! retry affordance).

use helpdesk_models::Integration;

use crate::cipher::CipherError;

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. bad URL, missing session).
    #[error("configuration error: {0}")]
    Config(String),

    /// Login or signup was rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend answered 400 for an integration endpoint: the user has
    /// not linked or configured that integration yet.
    #[error("{integration} is not configured for this user")]
    NotConfigured {
        /// The integration that still needs setup.
        integration: Integration,
    },

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-2xx answer from the backend.
    #[error("backend returned {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        body: String,
    },

    /// Network-level HTTP failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization / deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A sealed credential could not be opened.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// Map a non-2xx status to the matching variant.
    ///
    /// `integration` is set for `/freshdesk/*` and `/hubspot/*` calls, where
    /// a 400 means "not configured" rather than a malformed request.
    pub fn from_status(status: u16, body: String, integration: Option<Integration>) -> Self {
        match (status, integration) {
            (400, Some(integration)) => Self::NotConfigured { integration },
            (404, _) => Self::NotFound(body),
            _ => Self::Upstream { status, body },
        }
    }

    /// The upstream HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotConfigured { .. } => Some(400),
            Self::NotFound(_) => Some(404),
            Self::Upstream { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `true` for "integration not configured".
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured { .. })
    }

    /// `true` for "record does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// `true` for network failures, unexpected statuses and undecodable
    /// bodies: the errors a manual retry may fix.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Upstream { .. } | Self::Serialization(_)
        )
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers `{"error": "..."}` or `{"message": "..."}`; anything
/// else is returned as-is.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
