//! Helpdesk ticket types as served by the `/freshdesk/*` endpoints.
//!
//! Field names follow the upstream JSON (`snake_case`). Unknown fields are
//! ignored so new upstream attributes never break decoding.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// TicketId
// ---------------------------------------------------------------------------

/// Numeric identifier of a helpdesk ticket.
///
/// # Examples
///
/// ```
/// use helpdesk_models::TicketId;
///
/// let id: TicketId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Return the raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TicketId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for TicketId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| ModelError::InvalidTicketId {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// EmailAddress
// ---------------------------------------------------------------------------

/// A trimmed, non-blank email address used as the CRM correlation key.
///
/// Only the shape `local@domain` is checked; deliverability is the CRM's
/// problem.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap an email address.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidEmail {
                value: value.to_string(),
                reason: "must not be blank".into(),
            });
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(ModelError::InvalidEmail {
                value: value.to_string(),
                reason: "expected local@domain".into(),
            }),
        }
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// The person who raised a ticket, as embedded by the helpdesk.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Requester {
    /// Upstream contact id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Full display name, when the helpdesk provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Requester {
    /// Best available display name, falling back to `"Ticket Requester"`.
    pub fn display_name(&self) -> String {
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            return joined;
        }
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "Ticket Requester".to_string(),
        }
    }
}

/// A helpdesk ticket snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ticket {
    /// Ticket identifier.
    pub id: TicketId,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Numeric status code (2 open, 3 pending, 4 resolved, 5 closed).
    #[serde(default)]
    pub status: i64,
    /// Numeric priority code (1 low .. 4 urgent).
    #[serde(default)]
    pub priority: i64,
    /// Requester email, when the helpdesk flattens it onto the ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    /// Embedded requester object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<Requester>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Plain-text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
}

impl Ticket {
    /// The email used to correlate this ticket with a CRM contact.
    ///
    /// Prefers the flattened `requester_email`, then the embedded
    /// requester's email. Only an absent or blank direct value falls back;
    /// a chosen value that is not `local@domain` yields no key at all.
    pub fn correlation_email(&self) -> Option<EmailAddress> {
        let direct = self.requester_email.as_deref();
        let nested = self.requester.as_ref().and_then(|r| r.email.as_deref());
        [direct, nested]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
            .and_then(|candidate| EmailAddress::parse(candidate).ok())
    }

    /// Body to display: HTML when available, else plain text, else empty.
    pub fn body(&self) -> &str {
        self.description_html
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or_default()
    }

    /// Requester display name.
    pub fn requester_name(&self) -> String {
        self.requester
            .as_ref()
            .map_or_else(|| "Ticket Requester".to_string(), Requester::display_name)
    }
}

// ---------------------------------------------------------------------------
// ConversationEntry
// ---------------------------------------------------------------------------

/// One reply or note in a ticket's conversation thread.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConversationEntry {
    /// Upstream conversation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// `true` when the message came from the requester, `false` for agents.
    #[serde(default)]
    pub incoming: bool,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
    /// Plain-text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
}

impl ConversationEntry {
    /// Who wrote the entry, as shown above the message bubble.
    pub fn author(&self) -> &'static str {
        if self.incoming {
            "Requester"
        } else {
            "Support Agent"
        }
    }

    /// Body to display: HTML when available, else plain text, else empty.
    pub fn content(&self) -> &str {
        self.body_html
            .as_deref()
            .or(self.body.as_deref())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
