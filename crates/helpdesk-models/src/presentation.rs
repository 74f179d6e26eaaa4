//! Display mapping for numeric ticket codes and CRM lifecycle stages.
//!
//! Every function here is total: unrecognised codes map to an explicit
//! fallback entry so new upstream codes never break rendering.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ColorToken / Label
// ---------------------------------------------------------------------------

/// A semantic colour token; front ends map it to their own palette.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorToken {
    /// Neutral styling.
    Default,
    /// Informational.
    Blue,
    /// Waiting / attention.
    Orange,
    /// Done / positive.
    Green,
    /// Inactive.
    Gray,
    /// Mild emphasis.
    Cyan,
    /// Strong emphasis.
    Red,
    /// Highest emphasis.
    Magenta,
}

/// A display label paired with its colour token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    /// Human-readable text.
    pub text: &'static str,
    /// Semantic colour.
    pub color: ColorToken,
}

impl Label {
    const fn new(text: &'static str, color: ColorToken) -> Self {
        Self { text, color }
    }

    /// Upper-cased text, as rendered in table badges.
    pub fn badge(&self) -> String {
        self.text.to_uppercase()
    }
}

/// Label used for status codes outside the known table.
pub const UNKNOWN_STATUS: Label = Label::new("Unknown", ColorToken::Default);

/// Label used for priority codes outside the known table.
pub const NORMAL_PRIORITY: Label = Label::new("Normal", ColorToken::Default);

// ---------------------------------------------------------------------------
// Ticket status
// ---------------------------------------------------------------------------

/// Known helpdesk ticket statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum TicketStatus {
    /// Code 2.
    Open,
    /// Code 3.
    Pending,
    /// Code 4.
    Resolved,
    /// Code 5.
    Closed,
}

impl TicketStatus {
    /// Map an upstream status code, `None` when unrecognised.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            2 => Some(Self::Open),
            3 => Some(Self::Pending),
            4 => Some(Self::Resolved),
            5 => Some(Self::Closed),
            _ => None,
        }
    }

    /// The upstream numeric code.
    pub fn code(self) -> i64 {
        match self {
            Self::Open => 2,
            Self::Pending => 3,
            Self::Resolved => 4,
            Self::Closed => 5,
        }
    }

    /// Display label.
    pub fn label(self) -> Label {
        match self {
            Self::Open => Label::new("Open", ColorToken::Blue),
            Self::Pending => Label::new("Pending", ColorToken::Orange),
            Self::Resolved => Label::new("Resolved", ColorToken::Green),
            Self::Closed => Label::new("Closed", ColorToken::Gray),
        }
    }
}

/// Label for a ticket status code; [`UNKNOWN_STATUS`] when unrecognised.
///
/// ```
/// use helpdesk_models::{status_label, ColorToken};
///
/// assert_eq!(status_label(4).text, "Resolved");
/// assert_eq!(status_label(4).color, ColorToken::Green);
/// assert_eq!(status_label(999).text, "Unknown");
/// ```
pub fn status_label(code: i64) -> Label {
    TicketStatus::from_code(code).map_or(UNKNOWN_STATUS, TicketStatus::label)
}

// ---------------------------------------------------------------------------
// Ticket priority
// ---------------------------------------------------------------------------

/// Known helpdesk ticket priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
pub enum TicketPriority {
    /// Code 1.
    Low,
    /// Code 2.
    Medium,
    /// Code 3.
    High,
    /// Code 4.
    Urgent,
}

impl TicketPriority {
    /// Map an upstream priority code, `None` when unrecognised.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Urgent),
            _ => None,
        }
    }

    /// The upstream numeric code.
    pub fn code(self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    /// Display label.
    pub fn label(self) -> Label {
        match self {
            Self::Low => Label::new("Low", ColorToken::Default),
            Self::Medium => Label::new("Medium", ColorToken::Cyan),
            Self::High => Label::new("High", ColorToken::Red),
            Self::Urgent => Label::new("Urgent", ColorToken::Magenta),
        }
    }
}

/// Label for a ticket priority code; [`NORMAL_PRIORITY`] when unrecognised.
pub fn priority_label(code: i64) -> Label {
    TicketPriority::from_code(code).map_or(NORMAL_PRIORITY, TicketPriority::label)
}

// ---------------------------------------------------------------------------
// CRM lifecycle stage
// ---------------------------------------------------------------------------

/// Default HubSpot lifecycle stages, keyed by their internal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LifecycleStage {
    /// `subscriber`
    Subscriber,
    /// `lead`
    Lead,
    /// `marketingqualifiedlead`
    MarketingQualifiedLead,
    /// `salesqualifiedlead`
    SalesQualifiedLead,
    /// `opportunity`
    Opportunity,
    /// `customer`
    Customer,
    /// `evangelist`
    Evangelist,
    /// `other`
    Other,
}

impl LifecycleStage {
    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Subscriber => "Subscriber",
            Self::Lead => "Lead",
            Self::MarketingQualifiedLead => "Marketing Qualified Lead",
            Self::SalesQualifiedLead => "Sales Qualified Lead",
            Self::Opportunity => "Opportunity",
            Self::Customer => "Customer",
            Self::Evangelist => "Evangelist",
            Self::Other => "Other",
        }
    }
}

/// Label for a lifecycle stage value.
///
/// Absent or blank stages read `"Prospect"`; values outside the default
/// stage set (custom stages carry numeric ids) read `"Unknown"`.
pub fn lifecycle_label(code: Option<&str>) -> &'static str {
    match code.map(str::trim) {
        None | Some("") => "Prospect",
        Some(raw) => LifecycleStage::from_str(raw).map_or("Unknown", LifecycleStage::label),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
