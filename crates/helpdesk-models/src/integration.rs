//! Third-party integrations a user profile can be linked to.

use serde::{Deserialize, Serialize};

/// A third-party system the backend proxies on behalf of the user.
///
/// Used to tag "integration not configured" failures so callers can
/// render the matching setup prompt.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Integration {
    /// Freshdesk ticketing.
    Freshdesk,
    /// HubSpot CRM.
    HubSpot,
}

impl Integration {
    /// Human-readable product name.
    pub fn product_name(self) -> &'static str {
        match self {
            Self::Freshdesk => "Freshdesk",
            Self::HubSpot => "HubSpot",
        }
    }

    /// The hint shown when the integration is not configured yet.
    pub fn setup_hint(self) -> &'static str {
        match self {
            Self::Freshdesk => "Please configure Freshdesk settings first",
            Self::HubSpot => "Connect HubSpot to sync contacts",
        }
    }
}
