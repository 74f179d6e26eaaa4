//! CRM contact types as served by the `/hubspot/*` endpoints.

use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::presentation::lifecycle_label;

/// Whether the CRM integration is linked for the current user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    /// `true` when a valid linkage exists server-side.
    pub connected: bool,
}

/// Contact properties keyed by the CRM's internal property names.
///
/// The well-known properties are typed; everything else is kept verbatim
/// in [`ContactProperties::other`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContactProperties {
    /// Primary email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Lifecycle stage internal value (e.g. `lead`, `customer`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecyclestage: Option<String>,
    /// Any further properties the CRM returned.
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// A contact record from the CRM.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CrmContact {
    /// CRM object id. Accepted as a JSON string or number.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Contact properties.
    #[serde(default)]
    pub properties: ContactProperties,
}

impl CrmContact {
    /// `"first last"`, trimmed; empty when neither part is known.
    pub fn full_name(&self) -> String {
        [
            self.properties.firstname.as_deref(),
            self.properties.lastname.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Display label for the contact's lifecycle stage.
    pub fn lifecycle(&self) -> &'static str {
        lifecycle_label(self.properties.lifecyclestage.as_deref())
    }

    /// Company name, or `"Private Entity"` when unknown.
    pub fn company_or_default(&self) -> &str {
        match self.properties.company.as_deref().map(str::trim) {
            Some(company) if !company.is_empty() => company,
            _ => "Private Entity",
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric contact id, got {other}"
        ))),
    }
}
