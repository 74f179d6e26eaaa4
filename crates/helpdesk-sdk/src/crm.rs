//! CRM adapter (HubSpot, proxied by the backend).

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_models::{ConnectionStatus, CrmContact, EmailAddress, Integration};
use serde_json::Value;
use tracing::debug;

use crate::client::BackendClient;
use crate::error::SdkError;

/// Read-only access to CRM contacts.
#[async_trait]
pub trait CrmAdapter: Send + Sync {
    /// Whether the CRM is linked for this user.
    async fn get_status(&self) -> Result<ConnectionStatus, SdkError>;

    /// All contacts.
    async fn list_contacts(&self) -> Result<Vec<CrmContact>, SdkError>;

    /// The contact with this email.
    ///
    /// No match is `Ok(None)`, not an error; transport and auth failures
    /// are `Err`.
    async fn find_contact_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<CrmContact>, SdkError>;
}

#[async_trait]
impl<C: CrmAdapter + ?Sized> CrmAdapter for Arc<C> {
    async fn get_status(&self) -> Result<ConnectionStatus, SdkError> {
        (**self).get_status().await
    }

    async fn list_contacts(&self) -> Result<Vec<CrmContact>, SdkError> {
        (**self).list_contacts().await
    }

    async fn find_contact_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<CrmContact>, SdkError> {
        (**self).find_contact_by_email(email).await
    }
}

/// [`CrmAdapter`] over the backend's `/hubspot/*` endpoints.
#[derive(Clone)]
pub struct HubSpotAdapter {
    backend: BackendClient,
}

impl HubSpotAdapter {
    /// Wrap an authenticated backend client.
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl CrmAdapter for HubSpotAdapter {
    async fn get_status(&self) -> Result<ConnectionStatus, SdkError> {
        let url = self.backend.routes().hubspot_status();
        self.backend.get_json(&url, Some(Integration::HubSpot)).await
    }

    async fn list_contacts(&self) -> Result<Vec<CrmContact>, SdkError> {
        let url = self.backend.routes().hubspot_contacts();
        let contacts: Vec<CrmContact> = self
            .backend
            .get_json(&url, Some(Integration::HubSpot))
            .await?;
        debug!(count = contacts.len(), "contacts fetched");
        Ok(contacts)
    }

    async fn find_contact_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<CrmContact>, SdkError> {
        let url = self.backend.routes().hubspot_contact();
        let body: Value = match self
            .backend
            .get_json_with_query(&url, &[("email", email.as_str())], Some(Integration::HubSpot))
            .await
        {
            Ok(body) => body,
            Err(SdkError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        contact_from_lookup(body)
    }
}

/// Interpret a lookup body: `null` and `{}` mean "no match".
fn contact_from_lookup(body: Value) -> Result<Option<CrmContact>, SdkError> {
    match body {
        Value::Null => Ok(None),
        Value::Object(ref map) if map.is_empty() => Ok(None),
        other => Ok(Some(serde_json::from_value(other)?)),
    }
}
