//! Ticketing adapter (Freshdesk, proxied by the backend).

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_models::{ConversationEntry, Integration, Ticket, TicketId};
use tracing::debug;

use crate::client::BackendClient;
use crate::error::SdkError;

/// Read-only access to helpdesk tickets.
///
/// Implementations map a 400 answer to [`SdkError::NotConfigured`] so
/// callers can show a setup prompt instead of a generic error.
#[async_trait]
pub trait TicketingAdapter: Send + Sync {
    /// All tickets visible to the user.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, SdkError>;

    /// One ticket.
    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, SdkError>;

    /// The ticket's conversation thread, in source order.
    async fn get_conversations(&self, id: TicketId) -> Result<Vec<ConversationEntry>, SdkError>;
}

#[async_trait]
impl<T: TicketingAdapter + ?Sized> TicketingAdapter for Arc<T> {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, SdkError> {
        (**self).list_tickets().await
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, SdkError> {
        (**self).get_ticket(id).await
    }

    async fn get_conversations(&self, id: TicketId) -> Result<Vec<ConversationEntry>, SdkError> {
        (**self).get_conversations(id).await
    }
}

/// [`TicketingAdapter`] over the backend's `/freshdesk/*` endpoints.
#[derive(Clone)]
pub struct FreshdeskAdapter {
    backend: BackendClient,
}

impl FreshdeskAdapter {
    /// Wrap an authenticated backend client.
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl TicketingAdapter for FreshdeskAdapter {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, SdkError> {
        let url = self.backend.routes().tickets();
        let tickets: Vec<Ticket> = self
            .backend
            .get_json(&url, Some(Integration::Freshdesk))
            .await?;
        debug!(count = tickets.len(), "tickets fetched");
        Ok(tickets)
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, SdkError> {
        let url = self.backend.routes().ticket(id);
        self.backend
            .get_json(&url, Some(Integration::Freshdesk))
            .await
    }

    async fn get_conversations(&self, id: TicketId) -> Result<Vec<ConversationEntry>, SdkError> {
        let url = self.backend.routes().ticket_conversations(id);
        let entries: Vec<ConversationEntry> = self
            .backend
            .get_json(&url, Some(Integration::Freshdesk))
            .await?;
        debug!(ticket_id = %id, count = entries.len(), "conversations fetched");
        Ok(entries)
    }
}
