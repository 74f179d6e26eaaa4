//! Ticket enrichment: join a ticket to its CRM contact by requester email.
//!
//! ```text
//! get_ticket(id) ─┐
//!                 ├─ try_join ─► correlation_email() ─► find_contact_by_email()
//! get_conversations(id) ─┘                              (failure ⇒ no CRM data)
//! ```
//!
//! Ticket and thread are required: their errors propagate. The contact
//! lookup is best-effort: no match and lookup failures both degrade to
//! `contact = None`.

use helpdesk_models::{CrmContact, EmailAddress, EnrichedTicket, TicketId};
use tracing::{debug, info, warn};

use crate::crm::CrmAdapter;
use crate::error::SdkError;
use crate::ticketing::TicketingAdapter;

/// Builds [`EnrichedTicket`]s from a ticketing and a CRM adapter.
pub struct Enricher<T, C> {
    ticketing: T,
    crm: C,
    crm_gate: bool,
}

impl<T, C> Enricher<T, C>
where
    T: TicketingAdapter,
    C: CrmAdapter,
{
    /// Combine two adapters.
    pub fn new(ticketing: T, crm: C) -> Self {
        Self {
            ticketing,
            crm,
            crm_gate: false,
        }
    }

    /// When enabled, check the CRM connection status before each lookup
    /// and skip the lookup if the CRM is not linked.
    #[must_use]
    pub fn with_crm_gate(mut self, enabled: bool) -> Self {
        self.crm_gate = enabled;
        self
    }

    /// The ticketing adapter.
    pub fn ticketing(&self) -> &T {
        &self.ticketing
    }

    /// The CRM adapter.
    pub fn crm(&self) -> &C {
        &self.crm
    }

    /// Fetch ticket `id` with its thread and, best-effort, its CRM contact.
    pub async fn enrich(&self, id: TicketId) -> Result<EnrichedTicket, SdkError> {
        let (ticket, conversations) = futures::try_join!(
            self.ticketing.get_ticket(id),
            self.ticketing.get_conversations(id)
        )?;

        let contact = match ticket.correlation_email() {
            Some(email) => self.lookup_contact(id, &email).await,
            None => {
                debug!(ticket_id = %id, "ticket has no requester email; skipping CRM lookup");
                None
            }
        };

        info!(
            ticket_id = %id,
            conversations = conversations.len(),
            crm = contact.is_some(),
            "ticket enriched"
        );

        Ok(EnrichedTicket {
            ticket,
            contact,
            conversations,
        })
    }

    async fn lookup_contact(&self, id: TicketId, email: &EmailAddress) -> Option<CrmContact> {
        if self.crm_gate {
            match self.crm.get_status().await {
                Ok(status) if status.connected => {}
                Ok(_) => {
                    debug!(ticket_id = %id, "CRM not linked; skipping lookup");
                    return None;
                }
                Err(e) => {
                    warn!(ticket_id = %id, error = %e, "CRM status check failed; continuing without CRM data");
                    return None;
                }
            }
        }

        match self.crm.find_contact_by_email(email).await {
            Ok(Some(contact)) => Some(contact),
            Ok(None) => {
                debug!(ticket_id = %id, "no CRM contact matches the requester");
                None
            }
            Err(e) => {
                warn!(ticket_id = %id, error = %e, "CRM lookup failed; continuing without CRM data");
                None
            }
        }
    }
}
