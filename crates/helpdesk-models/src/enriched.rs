//! The merged ticket view.

use serde::{Deserialize, Serialize};

use crate::contact::CrmContact;
use crate::presentation::{priority_label, status_label, Label};
use crate::ticket::{ConversationEntry, Ticket, TicketId};

/// A ticket joined with its conversation thread and, when one was found,
/// the matching CRM contact.
///
/// Built fresh for every view and never persisted. `contact == None` is a
/// normal outcome (no email, no match, or CRM unavailable).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnrichedTicket {
    /// The ticket snapshot.
    pub ticket: Ticket,
    /// Matching CRM contact, if any.
    pub contact: Option<CrmContact>,
    /// Conversation entries in source order.
    pub conversations: Vec<ConversationEntry>,
}

impl EnrichedTicket {
    /// The ticket's identifier.
    pub fn id(&self) -> TicketId {
        self.ticket.id
    }

    /// Status label for the ticket.
    pub fn status(&self) -> Label {
        status_label(self.ticket.status)
    }

    /// Priority label for the ticket.
    pub fn priority(&self) -> Label {
        priority_label(self.ticket.priority)
    }

    /// Whether CRM context is available.
    pub fn has_crm_data(&self) -> bool {
        self.contact.is_some()
    }
}
