//! In-memory adapters and fixtures shared by the SDK integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helpdesk_models::{
    ConnectionStatus, ConversationEntry, CrmContact, EmailAddress, Integration, Ticket, TicketId,
};
use helpdesk_sdk::{CrmAdapter, SdkError, TicketingAdapter};
use serde_json::json;
use tokio::sync::Notify;

// ============================================================================
// Fixtures
// ============================================================================

/// A ticket with the given email fields.
pub fn ticket(id: u64, requester_email: Option<&str>, nested_email: Option<&str>) -> Ticket {
    let requester = nested_email.map(|email| json!({ "name": "Ada Lovelace", "email": email }));
    serde_json::from_value(json!({
        "id": id,
        "subject": format!("Ticket {id}"),
        "status": 4,
        "priority": 3,
        "requester_email": requester_email,
        "requester": requester,
        "created_at": "2024-03-01T10:15:00Z",
        "description_html": "<p>It broke.</p>"
    }))
    .unwrap()
}

/// A short thread: requester, agent, requester.
pub fn thread() -> Vec<ConversationEntry> {
    serde_json::from_value(json!([
        { "id": 1, "incoming": true,  "created_at": "2024-03-01T10:20:00Z", "body": "first" },
        { "id": 2, "incoming": false, "created_at": "2024-03-01T10:25:00Z", "body": "second" },
        { "id": 3, "incoming": true,  "created_at": "2024-03-01T10:21:00Z", "body": "third" }
    ]))
    .unwrap()
}

/// A CRM contact for `email`.
pub fn contact(email: &str) -> CrmContact {
    serde_json::from_value(json!({
        "id": "501",
        "properties": {
            "email": email,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "company": "Analytical Engines",
            "lifecyclestage": "customer"
        }
    }))
    .unwrap()
}

// ============================================================================
// FakeTicketing
// ============================================================================

/// Ticketing adapter backed by maps, with optional per-ticket gates.
#[derive(Default)]
pub struct FakeTicketing {
    tickets: Mutex<HashMap<TicketId, Ticket>>,
    conversations: Mutex<HashMap<TicketId, Vec<ConversationEntry>>>,
    gates: Mutex<HashMap<TicketId, Arc<Notify>>>,
    ticket_failure: Mutex<Option<u16>>,
    conversation_failure: Mutex<Option<u16>>,
}

impl FakeTicketing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticket(self, ticket: Ticket, conversations: Vec<ConversationEntry>) -> Self {
        let id = ticket.id;
        self.tickets.lock().unwrap().insert(id, ticket);
        self.conversations.lock().unwrap().insert(id, conversations);
        self
    }

    /// Fail every `get_ticket` with `status`.
    pub fn failing_tickets(self, status: u16) -> Self {
        *self.ticket_failure.lock().unwrap() = Some(status);
        self
    }

    /// Fail every `get_conversations` with `status`.
    pub fn failing_conversations(self, status: u16) -> Self {
        *self.conversation_failure.lock().unwrap() = Some(status);
        self
    }

    /// Stop failing.
    pub fn recover(&self) {
        *self.ticket_failure.lock().unwrap() = None;
        *self.conversation_failure.lock().unwrap() = None;
    }

    /// Hold `get_ticket(id)` until the returned gate is notified.
    pub fn gate(&self, id: u64) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(TicketId::new(id), Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl TicketingAdapter for FakeTicketing {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, SdkError> {
        let mut tickets: Vec<Ticket> = self.tickets.lock().unwrap().values().cloned().collect();
        tickets.sort_by_key(|t| t.id);
        Ok(tickets)
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, SdkError> {
        let gate = self.gates.lock().unwrap().get(&id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(status) = *self.ticket_failure.lock().unwrap() {
            return Err(SdkError::from_status(
                status,
                "ticket fetch failed".into(),
                Some(Integration::Freshdesk),
            ));
        }
        self.tickets
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| SdkError::NotFound(format!("ticket {id}")))
    }

    async fn get_conversations(&self, id: TicketId) -> Result<Vec<ConversationEntry>, SdkError> {
        if let Some(status) = *self.conversation_failure.lock().unwrap() {
            return Err(SdkError::from_status(
                status,
                "conversation fetch failed".into(),
                Some(Integration::Freshdesk),
            ));
        }
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// FakeCrm
// ============================================================================

/// What the fake CRM answers to a lookup.
#[derive(Clone)]
pub enum Lookup {
    Match(CrmContact),
    NoMatch,
    Fail(u16),
}

/// CRM adapter that records every lookup.
pub struct FakeCrm {
    lookup: Lookup,
    connected: Result<bool, u16>,
    lookups: Mutex<Vec<String>>,
    status_calls: AtomicUsize,
}

impl FakeCrm {
    pub fn new(lookup: Lookup) -> Self {
        Self {
            lookup,
            connected: Ok(true),
            lookups: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Status answer: `Ok(connected)` or `Err(http status)`.
    pub fn with_status(mut self, connected: Result<bool, u16>) -> Self {
        self.connected = connected;
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrmAdapter for FakeCrm {
    async fn get_status(&self) -> Result<ConnectionStatus, SdkError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.connected {
            Ok(connected) => Ok(ConnectionStatus { connected }),
            Err(status) => Err(SdkError::from_status(
                status,
                "status failed".into(),
                Some(Integration::HubSpot),
            )),
        }
    }

    async fn list_contacts(&self) -> Result<Vec<CrmContact>, SdkError> {
        match &self.lookup {
            Lookup::Match(contact) => Ok(vec![contact.clone()]),
            _ => Ok(Vec::new()),
        }
    }

    async fn find_contact_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<CrmContact>, SdkError> {
        self.lookups.lock().unwrap().push(email.to_string());
        match &self.lookup {
            Lookup::Match(contact) => Ok(Some(contact.clone())),
            Lookup::NoMatch => Ok(None),
            Lookup::Fail(status) => Err(SdkError::from_status(
                *status,
                "crm down".into(),
                Some(Integration::HubSpot),
            )),
        }
    }
}
