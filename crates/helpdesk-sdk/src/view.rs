//! Ticket detail view state machine.
//!
//! ```text
//! Idle ──open(id)──► Loading ──ok──► Ready(EnrichedTicket)
//!   ▲                   │
//!   │                   └──err / no id──► Empty { reason }
//!   └──close()── any state             (retry() re-opens the same id)
//! ```
//!
//! Every `open` takes a new generation number. A result is applied only if
//! its generation is still current, so a slow response for a ticket the
//! user has already left never overwrites the newer view.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use helpdesk_models::{EnrichedTicket, Integration, TicketId};
use tracing::{debug, warn};

use crate::crm::CrmAdapter;
use crate::enrichment::Enricher;
use crate::error::SdkError;
use crate::ticketing::TicketingAdapter;

/// Why a view has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// No ticket id was given.
    NoTicket,
    /// The ticketing integration is not set up for this user.
    NotConfigured(Integration),
    /// The required ticket fetch failed.
    Failed(String),
}

/// What a ticket view currently displays.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing opened.
    Idle,
    /// Waiting for ticket `ticket_id`.
    Loading {
        /// The ticket being fetched.
        ticket_id: TicketId,
    },
    /// The enriched ticket.
    Ready(EnrichedTicket),
    /// Terminal until retried.
    Empty {
        /// The ticket that failed, if one was requested.
        ticket_id: Option<TicketId>,
        /// Why there is nothing to show.
        reason: EmptyReason,
    },
}

impl ViewState {
    /// The ticket this state refers to, if any.
    pub fn ticket_id(&self) -> Option<TicketId> {
        match self {
            Self::Idle => None,
            Self::Loading { ticket_id } => Some(*ticket_id),
            Self::Ready(view) => Some(view.id()),
            Self::Empty { ticket_id, .. } => *ticket_id,
        }
    }

    /// `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Handle for one in-flight load, returned by [`TicketView::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    generation: u64,
    ticket_id: TicketId,
}

impl PendingLoad {
    /// The ticket being loaded.
    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }
}

struct ViewInner {
    generation: u64,
    state: ViewState,
}

/// A ticket detail view over an [`Enricher`].
///
/// Cheap to clone; clones share state, so a UI can hand one clone to a
/// background task and keep another for rendering.
pub struct TicketView<T, C> {
    enricher: Arc<Enricher<T, C>>,
    inner: Arc<Mutex<ViewInner>>,
}

impl<T, C> Clone for TicketView<T, C> {
    fn clone(&self) -> Self {
        Self {
            enricher: Arc::clone(&self.enricher),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, C> TicketView<T, C>
where
    T: TicketingAdapter,
    C: CrmAdapter,
{
    /// A new, idle view.
    pub fn new(enricher: Enricher<T, C>) -> Self {
        Self {
            enricher: Arc::new(enricher),
            inner: Arc::new(Mutex::new(ViewInner {
                generation: 0,
                state: ViewState::Idle,
            })),
        }
    }

    /// The enricher backing this view.
    pub fn enricher(&self) -> &Enricher<T, C> {
        &self.enricher
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.lock().state.clone()
    }

    /// Open `ticket_id`, wait for it, and return the resulting state.
    ///
    /// If another `open` or a `close` happens meanwhile, this call's result
    /// is discarded and the newer state is returned.
    pub async fn open(&self, ticket_id: Option<TicketId>) -> ViewState {
        let Some(load) = self.begin(ticket_id) else {
            return self.state();
        };
        let outcome = self.enricher.enrich(load.ticket_id).await;
        self.settle(load, outcome);
        self.state()
    }

    /// Re-open whatever ticket the view last referred to.
    pub async fn retry(&self) -> ViewState {
        let ticket_id = self.state().ticket_id();
        self.open(ticket_id).await
    }

    /// Leave the view. In-flight results are dropped on arrival.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = ViewState::Idle;
    }

    /// Start a load: enter `Loading` (or `Empty` when there is no id).
    ///
    /// Returns the handle to pass to [`settle`](Self::settle), or `None`
    /// when there is nothing to fetch.
    pub fn begin(&self, ticket_id: Option<TicketId>) -> Option<PendingLoad> {
        let mut inner = self.lock();
        inner.generation += 1;
        let Some(ticket_id) = ticket_id else {
            inner.state = ViewState::Empty {
                ticket_id: None,
                reason: EmptyReason::NoTicket,
            };
            return None;
        };
        inner.state = ViewState::Loading { ticket_id };
        debug!(%ticket_id, generation = inner.generation, "ticket view loading");
        Some(PendingLoad {
            generation: inner.generation,
            ticket_id,
        })
    }

    /// Apply the outcome of `load`. Returns `false` if it was stale.
    pub fn settle(&self, load: PendingLoad, outcome: Result<EnrichedTicket, SdkError>) -> bool {
        let mut inner = self.lock();
        if inner.generation != load.generation {
            debug!(
                ticket_id = %load.ticket_id,
                stale = load.generation,
                current = inner.generation,
                "discarding stale ticket result"
            );
            return false;
        }
        inner.state = match outcome {
            Ok(view) => ViewState::Ready(view),
            Err(e) => {
                warn!(ticket_id = %load.ticket_id, error = %e, "ticket could not be loaded");
                let reason = match e {
                    SdkError::NotConfigured { integration } => EmptyReason::NotConfigured(integration),
                    other => EmptyReason::Failed(other.to_string()),
                };
                ViewState::Empty {
                    ticket_id: Some(load.ticket_id),
                    reason,
                }
            }
        };
        true
    }

    fn lock(&self) -> MutexGuard<'_, ViewInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
