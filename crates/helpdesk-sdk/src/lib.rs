//! # Helpdesk SDK
//!
//! Client-side core for viewing helpdesk tickets with CRM context.
//!
//! The SDK provides:
//!
//! * [`SecretCipher`] / [`PassphraseCipher`] / [`ChaChaCipher`]: opening
//!   the user's third-party API key as the backend stores it.
//! * [`BackendClient`]: the backend REST client (login, signup, profile).
//! * [`TicketingAdapter`] / [`FreshdeskAdapter`] and [`CrmAdapter`] /
//!   [`HubSpotAdapter`]: typed read-only sources.
//! * [`Enricher`]: joins a ticket to its CRM contact, tolerating CRM
//!   failure.
//! * [`TicketView`]: the `Idle → Loading → Ready | Empty` view with
//!   stale-result protection.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use helpdesk_models::TicketId;
//! use helpdesk_sdk::{BackendClient, Enricher, SdkConfig, TicketView, ViewState};
//!
//! # async fn run() -> Result<(), helpdesk_sdk::SdkError> {
//! let client = BackendClient::new(&SdkConfig::from_env())?;
//! let session = client.login("agent@acme.io", "password").await?;
//! let client = client.authenticated(&session);
//!
//! let view = TicketView::new(Enricher::new(client.freshdesk(), client.hubspot()));
//! if let ViewState::Ready(ticket) = view.open(Some(TicketId::new(42))).await {
//!     println!("{} ({})", ticket.ticket.subject, ticket.status().text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod client;
pub mod config;
pub mod crm;
pub mod enrichment;
pub mod error;
pub mod routes;
pub mod session;
pub mod ticketing;
pub mod view;

pub use cipher::{reveal_or_empty, ChaChaCipher, CipherError, PassphraseCipher, SecretCipher};
pub use client::BackendClient;
pub use config::SdkConfig;
pub use crm::{CrmAdapter, HubSpotAdapter};
pub use enrichment::Enricher;
pub use error::SdkError;
pub use routes::Routes;
pub use session::Session;
pub use ticketing::{FreshdeskAdapter, TicketingAdapter};
pub use view::{EmptyReason, PendingLoad, TicketView, ViewState};

// Re-export the secret wrapper so callers need not depend on `secrecy`.
pub use secrecy::{ExposeSecret, SecretString};
