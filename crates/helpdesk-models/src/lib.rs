#![deny(missing_docs)]

//! # Helpdesk Models
//!
//! Core data types shared by the helpdesk context SDK, the CLI and the
//! mock backend.
//!
//! ## Data hierarchy
//!
//! ```text
//! EnrichedTicket
//! ├── Ticket
//! │   └── Requester (optional)
//! ├── Vec<ConversationEntry>   (source order)
//! └── Option<CrmContact>
//!     └── ContactProperties
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ticket`] | `TicketId`, `Ticket`, `Requester`, `ConversationEntry` |
//! | [`contact`] | `CrmContact`, `ContactProperties`, `ConnectionStatus` |
//! | [`enriched`] | `EnrichedTicket` (ticket + thread + optional contact) |
//! | [`integration`] | Third-party `Integration` identifiers |
//! | [`user`] | Profile, session and sealed-credential DTOs |
//! | [`presentation`] | Status / priority / lifecycle display labels |

pub mod contact;
pub mod enriched;
pub mod error;
pub mod integration;
pub mod presentation;
pub mod ticket;
pub mod user;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `helpdesk_models::Ticket` directly.
pub use contact::*;
pub use enriched::*;
pub use error::*;
pub use integration::*;
pub use presentation::*;
pub use ticket::*;
pub use user::*;
