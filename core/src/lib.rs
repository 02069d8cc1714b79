//! # Box Office Core
//!
//! Ticket inventory and entitlement ledger. A single authority defines events
//! with per-class fixed supply and price; any other party may buy, transfer,
//! or refund tickets under time-windowed rules.
//!
//! ## Components
//!
//! - **Validation gate** ([`validation`]): pure role and timing predicates,
//!   one per operation kind, run before any mutation.
//! - **Event catalog** ([`catalog`]): event definitions and per-class
//!   remaining supply, created once by the authority.
//! - **Entitlement ledger** ([`holdings`]): (holder, event, class) → quantity
//!   owned, mutated by purchase, transfer, and refund.
//! - **Operation surface** ([`service::BoxOffice`]): serializes every
//!   operation through one critical section, reads the clock once per
//!   operation, and treats the external settlement leg as the commit point.
//!
//! External collaborators stay external: caller identity arrives as an opaque
//! [`types::PartyId`], time through the [`environment::Clock`] trait, and
//! value transfer through [`settlement::SettlementGateway`].
//!
//! ## Example
//!
//! ```ignore
//! use box_office_core::{BoxOffice, Money, PartyId};
//! use box_office_core::environment::SystemClock;
//! use box_office_core::settlement::MockSettlementGateway;
//! use std::sync::Arc;
//!
//! let authority = PartyId::new();
//! let office = BoxOffice::new(authority, Arc::new(SystemClock), MockSettlementGateway::shared());
//!
//! let event_id = office
//!     .create_event(
//!         authority,
//!         "Concert".to_string(),
//!         starts_at,
//!         10,
//!         vec!["VIP".into(), "GA".into()],
//!         vec![Money::from_cents(10_000), Money::from_cents(5_000)],
//!         vec![2, 8],
//!     )
//!     .await?;
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod catalog;
pub mod error;
pub mod holdings;
pub mod service;
pub mod settlement;
pub mod types;
pub mod validation;

pub use error::{InvalidEventReason, Result, TicketError};
pub use service::BoxOffice;
pub use types::{ClassAvailability, EventId, EventRecord, Money, PartyId, TicketClass};

/// Environment module - dependency injection traits.
///
/// External dependencies are abstracted behind traits and injected at
/// construction, keeping operations deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Every time-gated operation reads the clock exactly once at entry.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
