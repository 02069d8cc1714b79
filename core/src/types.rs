//! Domain types for the box office ledger.
//!
//! Value objects and entities shared by the catalog, the holdings ledger, and
//! the operation surface. Identifiers are newtypes; money is cents-based to
//! avoid floating-point arithmetic errors.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Sequential identifier for an event, assigned by the catalog at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Creates an `EventId` from its raw sequence number
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence number
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque comparable identity token for a transacting party.
///
/// Supplied by the external identity context; the ledger only ever compares
/// tokens for equality and uses them as holding keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(Uuid);

impl PartyId {
    /// Creates a new random `PartyId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PartyId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Total price for `quantity` units at this unit price, with overflow
    /// checking
    #[must_use]
    pub const fn checked_total(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Catalog Entities
// ============================================================================

/// A named ticket tier within an event, with its own price and supply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketClass {
    /// Class name, unique within the event by convention (not enforced)
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Remaining supply for this class
    pub remaining: u32,
}

/// An event as stored by the catalog.
///
/// Static fields never change after creation; only `remaining` and the
/// per-class remaining counts do. Invariant: the sum of per-class remaining
/// counts equals `remaining` at every observation point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Catalog-assigned sequential identifier
    pub id: EventId,
    /// The identity that created the event (and may never transact against it)
    pub authority: PartyId,
    /// Event name
    pub name: String,
    /// Scheduled start time
    pub starts_at: DateTime<Utc>,
    /// Total remaining tickets across all classes
    pub remaining: u32,
    /// Ticket classes in creation order
    pub classes: Vec<TicketClass>,
}

impl EventRecord {
    /// First class with an exactly matching name, if any.
    ///
    /// Class-name comparison is exact and case-sensitive throughout the
    /// ledger; duplicated names resolve to the first occurrence.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&TicketClass> {
        self.classes.iter().find(|class| class.name == name)
    }

    /// The refund cutoff: exactly 24 hours before the scheduled start.
    #[must_use]
    pub fn refund_cutoff(&self) -> DateTime<Utc> {
        self.starts_at - Duration::hours(24)
    }
}

// ============================================================================
// View Rows
// ============================================================================

/// One row of an availability listing: a class, its price, and what is left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAvailability {
    /// Class name
    pub class: String,
    /// Unit price
    pub price: Money,
    /// Remaining supply
    pub remaining: u32,
}

impl fmt::Display for ClassAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({} remaining)", self.class, self.price, self.remaining)
    }
}
