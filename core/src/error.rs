//! Error types for ledger operations.

use crate::settlement::SettlementError;
use crate::types::Money;
use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, TicketError>;

/// Failure taxonomy for every catalog and ledger operation.
///
/// Each variant maps to exactly one violated precondition so callers can react
/// programmatically. Failures are synchronous, abort the whole operation with
/// zero state mutation, and are never retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// The caller's role forbids this operation: only the authority may create
    /// events, and the authority may never buy, transfer, or refund.
    #[error("caller is not permitted to perform this operation")]
    Unauthorized,

    /// Malformed create-event input.
    #[error("invalid event definition: {0}")]
    InvalidEventDefinition(#[source] InvalidEventReason),

    /// Buy or transfer attempted while the booking window is shut.
    #[error("booking window is not open for this event")]
    WindowClosed,

    /// Refund attempted within 24 hours of the event's scheduled start.
    #[error("refund window closed 24 hours before the event")]
    RefundWindowClosed,

    /// No event exists with the given id.
    #[error("event not found")]
    EventNotFound,

    /// No ticket class with the given name exists on the event.
    #[error("ticket class not found")]
    CategoryNotFound,

    /// The matched class cannot cover the requested quantity.
    #[error("class sold out: requested {requested}, remaining {remaining}")]
    CategorySoldOut {
        /// Quantity requested
        requested: u32,
        /// Remaining supply in the class
        remaining: u32,
    },

    /// The attached payment does not exactly equal `price * quantity`.
    #[error("payment mismatch: expected {expected}, paid {paid}")]
    PaymentMismatch {
        /// Exact amount due
        expected: Money,
        /// Amount actually attached
        paid: Money,
    },

    /// The caller does not hold enough tickets for the transfer or refund.
    #[error("insufficient holding: requested {requested}, held {held}")]
    InsufficientHolding {
        /// Quantity requested
        requested: u32,
        /// Quantity actually held
        held: u32,
    },

    /// The external settlement mechanism failed; the operation aborted with no
    /// state change.
    #[error("settlement failed: {0}")]
    Settlement(#[from] SettlementError),

    /// `price * quantity` exceeds the representable amount.
    #[error("amount arithmetic overflow")]
    AmountOverflow,
}

/// Sub-reasons for a rejected event definition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEventReason {
    /// The event name is empty.
    #[error("event name is empty")]
    EmptyName,

    /// The scheduled time is not strictly in the future.
    #[error("scheduled time is not in the future")]
    DateNotInFuture,

    /// The declared total ticket count is zero.
    #[error("total ticket count is zero")]
    ZeroTickets,

    /// The per-class counts do not sum to the declared total.
    #[error("class counts sum to {sum}, declared total is {declared}")]
    CountMismatch {
        /// Declared total ticket count
        declared: u32,
        /// Actual sum of per-class counts, widened so it cannot wrap
        sum: u64,
    },

    /// The class name, price, and count lists have unequal lengths.
    #[error("class name, price, and count lists have unequal lengths")]
    LengthMismatch,
}
