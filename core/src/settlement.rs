//! External settlement mechanism.
//!
//! Value transfer to and from callers is handled by an external ledger; this
//! module abstracts it behind a gateway trait compatible with card
//! processors and custodial account services. Either leg can fail, and a
//! failed leg aborts the whole ledger operation with no state change.

use crate::types::{Money, PartyId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Settlement result
pub type SettlementResult<T> = Result<T, SettlementError>;

/// Settlement failure, surfaced to callers as `TicketError::Settlement`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// The counterparty or processor declined the transfer.
    #[error("settlement declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },
    /// The settlement mechanism timed out.
    #[error("settlement timeout")]
    Timeout,
    /// Other mechanism failure.
    #[error("settlement error: {message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Proof of a completed settlement leg.
#[derive(Debug, Clone)]
pub struct SettlementReceipt {
    /// Mechanism-assigned settlement id
    pub settlement_id: String,
    /// Amount moved
    pub amount: Money,
}

/// Settlement gateway trait.
///
/// `collect` pulls the value a caller attached to a purchase; `disburse`
/// pushes a refund back out. Both are modeled as blocking calls that can
/// fail; neither is retried by the ledger.
pub trait SettlementGateway: Send + Sync {
    /// Collect `amount` attached by `payer`.
    ///
    /// # Errors
    ///
    /// Returns error if the inbound transfer fails.
    fn collect(
        &self,
        payer: PartyId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = SettlementResult<SettlementReceipt>> + Send>>;

    /// Push `amount` out to `payee`.
    ///
    /// # Errors
    ///
    /// Returns error if the outbound transfer fails.
    fn disburse(
        &self,
        payee: PartyId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = SettlementResult<SettlementReceipt>> + Send>>;
}

/// Mock settlement gateway (always succeeds for development)
#[derive(Clone, Debug, Default)]
pub struct MockSettlementGateway;

impl MockSettlementGateway {
    /// Creates a new mock settlement gateway
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<dyn SettlementGateway> {
        Arc::new(Self::new())
    }
}

impl SettlementGateway for MockSettlementGateway {
    fn collect(
        &self,
        payer: PartyId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = SettlementResult<SettlementReceipt>> + Send>> {
        Box::pin(async move {
            let settlement_id = format!("mock_in_{}", uuid::Uuid::new_v4());

            tracing::info!(
                payer = %payer,
                amount = amount.cents(),
                settlement_id = %settlement_id,
                "mock settlement collected"
            );

            Ok(SettlementReceipt { settlement_id, amount })
        })
    }

    fn disburse(
        &self,
        payee: PartyId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = SettlementResult<SettlementReceipt>> + Send>> {
        Box::pin(async move {
            let settlement_id = format!("mock_out_{}", uuid::Uuid::new_v4());

            tracing::info!(
                payee = %payee,
                amount = amount.cents(),
                settlement_id = %settlement_id,
                "mock settlement disbursed"
            );

            Ok(SettlementReceipt { settlement_id, amount })
        })
    }
}
