//! The box office: the external operation surface over one shared ledger.
//!
//! Every mutating operation runs inside one critical section covering the
//! catalog, the holdings ledger, and the settlement call, so each operation
//! observes and commits state atomically. The current time is read
//! exactly once at operation entry, and the settlement leg is the last
//! fallible step before the in-memory commit, so a failure at any point
//! leaves zero state mutation behind.

use crate::catalog::Catalog;
use crate::environment::Clock;
use crate::error::{Result, TicketError};
use crate::holdings::Holdings;
use crate::settlement::SettlementGateway;
use crate::types::{ClassAvailability, EventId, EventRecord, Money, PartyId};
use crate::validation;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared ledger state guarded by the operation mutex.
#[derive(Debug, Default)]
struct LedgerState {
    catalog: Catalog,
    holdings: Holdings,
}

/// Ticket inventory and entitlement ledger for a single authority.
///
/// Constructed once at process start; the authority identity is fixed for the
/// instance's lifetime. Handlers hold the store rather than reaching for any
/// ambient global.
pub struct BoxOffice {
    authority: PartyId,
    clock: Arc<dyn Clock>,
    settlement: Arc<dyn SettlementGateway>,
    state: Mutex<LedgerState>,
}

impl BoxOffice {
    /// Creates a ledger with a fixed authority, a clock, and a settlement
    /// gateway.
    #[must_use]
    pub fn new(
        authority: PartyId,
        clock: Arc<dyn Clock>,
        settlement: Arc<dyn SettlementGateway>,
    ) -> Self {
        Self {
            authority,
            clock,
            settlement,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// The authority identity captured at construction.
    #[must_use]
    pub const fn authority(&self) -> PartyId {
        self.authority
    }

    /// Creates an event with per-class supply and pricing.
    ///
    /// Only the authority may call this. The three class lists are parallel
    /// and must have equal lengths, with counts summing to `total_tickets`.
    /// Returns the new sequential event id.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for any other caller; `InvalidEventDefinition` with the
    /// specific sub-reason for malformed input.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_event(
        &self,
        caller: PartyId,
        name: String,
        starts_at: DateTime<Utc>,
        total_tickets: u32,
        class_names: Vec<String>,
        class_prices: Vec<Money>,
        class_counts: Vec<u32>,
    ) -> Result<EventId> {
        let result = self
            .create_event_inner(
                caller,
                name,
                starts_at,
                total_tickets,
                class_names,
                class_prices,
                class_counts,
            )
            .await;
        if let Err(error) = &result {
            tracing::warn!(%caller, %error, "event creation rejected");
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_event_inner(
        &self,
        caller: PartyId,
        name: String,
        starts_at: DateTime<Utc>,
        total_tickets: u32,
        class_names: Vec<String>,
        class_prices: Vec<Money>,
        class_counts: Vec<u32>,
    ) -> Result<EventId> {
        let now = self.clock.now();
        validation::create_event_gate(
            caller,
            self.authority,
            now,
            &name,
            starts_at,
            total_tickets,
            &class_names,
            &class_prices,
            &class_counts,
        )?;

        let mut state = self.state.lock().await;
        let id = state.catalog.create(
            caller,
            name,
            starts_at,
            total_tickets,
            class_names,
            class_prices,
            class_counts,
        );
        Ok(id)
    }

    /// Buys tickets in one class, paying exactly `price * quantity`.
    ///
    /// The booking window opens only once the event's scheduled time has
    /// passed (see [`crate::validation::booking_gate`]). Candidate classes are
    /// scanned in creation order; the first whose name matches exactly, whose
    /// remaining supply covers `quantity`, and whose total price equals
    /// `paid` wins. Payment collection is the commit point: if it fails,
    /// nothing mutates.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `EventNotFound`, `WindowClosed`, `CategoryNotFound`,
    /// `CategorySoldOut`, `PaymentMismatch`, or `Settlement`.
    pub async fn buy_tickets(
        &self,
        caller: PartyId,
        event_id: EventId,
        class: &str,
        quantity: u32,
        paid: Money,
    ) -> Result<()> {
        let result = self.buy_tickets_inner(caller, event_id, class, quantity, paid).await;
        if let Err(error) = &result {
            tracing::warn!(%caller, event = event_id.value(), class, quantity, %error, "purchase rejected");
        }
        result
    }

    async fn buy_tickets_inner(
        &self,
        caller: PartyId,
        event_id: EventId,
        class: &str,
        quantity: u32,
        paid: Money,
    ) -> Result<()> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let event = state.catalog.get(event_id)?;
        validation::booking_gate(caller, self.authority, now, event.starts_at)?;

        // First class satisfying all three checks at once: exact name,
        // sufficient supply, exact payment. Diagnostics report the first
        // name-match's defect when no candidate is accepted.
        let mut first_match_failure: Option<TicketError> = None;
        let mut accepted: Option<usize> = None;
        for (idx, candidate) in event.classes.iter().enumerate() {
            if candidate.name != class {
                continue;
            }
            if candidate.remaining < quantity {
                first_match_failure.get_or_insert(TicketError::CategorySoldOut {
                    requested: quantity,
                    remaining: candidate.remaining,
                });
                continue;
            }
            match candidate.price.checked_total(quantity) {
                Some(expected) if expected == paid => {
                    accepted = Some(idx);
                    break;
                }
                Some(expected) => {
                    first_match_failure.get_or_insert(TicketError::PaymentMismatch { expected, paid });
                }
                None => {
                    first_match_failure.get_or_insert(TicketError::AmountOverflow);
                }
            }
        }
        let Some(idx) = accepted else {
            return Err(first_match_failure.unwrap_or(TicketError::CategoryNotFound));
        };

        // Commit point. The lock stays held across the settlement await, so
        // no other operation can interleave between the collection and the
        // ledger updates.
        let receipt = self.settlement.collect(caller, paid).await?;

        let event = state.catalog.get_mut(event_id)?;
        event.remaining -= quantity;
        if let Some(candidate) = event.classes.get_mut(idx) {
            candidate.remaining -= quantity;
        }
        state.holdings.credit(caller, event_id, class, quantity);

        tracing::info!(
            %caller,
            event = event_id.value(),
            class,
            quantity,
            paid = paid.cents(),
            settlement_id = %receipt.settlement_id,
            "tickets purchased"
        );
        Ok(())
    }

    /// Transfers tickets the caller holds to another identity.
    ///
    /// Shares the buy operation's booking window. No payment is involved and
    /// the class name is not cross-validated against the catalog; the
    /// recipient may be anyone, including the sender or the authority.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `EventNotFound`, `WindowClosed`, or
    /// `InsufficientHolding`.
    pub async fn transfer_tickets(
        &self,
        caller: PartyId,
        event_id: EventId,
        class: &str,
        quantity: u32,
        to: PartyId,
    ) -> Result<()> {
        let result = self.transfer_tickets_inner(caller, event_id, class, quantity, to).await;
        if let Err(error) = &result {
            tracing::warn!(%caller, event = event_id.value(), class, quantity, %to, %error, "transfer rejected");
        }
        result
    }

    async fn transfer_tickets_inner(
        &self,
        caller: PartyId,
        event_id: EventId,
        class: &str,
        quantity: u32,
        to: PartyId,
    ) -> Result<()> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let starts_at = state.catalog.get(event_id)?.starts_at;
        validation::booking_gate(caller, self.authority, now, starts_at)?;

        state.holdings.transfer(caller, to, event_id, class, quantity)?;

        tracing::info!(
            %caller,
            %to,
            event = event_id.value(),
            class,
            quantity,
            "tickets transferred"
        );
        Ok(())
    }

    /// Refunds tickets the caller holds, returning them to the event's
    /// supply.
    ///
    /// Permitted only strictly before the cutoff 24 hours ahead of the
    /// event. All checks and arithmetic run before the outbound settlement
    /// leg; the disbursement is the last fallible step, and the supply and
    /// holding updates that follow it cannot fail under the held lock.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `EventNotFound`, `RefundWindowClosed`,
    /// `InsufficientHolding`, `CategoryNotFound`, `AmountOverflow`, or
    /// `Settlement`.
    pub async fn refund_tickets(
        &self,
        caller: PartyId,
        event_id: EventId,
        class: &str,
        quantity: u32,
    ) -> Result<()> {
        let result = self.refund_tickets_inner(caller, event_id, class, quantity).await;
        if let Err(error) = &result {
            tracing::warn!(%caller, event = event_id.value(), class, quantity, %error, "refund rejected");
        }
        result
    }

    async fn refund_tickets_inner(
        &self,
        caller: PartyId,
        event_id: EventId,
        class: &str,
        quantity: u32,
    ) -> Result<()> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let event = state.catalog.get(event_id)?;
        validation::refund_gate(caller, self.authority, now, event.refund_cutoff())?;

        let held = state.holdings.quantity(caller, event_id, class);
        if held < quantity {
            return Err(TicketError::InsufficientHolding { requested: quantity, held });
        }

        let price = event.class(class).ok_or(TicketError::CategoryNotFound)?.price;
        let amount = price.checked_total(quantity).ok_or(TicketError::AmountOverflow)?;

        let receipt = self.settlement.disburse(caller, amount).await?;

        let event = state.catalog.get_mut(event_id)?;
        if let Some(candidate) = event.classes.iter_mut().find(|candidate| candidate.name == class) {
            candidate.remaining += quantity;
        }
        event.remaining += quantity;
        state.holdings.debit(caller, event_id, class, quantity)?;

        tracing::info!(
            %caller,
            event = event_id.value(),
            class,
            quantity,
            amount = amount.cents(),
            settlement_id = %receipt.settlement_id,
            "tickets refunded"
        );
        Ok(())
    }

    /// The caller's holding for one (event, class). Pure read; zero for
    /// entries never touched.
    pub async fn my_holding(&self, caller: PartyId, event_id: EventId, class: &str) -> u32 {
        let state = self.state.lock().await;
        state.holdings.quantity(caller, event_id, class)
    }

    /// A snapshot of the stored event record.
    ///
    /// # Errors
    ///
    /// `EventNotFound` for an id never allocated.
    pub async fn lookup(&self, event_id: EventId) -> Result<EventRecord> {
        let state = self.state.lock().await;
        state.catalog.get(event_id).cloned()
    }

    /// Availability rows in creation-time class order. Pure read.
    ///
    /// # Errors
    ///
    /// `EventNotFound` for an id never allocated.
    pub async fn availability(&self, event_id: EventId) -> Result<Vec<ClassAvailability>> {
        let state = self.state.lock().await;
        state.catalog.availability(event_id)
    }

    /// Human-readable availability listing, one line per class. Pure read.
    ///
    /// # Errors
    ///
    /// `EventNotFound` for an id never allocated.
    pub async fn describe_availability(&self, event_id: EventId) -> Result<String> {
        let state = self.state.lock().await;
        state.catalog.describe_availability(event_id)
    }
}
