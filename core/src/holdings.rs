//! The entitlement ledger: who owns how many tickets of what.
//!
//! Holdings are keyed by (holder, event, class name) and created lazily at
//! zero on first reference. Quantities never persist as negative values; the
//! ledger deliberately does not cross-validate class names against the
//! catalog.

use crate::error::{Result, TicketError};
use crate::types::{EventId, PartyId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Composite key for one holding entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoldingKey {
    /// Owning identity
    pub holder: PartyId,
    /// Event the tickets belong to
    pub event: EventId,
    /// Class name, matched exactly and case-sensitively
    pub class: String,
}

/// Quantity-owned map over composite holding keys.
#[derive(Clone, Debug, Default)]
pub struct Holdings {
    map: HashMap<HoldingKey, u32>,
}

impl Holdings {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity held, zero for entries never touched.
    #[must_use]
    pub fn quantity(&self, holder: PartyId, event: EventId, class: &str) -> u32 {
        let key = HoldingKey { holder, event, class: class.to_string() };
        self.map.get(&key).copied().unwrap_or(0)
    }

    /// Adds `quantity` to a holding, creating it at zero first if needed.
    pub fn credit(&mut self, holder: PartyId, event: EventId, class: &str, quantity: u32) {
        let key = HoldingKey { holder, event, class: class.to_string() };
        *self.map.entry(key).or_insert(0) += quantity;
    }

    /// Removes `quantity` from a holding.
    ///
    /// # Errors
    ///
    /// `InsufficientHolding` if the holding cannot cover the quantity; the
    /// entry is left untouched in that case.
    pub fn debit(&mut self, holder: PartyId, event: EventId, class: &str, quantity: u32) -> Result<()> {
        let key = HoldingKey { holder, event, class: class.to_string() };
        let held = self.map.get(&key).copied().unwrap_or(0);
        if held < quantity {
            return Err(TicketError::InsufficientHolding { requested: quantity, held });
        }
        self.map.insert(key, held - quantity);
        Ok(())
    }

    /// Moves `quantity` between holders of the same (event, class).
    ///
    /// Recipient is credited before the sender is debited; the prior
    /// sufficiency check makes the two orderings observationally equivalent,
    /// including for self-transfers.
    ///
    /// # Errors
    ///
    /// `InsufficientHolding` if the sender cannot cover the quantity; no
    /// entry changes in that case.
    pub fn transfer(
        &mut self,
        from: PartyId,
        to: PartyId,
        event: EventId,
        class: &str,
        quantity: u32,
    ) -> Result<()> {
        let held = self.quantity(from, event, class);
        if held < quantity {
            return Err(TicketError::InsufficientHolding { requested: quantity, held });
        }
        self.credit(to, event, class, quantity);
        self.debit(from, event, class, quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn untouched_holdings_read_as_zero() {
        let holdings = Holdings::new();
        assert_eq!(holdings.quantity(PartyId::new(), EventId::new(1), "GA"), 0);
    }

    #[test]
    fn debit_never_goes_negative() {
        let mut holdings = Holdings::new();
        let holder = PartyId::new();
        let event = EventId::new(1);

        holdings.credit(holder, event, "GA", 2);
        assert_eq!(
            holdings.debit(holder, event, "GA", 3),
            Err(TicketError::InsufficientHolding { requested: 3, held: 2 })
        );
        assert_eq!(holdings.quantity(holder, event, "GA"), 2);

        holdings.debit(holder, event, "GA", 2).unwrap();
        assert_eq!(holdings.quantity(holder, event, "GA"), 0);
    }

    #[test]
    fn class_names_are_case_sensitive_keys() {
        let mut holdings = Holdings::new();
        let holder = PartyId::new();
        let event = EventId::new(1);

        holdings.credit(holder, event, "GA", 1);
        assert_eq!(holdings.quantity(holder, event, "ga"), 0);
        assert_eq!(holdings.quantity(holder, event, "GA"), 1);
    }

    #[test]
    fn transfer_to_self_is_a_net_noop() {
        let mut holdings = Holdings::new();
        let holder = PartyId::new();
        let event = EventId::new(1);

        holdings.credit(holder, event, "GA", 3);
        holdings.transfer(holder, holder, event, "GA", 2).unwrap();
        assert_eq!(holdings.quantity(holder, event, "GA"), 3);
    }

    #[test]
    fn failed_transfer_leaves_both_sides_untouched() {
        let mut holdings = Holdings::new();
        let sender = PartyId::new();
        let recipient = PartyId::new();
        let event = EventId::new(1);

        holdings.credit(sender, event, "GA", 1);
        assert!(holdings.transfer(sender, recipient, event, "GA", 2).is_err());
        assert_eq!(holdings.quantity(sender, event, "GA"), 1);
        assert_eq!(holdings.quantity(recipient, event, "GA"), 0);
    }
}
