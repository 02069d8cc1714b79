//! The validation gate: role and timing preconditions.
//!
//! One pure predicate per operation kind, each taking only the fields it
//! needs. No predicate touches mutable state; the operation surface runs the
//! matching gate before any catalog or ledger update.

use crate::error::{InvalidEventReason, Result, TicketError};
use crate::types::{Money, PartyId};
use chrono::{DateTime, Utc};

/// Gate for event creation.
///
/// The caller must be the authority, the name non-empty, the scheduled time
/// strictly in the future, the total positive, the three class lists of equal
/// length, and the per-class counts summing exactly to the declared total.
///
/// # Errors
///
/// `Unauthorized` for the role check, `InvalidEventDefinition` with the
/// specific sub-reason for everything else.
#[allow(clippy::too_many_arguments)]
pub fn create_event_gate(
    caller: PartyId,
    authority: PartyId,
    now: DateTime<Utc>,
    name: &str,
    starts_at: DateTime<Utc>,
    total_tickets: u32,
    class_names: &[String],
    class_prices: &[Money],
    class_counts: &[u32],
) -> Result<()> {
    if caller != authority {
        return Err(TicketError::Unauthorized);
    }

    if class_names.len() != class_prices.len() || class_names.len() != class_counts.len() {
        return Err(TicketError::InvalidEventDefinition(InvalidEventReason::LengthMismatch));
    }

    if name.is_empty() {
        return Err(TicketError::InvalidEventDefinition(InvalidEventReason::EmptyName));
    }

    if starts_at <= now {
        return Err(TicketError::InvalidEventDefinition(InvalidEventReason::DateNotInFuture));
    }

    if total_tickets == 0 {
        return Err(TicketError::InvalidEventDefinition(InvalidEventReason::ZeroTickets));
    }

    // Summed in u64 so aggregate counts past u32::MAX cannot wrap back onto
    // the declared total.
    let sum: u64 = class_counts.iter().map(|count| u64::from(*count)).sum();
    if sum != u64::from(total_tickets) {
        return Err(TicketError::InvalidEventDefinition(InvalidEventReason::CountMismatch {
            declared: total_tickets,
            sum,
        }));
    }

    Ok(())
}

/// Gate shared by buy and transfer.
///
/// The caller must not be the authority, and the event's scheduled time must
/// already be in the past: booking opens once the nominal start time has
/// passed, not before. This reads inverted from what a ticketing system
/// usually intends and is deliberately kept that way.
///
/// # Errors
///
/// `Unauthorized` if the caller is the authority, `WindowClosed` if the
/// event has not started yet.
pub fn booking_gate(
    caller: PartyId,
    authority: PartyId,
    now: DateTime<Utc>,
    starts_at: DateTime<Utc>,
) -> Result<()> {
    if caller == authority {
        return Err(TicketError::Unauthorized);
    }

    if starts_at >= now {
        return Err(TicketError::WindowClosed);
    }

    Ok(())
}

/// Gate for refunds.
///
/// The caller must not be the authority, and the current time must be
/// strictly before the event's refund cutoff
/// ([`crate::types::EventRecord::refund_cutoff`]).
///
/// # Errors
///
/// `Unauthorized` if the caller is the authority, `RefundWindowClosed` once
/// the cutoff has been reached.
pub fn refund_gate(
    caller: PartyId,
    authority: PartyId,
    now: DateTime<Utc>,
    cutoff: DateTime<Utc>,
) -> Result<()> {
    if caller == authority {
        return Err(TicketError::Unauthorized);
    }

    if cutoff <= now {
        return Err(TicketError::RefundWindowClosed);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap()
    }

    fn valid_classes() -> (Vec<String>, Vec<Money>, Vec<u32>) {
        (
            vec!["VIP".to_string(), "GA".to_string()],
            vec![Money::from_cents(10_000), Money::from_cents(5_000)],
            vec![2, 8],
        )
    }

    #[test]
    fn create_gate_accepts_well_formed_definition() {
        let authority = PartyId::new();
        let (names, prices, counts) = valid_classes();
        let result = create_event_gate(
            authority,
            authority,
            t0(),
            "Concert",
            t0() + Duration::days(7),
            10,
            &names,
            &prices,
            &counts,
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn create_gate_rejects_non_authority() {
        let (names, prices, counts) = valid_classes();
        let result = create_event_gate(
            PartyId::new(),
            PartyId::new(),
            t0(),
            "Concert",
            t0() + Duration::days(7),
            10,
            &names,
            &prices,
            &counts,
        );
        assert_eq!(result, Err(TicketError::Unauthorized));
    }

    #[test]
    fn create_gate_rejects_each_malformed_input() {
        let authority = PartyId::new();
        let (names, prices, counts) = valid_classes();
        let future = t0() + Duration::days(7);

        let empty_name =
            create_event_gate(authority, authority, t0(), "", future, 10, &names, &prices, &counts);
        assert_eq!(
            empty_name,
            Err(TicketError::InvalidEventDefinition(InvalidEventReason::EmptyName))
        );

        // Exactly "now" counts as not in the future.
        let at_now =
            create_event_gate(authority, authority, t0(), "Concert", t0(), 10, &names, &prices, &counts);
        assert_eq!(
            at_now,
            Err(TicketError::InvalidEventDefinition(InvalidEventReason::DateNotInFuture))
        );

        let zero_total = create_event_gate(
            authority, authority, t0(), "Concert", future, 0, &names, &prices, &counts,
        );
        assert_eq!(
            zero_total,
            Err(TicketError::InvalidEventDefinition(InvalidEventReason::ZeroTickets))
        );

        let wrong_total = create_event_gate(
            authority, authority, t0(), "Concert", future, 11, &names, &prices, &counts,
        );
        assert_eq!(
            wrong_total,
            Err(TicketError::InvalidEventDefinition(InvalidEventReason::CountMismatch {
                declared: 11,
                sum: 10,
            }))
        );

        let short_prices = vec![Money::from_cents(10_000)];
        let ragged = create_event_gate(
            authority, authority, t0(), "Concert", future, 10, &names, &short_prices, &counts,
        );
        assert_eq!(
            ragged,
            Err(TicketError::InvalidEventDefinition(InvalidEventReason::LengthMismatch))
        );
    }

    #[test]
    fn create_gate_count_sum_never_wraps() {
        // Counts whose u32 sum would wrap back onto the declared total must
        // still be rejected as a mismatch.
        let authority = PartyId::new();
        let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let prices = vec![Money::from_cents(100); 3];
        let counts = vec![2_147_483_648, 2_147_483_648, 10];

        let result = create_event_gate(
            authority,
            authority,
            t0(),
            "Concert",
            t0() + Duration::days(7),
            10,
            &names,
            &prices,
            &counts,
        );
        assert_eq!(
            result,
            Err(TicketError::InvalidEventDefinition(InvalidEventReason::CountMismatch {
                declared: 10,
                sum: 4_294_967_306,
            }))
        );
    }

    #[test]
    fn booking_gate_opens_only_after_the_start_time() {
        // Deliberately inverted relative to conventional ticketing: the
        // window opens once starts_at has passed.
        let authority = PartyId::new();
        let buyer = PartyId::new();

        assert_eq!(
            booking_gate(buyer, authority, t0(), t0() + Duration::hours(1)),
            Err(TicketError::WindowClosed)
        );
        assert_eq!(booking_gate(buyer, authority, t0(), t0()), Err(TicketError::WindowClosed));
        assert_eq!(booking_gate(buyer, authority, t0(), t0() - Duration::seconds(1)), Ok(()));
        assert_eq!(
            booking_gate(authority, authority, t0(), t0() - Duration::hours(1)),
            Err(TicketError::Unauthorized)
        );
    }

    #[test]
    fn refund_gate_closes_at_the_cutoff() {
        let authority = PartyId::new();
        let holder = PartyId::new();

        let ahead = t0() + Duration::hours(1);
        assert_eq!(refund_gate(holder, authority, t0(), ahead), Ok(()));

        // Exactly at the cutoff the window is already shut.
        assert_eq!(
            refund_gate(holder, authority, t0(), t0()),
            Err(TicketError::RefundWindowClosed)
        );
        assert_eq!(
            refund_gate(holder, authority, t0(), t0() - Duration::hours(1)),
            Err(TicketError::RefundWindowClosed)
        );

        assert_eq!(
            refund_gate(authority, authority, t0(), ahead),
            Err(TicketError::Unauthorized)
        );
    }
}
