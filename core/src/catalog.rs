//! The event catalog: definitions and per-class remaining supply.
//!
//! Events are created once by the authority and never deleted; only the
//! remaining counts change afterwards. The catalog assumes its input has
//! already passed the validation gate.

use crate::error::{Result, TicketError};
use crate::types::{ClassAvailability, EventId, EventRecord, Money, PartyId, TicketClass};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Event storage with sequential id allocation.
#[derive(Clone, Debug)]
pub struct Catalog {
    events: BTreeMap<EventId, EventRecord>,
    next_id: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Creates an empty catalog. Ids start at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: BTreeMap::new(), next_id: 1 }
    }

    /// Stores a new event from gate-validated input and returns its id.
    ///
    /// The three class lists must already be of equal length with counts
    /// summing to `total_tickets`; they are zipped into `TicketClass` records
    /// in creation order.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        authority: PartyId,
        name: String,
        starts_at: DateTime<Utc>,
        total_tickets: u32,
        class_names: Vec<String>,
        class_prices: Vec<Money>,
        class_counts: Vec<u32>,
    ) -> EventId {
        let id = EventId::new(self.next_id);
        self.next_id += 1;

        let classes = class_names
            .into_iter()
            .zip(class_prices)
            .zip(class_counts)
            .map(|((class_name, price), remaining)| TicketClass { name: class_name, price, remaining })
            .collect();

        let record = EventRecord {
            id,
            authority,
            name,
            starts_at,
            remaining: total_tickets,
            classes,
        };

        tracing::info!(
            event = id.value(),
            name = %record.name,
            starts_at = %record.starts_at,
            total = total_tickets,
            classes = record.classes.len(),
            "event created"
        );

        self.events.insert(id, record);
        id
    }

    /// Looks up an event record.
    ///
    /// # Errors
    ///
    /// `EventNotFound` if no event with this id was ever created.
    pub fn get(&self, id: EventId) -> Result<&EventRecord> {
        self.events.get(&id).ok_or(TicketError::EventNotFound)
    }

    /// Mutable lookup, same failure mode as [`Catalog::get`].
    ///
    /// # Errors
    ///
    /// `EventNotFound` if no event with this id was ever created.
    pub fn get_mut(&mut self, id: EventId) -> Result<&mut EventRecord> {
        self.events.get_mut(&id).ok_or(TicketError::EventNotFound)
    }

    /// Availability rows for an event, in creation-time class order.
    ///
    /// # Errors
    ///
    /// `EventNotFound` for an unknown id.
    pub fn availability(&self, id: EventId) -> Result<Vec<ClassAvailability>> {
        let record = self.get(id)?;
        Ok(record
            .classes
            .iter()
            .map(|class| ClassAvailability {
                class: class.name.clone(),
                price: class.price,
                remaining: class.remaining,
            })
            .collect())
    }

    /// Human-readable availability listing, one line per class.
    ///
    /// An event with no classes yields an empty string.
    ///
    /// # Errors
    ///
    /// `EventNotFound` for an unknown id.
    pub fn describe_availability(&self, id: EventId) -> Result<String> {
        let rows = self.availability(id)?;
        let mut out = String::new();
        for row in rows {
            let _ = writeln!(out, "{row}");
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(catalog: &mut Catalog) -> EventId {
        catalog.create(
            PartyId::new(),
            "Concert".to_string(),
            Utc.with_ymd_and_hms(2025, 6, 8, 20, 0, 0).unwrap(),
            10,
            vec!["VIP".to_string(), "GA".to_string()],
            vec![Money::from_cents(10_000), Money::from_cents(5_000)],
            vec![2, 8],
        )
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut catalog = Catalog::new();
        let first = sample(&mut catalog);
        let second = sample(&mut catalog);
        assert_eq!(first, EventId::new(1));
        assert_eq!(second, EventId::new(2));
    }

    #[test]
    fn lookup_of_unknown_id_fails() {
        let mut catalog = Catalog::new();
        sample(&mut catalog);
        assert_eq!(catalog.get(EventId::new(7)).unwrap_err(), TicketError::EventNotFound);
    }

    #[test]
    fn availability_preserves_creation_order() {
        let mut catalog = Catalog::new();
        let id = sample(&mut catalog);

        let rows = catalog.availability(id).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].class, "VIP");
        assert_eq!(rows[0].remaining, 2);
        assert_eq!(rows[1].class, "GA");
        assert_eq!(rows[1].remaining, 8);

        let listing = catalog.describe_availability(id).unwrap();
        assert_eq!(listing, "VIP: $100.00 (2 remaining)\nGA: $50.00 (8 remaining)\n");
    }

    #[test]
    fn empty_event_describes_as_empty() {
        let mut catalog = Catalog::new();
        // The gate would reject a zero-class event with a nonzero total; the
        // catalog itself renders it gracefully regardless.
        let id = catalog.create(
            PartyId::new(),
            "Empty".to_string(),
            Utc.with_ymd_and_hms(2025, 6, 8, 20, 0, 0).unwrap(),
            0,
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(catalog.describe_availability(id).unwrap(), "");
    }
}
