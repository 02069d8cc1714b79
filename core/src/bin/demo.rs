//! Box office walkthrough.
//!
//! Creates an event, waits for the booking window, and runs a purchase and a
//! transfer against the mock settlement gateway.
//!
//! Note the deliberately inverted window rule: booking opens once
//! the event's scheduled time has passed, so the demo schedules the event a
//! few seconds out and waits. Refunds close 24 hours before the start and are
//! therefore out of reach on a seconds-long timeline.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use box_office_core::environment::SystemClock;
use box_office_core::settlement::MockSettlementGateway;
use box_office_core::{BoxOffice, Money, PartyId};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let authority = PartyId::new();
    let office = BoxOffice::new(authority, Arc::new(SystemClock), MockSettlementGateway::shared());

    println!("Box Office demo");
    println!("  authority: {authority}\n");

    // 1. Authority creates the event, scheduled a few seconds out.
    let starts_at = chrono::Utc::now() + chrono::Duration::seconds(3);
    let event_id = office
        .create_event(
            authority,
            "Summer Music Festival".to_string(),
            starts_at,
            10,
            vec!["VIP".to_string(), "GA".to_string()],
            vec![Money::from_cents(10_000), Money::from_cents(5_000)],
            vec![2, 8],
        )
        .await?;

    println!("1. event #{event_id} created, availability:");
    print!("{}", office.describe_availability(event_id).await?);

    // 2. Booking opens only after the scheduled time has passed.
    let alice = PartyId::new();
    let early = office.buy_tickets(alice, event_id, "GA", 1, Money::from_cents(5_000)).await;
    println!("\n2. purchase before the start time: {early:?}");

    tokio::time::sleep(std::time::Duration::from_secs(4)).await;

    office.buy_tickets(alice, event_id, "GA", 2, Money::from_cents(10_000)).await?;
    println!("\n3. alice bought 2 GA, availability now:");
    print!("{}", office.describe_availability(event_id).await?);

    // 3. Transfer one of them on.
    let bob = PartyId::new();
    office.transfer_tickets(alice, event_id, "GA", 1, bob).await?;
    println!("\n4. after transfer:");
    println!("   alice holds {}", office.my_holding(alice, event_id, "GA").await);
    println!("   bob holds {}", office.my_holding(bob, event_id, "GA").await);

    Ok(())
}
