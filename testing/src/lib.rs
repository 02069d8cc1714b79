//! # Box Office Testing
//!
//! Deterministic mocks for the ledger's injected dependencies:
//!
//! - [`mocks::FixedClock`]: settable time, so tests can place themselves on
//!   either side of the booking and refund windows.
//! - [`mocks::RecordingGateway`]: captures settlement legs and can be
//!   scripted to fail the next leg, for rollback tests.

use box_office_core::environment::Clock;
use box_office_core::settlement::{
    SettlementError, SettlementGateway, SettlementReceipt, SettlementResult,
};
use box_office_core::{Money, PartyId};
use chrono::{DateTime, Duration, Utc};

/// Mock implementations of the environment traits.
pub mod mocks {
    use super::{
        Clock, DateTime, Duration, Money, PartyId, SettlementError, SettlementGateway,
        SettlementReceipt, SettlementResult, Utc,
    };
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Settable clock for deterministic tests.
    ///
    /// Starts at a chosen instant and only moves when told to, making window
    /// checks reproducible.
    #[derive(Debug)]
    pub struct FixedClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        /// Create a clock frozen at the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time: Mutex::new(time) }
        }

        /// Jump to an absolute time
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }

        /// Move the clock forward (or back, with a negative delta)
        pub fn advance(&self, delta: Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += delta;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// One recorded settlement leg.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum SettlementLeg {
        /// Value pulled from a payer
        Collected {
            /// Paying identity
            payer: PartyId,
            /// Amount collected
            amount: Money,
        },
        /// Value pushed to a payee
        Disbursed {
            /// Receiving identity
            payee: PartyId,
            /// Amount disbursed
            amount: Money,
        },
    }

    /// Settlement gateway that records every completed leg.
    ///
    /// `fail_next` scripts exactly one failure; the failed leg is not
    /// recorded, mirroring a transfer that never happened.
    #[derive(Clone, Debug, Default)]
    pub struct RecordingGateway {
        legs: Arc<Mutex<Vec<SettlementLeg>>>,
        fail_next: Arc<AtomicBool>,
        sequence: Arc<AtomicU64>,
    }

    impl RecordingGateway {
        /// Creates an empty recording gateway
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// All legs completed so far, in order
        #[must_use]
        pub fn legs(&self) -> Vec<SettlementLeg> {
            self.legs.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        /// Make the next leg fail with a scripted decline
        pub fn fail_next(&self) {
            self.fail_next.store(true, Ordering::SeqCst);
        }

        fn take_scripted_failure(&self) -> bool {
            self.fail_next.swap(false, Ordering::SeqCst)
        }

        fn record(&self, leg: SettlementLeg) -> SettlementReceipt {
            let amount = match &leg {
                SettlementLeg::Collected { amount, .. } | SettlementLeg::Disbursed { amount, .. } => {
                    *amount
                }
            };
            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
            self.legs.lock().unwrap_or_else(PoisonError::into_inner).push(leg);
            SettlementReceipt { settlement_id: format!("test_leg_{sequence}"), amount }
        }
    }

    impl SettlementGateway for RecordingGateway {
        fn collect(
            &self,
            payer: PartyId,
            amount: Money,
        ) -> Pin<Box<dyn Future<Output = SettlementResult<SettlementReceipt>> + Send>> {
            let gateway = self.clone();
            Box::pin(async move {
                if gateway.take_scripted_failure() {
                    return Err(SettlementError::Declined { reason: "scripted failure".to_string() });
                }
                Ok(gateway.record(SettlementLeg::Collected { payer, amount }))
            })
        }

        fn disburse(
            &self,
            payee: PartyId,
            amount: Money,
        ) -> Pin<Box<dyn Future<Output = SettlementResult<SettlementReceipt>> + Send>> {
            let gateway = self.clone();
            Box::pin(async move {
                if gateway.take_scripted_failure() {
                    return Err(SettlementError::Declined { reason: "scripted failure".to_string() });
                }
                Ok(gateway.record(SettlementLeg::Disbursed { payee, amount }))
            })
        }
    }
}
