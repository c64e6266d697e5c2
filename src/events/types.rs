// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($ty:ident) => {
        impl DomainEvent for $ty {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($ty)
            }
        }
    };
}

// ============================================================================
// PAYMENT EVENTS
// ============================================================================

/// Emitted when the gateway issued an authority and the pending
/// transaction was stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitiated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub authority: String,
    pub order_id: String,
    pub amount: u64,
}

impl PaymentInitiated {
    pub fn new(authority: String, order_id: String, amount: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            authority,
            order_id,
            amount,
        }
    }
}

impl_domain_event!(PaymentInitiated);

/// Emitted once per transaction, when the gateway confirmed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerified {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub authority: String,
    pub order_id: String,
    pub amount: u64,
    pub ref_id: String,
}

impl PaymentVerified {
    pub fn new(authority: String, order_id: String, amount: u64, ref_id: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            authority,
            order_id,
            amount,
            ref_id,
        }
    }
}

impl_domain_event!(PaymentVerified);

/// Emitted when a callback did not lead to a verified payment
/// (bad status, cancellation, unknown authority, expiry, gateway failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCallbackRejected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub authority: String,
    /// Error category, e.g. "payment", "validation"
    pub kind: String,
    pub reason: String,
}

impl PaymentCallbackRejected {
    pub fn new(authority: String, kind: String, reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            authority,
            kind,
            reason,
        }
    }
}

impl_domain_event!(PaymentCallbackRejected);

/// Emitted when a callback arrives for an authority that is already verified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayAttemptDetected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub authority: String,
}

impl ReplayAttemptDetected {
    pub fn new(authority: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            authority,
        }
    }
}

impl_domain_event!(ReplayAttemptDetected);

/// Emitted after a stale-transaction sweep removed rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleTransactionsPurged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub removed: usize,
    pub cutoff: DateTime<Utc>,
}

impl StaleTransactionsPurged {
    pub fn new(removed: usize, cutoff: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            removed,
            cutoff,
        }
    }
}

impl_domain_event!(StaleTransactionsPurged);
