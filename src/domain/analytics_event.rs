// src/domain/analytics_event.rs
//
// Analytics Event Entity
//
// A flattened record of something that happened in the payment flow.
// Derived data only: it can be dropped at any time without affecting
// payments, and it never stores a raw gateway authority.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: Uuid,

    /// Event name, e.g. "payment_verified"
    pub name: String,

    /// SHA-256 hex digest of the authority, if the event concerns one
    pub authority_hash: Option<String>,

    pub order_id: Option<String>,

    pub amount: Option<u64>,

    /// Free-form detail (rejection reason, purge count)
    pub detail: Option<String>,

    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            authority_hash: None,
            order_id: None,
            amount: None,
            detail: None,
            occurred_at,
        }
    }

    pub fn with_authority(mut self, authority: &str) -> Self {
        self.authority_hash = Some(hash_authority(authority));
        self
    }

    pub fn with_order(mut self, order_id: impl Into<String>, amount: u64) -> Self {
        self.order_id = Some(order_id.into());
        self.amount = Some(amount);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Stable digest of a gateway authority.
pub fn hash_authority(authority: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(authority.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates AnalyticsEvent invariants
pub fn validate_analytics_event(event: &AnalyticsEvent) -> DomainResult<()> {
    if event.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Analytics event name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
