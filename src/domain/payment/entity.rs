use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{current_time, DomainError, DomainResult};

/// A payment session opened with the gateway and awaiting its callback.
/// Keyed by the gateway-issued authority token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Opaque gateway token (immutable)
    pub authority: String,

    /// Order this payment settles
    pub order_id: String,

    /// Expected amount in Rial, as sent to the gateway
    pub amount: u64,

    /// Description sent to the gateway
    pub description: String,

    pub state: TransactionState,

    pub created_at: DateTime<Utc>,

    pub verified_at: Option<DateTime<Utc>>,

    /// Gateway reference id, set on verification
    pub ref_id: Option<String>,

    /// Masked card number reported by the gateway
    pub card_pan: Option<String>,
}

/// Lifecycle of a pending transaction.
///
/// Created -> Verified (terminal)
/// Created -> Expired  (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    Created,
    Verified,
    Expired,
}

/// Outcome of a successful callback validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentValidation {
    pub is_valid: bool,
    pub ref_id: String,
    pub order_id: String,
    pub amount: u64,
    pub card_pan: Option<String>,
}

impl PendingTransaction {
    pub fn new(authority: String, order_id: String, amount: u64, description: String) -> Self {
        Self {
            authority,
            order_id,
            amount,
            description,
            state: TransactionState::Created,
            created_at: current_time(),
            verified_at: None,
            ref_id: None,
            card_pan: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.state == TransactionState::Verified
    }

    /// True once `now` is strictly past `created_at + ttl`.
    /// A deadline beyond the representable range never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.created_at
            .checked_add_signed(ttl)
            .map_or(false, |deadline| now > deadline)
    }

    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Apply a successful gateway verification.
    pub fn mark_verified(
        &mut self,
        ref_id: String,
        card_pan: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.state != TransactionState::Created {
            return Err(DomainError::InvalidStateTransition(format!(
                "cannot verify transaction {} in state {}",
                self.authority, self.state
            )));
        }
        self.state = TransactionState::Verified;
        self.ref_id = Some(ref_id);
        self.card_pan = card_pan;
        self.verified_at = Some(now);
        Ok(())
    }

    pub fn to_validation(&self) -> Option<PaymentValidation> {
        let ref_id = self.ref_id.clone()?;
        Some(PaymentValidation {
            is_valid: self.is_verified(),
            ref_id,
            order_id: self.order_id.clone(),
            amount: self.amount,
            card_pan: self.card_pan.clone(),
        })
    }
}

impl TransactionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::Created => "created",
            TransactionState::Verified => "verified",
            TransactionState::Expired => "expired",
        }
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(TransactionState::Created),
            "verified" => Ok(TransactionState::Verified),
            "expired" => Ok(TransactionState::Expired),
            other => Err(format!("Unknown transaction state '{}'", other)),
        }
    }
}
