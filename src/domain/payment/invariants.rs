use super::entity::{PendingTransaction, TransactionState};
use crate::domain::{DomainError, DomainResult};

/// Smallest amount the gateway accepts, in Rial.
pub const MIN_PAYMENT_AMOUNT: u64 = 1_000;

/// Largest amount the transaction store can hold, in Rial.
pub const MAX_PAYMENT_AMOUNT: u64 = i64::MAX as u64;

/// Validates all PendingTransaction invariants
pub fn validate_pending_transaction(tx: &PendingTransaction) -> DomainResult<()> {
    validate_identity(tx)?;
    validate_amount(tx.amount)?;
    validate_verification(tx)?;
    Ok(())
}

fn validate_identity(tx: &PendingTransaction) -> DomainResult<()> {
    if tx.authority.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "authority cannot be empty".to_string(),
        ));
    }
    if tx.order_id.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "order_id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_amount(amount: u64) -> DomainResult<()> {
    if amount < MIN_PAYMENT_AMOUNT {
        return Err(DomainError::AmountBelowMinimum {
            amount,
            minimum: MIN_PAYMENT_AMOUNT,
        });
    }
    if amount > MAX_PAYMENT_AMOUNT {
        return Err(DomainError::AmountAboveMaximum {
            amount,
            maximum: MAX_PAYMENT_AMOUNT,
        });
    }
    Ok(())
}

/// Verification invariants:
/// 1. A verified transaction carries ref_id and verified_at
/// 2. Only verified transactions carry verification data
/// 3. verified_at never precedes created_at
fn validate_verification(tx: &PendingTransaction) -> DomainResult<()> {
    match tx.state {
        TransactionState::Verified => {
            let verified_at = tx.verified_at.ok_or_else(|| {
                DomainError::InvariantViolation(format!(
                    "verified transaction {} has no verified_at",
                    tx.authority
                ))
            })?;
            if tx.ref_id.as_deref().map_or(true, str::is_empty) {
                return Err(DomainError::InvariantViolation(format!(
                    "verified transaction {} has no ref_id",
                    tx.authority
                )));
            }
            if verified_at < tx.created_at {
                return Err(DomainError::InvariantViolation(format!(
                    "transaction {} verified before it was created",
                    tx.authority
                )));
            }
        }
        TransactionState::Created | TransactionState::Expired => {
            if tx.verified_at.is_some() || tx.ref_id.is_some() {
                return Err(DomainError::InvariantViolation(format!(
                    "unverified transaction {} carries verification data",
                    tx.authority
                )));
            }
        }
    }
    Ok(())
}
