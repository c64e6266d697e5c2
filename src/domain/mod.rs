// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod analytics_event;
pub mod payment;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Payment Domain
pub use payment::{
    validate_amount, validate_pending_transaction, CallbackStatus, PaymentCallback,
    PaymentValidation, PendingTransaction, TransactionState, MAX_PAYMENT_AMOUNT,
    MIN_PAYMENT_AMOUNT,
};

// Analytics (Derived Data)
pub use analytics_event::{hash_authority, validate_analytics_event, AnalyticsEvent};

/// Current time at the precision the store keeps (milliseconds).
pub fn current_time() -> chrono::DateTime<chrono::Utc> {
    use chrono::SubsecRound;
    chrono::Utc::now().trunc_subsecs(3)
}

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Amount {amount} is below the gateway minimum of {minimum}")]
    AmountBelowMinimum { amount: u64, minimum: u64 },

    #[error("Amount {amount} exceeds the maximum of {maximum}")]
    AmountAboveMaximum { amount: u64, maximum: u64 },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
