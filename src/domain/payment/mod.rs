//! Critical Payment Invariants:
//!
//! 1. A transaction is keyed by the gateway authority, which never changes
//! 2. The amount verified with the gateway is the stored amount, never a client one
//! 3. A transaction is verified at most once
//! 4. Verified and Expired are terminal
//! 5. Verified rows are never purged

pub mod callback;
pub mod entity;
pub mod invariants;

pub use callback::{CallbackStatus, PaymentCallback};
pub use entity::{PaymentValidation, PendingTransaction, TransactionState};
pub use invariants::{
    validate_amount, validate_pending_transaction, MAX_PAYMENT_AMOUNT, MIN_PAYMENT_AMOUNT,
};
