// src/services/payment_service.rs
//
// Payment Service - initiation, callback validation, cleanup
//
// CALLBACK VALIDATION ORDER:
// 1. Unknown status        -> Validation (nothing touched)
// 2. NOK                   -> Payment::Cancelled (nothing touched)
// 3. Unknown authority     -> Payment::TransactionNotFound
// 4. Already verified      -> Security::ReplayAttack (gateway NOT called)
// 5. Older than the TTL    -> Payment::Expired (gateway NOT called)
// 6. Gateway verify with the STORED amount
// 7. Persist verified state, return PaymentValidation
// 8. Gateway failure       -> propagated unchanged
//
// CRITICAL RULES:
// - Steps 3..7 run under the per-authority lock
// - Persist is a compare-and-swap from `created`; losing it is a replay
// - The amount sent for verification never comes from the callback

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::CacheManager;
use crate::config::PaymentConfig;
use crate::domain::{
    current_time, validate_amount, validate_pending_transaction, CallbackStatus, PaymentCallback,
    PaymentValidation, PendingTransaction, TransactionState,
};
use crate::error::{AppError, AppResult, PaymentError, SecurityError};
use crate::events::{
    EventBus, PaymentCallbackRejected, PaymentInitiated, PaymentVerified, ReplayAttemptDetected,
    StaleTransactionsPurged,
};
use crate::integrations::{PaymentGateway, PaymentRequest};
use crate::repositories::PendingTransactionRepository;
use crate::services::authority_locks::AuthorityLocks;

/// Cache key tracking the last stale-transaction sweep
pub const PURGE_CACHE_KEY: &str = "payments:purge_stale";

#[derive(Debug, Clone)]
pub struct InitiatePaymentRequest {
    pub order_id: String,
    /// Rial
    pub amount: u64,
    pub description: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

/// Result of a successful initiation: where to send the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub authority: String,
    pub payment_url: String,
    pub order_id: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    pub removed: usize,
    pub cutoff: DateTime<Utc>,
    /// True when the sweep interval had not elapsed and nothing ran
    pub skipped: bool,
}

pub struct PaymentService {
    tx_repo: Arc<dyn PendingTransactionRepository>,
    gateway: Arc<dyn PaymentGateway>,
    event_bus: Arc<EventBus>,
    cache: Arc<CacheManager>,
    config: PaymentConfig,
    locks: AuthorityLocks,
}

impl PaymentService {
    pub fn new(
        tx_repo: Arc<dyn PendingTransactionRepository>,
        gateway: Arc<dyn PaymentGateway>,
        event_bus: Arc<EventBus>,
        cache: Arc<CacheManager>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            tx_repo,
            gateway,
            event_bus,
            cache,
            config,
            locks: AuthorityLocks::new(),
        }
    }

    // ========================================================================
    // INITIATION
    // ========================================================================

    pub async fn initiate_payment(
        &self,
        request: InitiatePaymentRequest,
    ) -> AppResult<PaymentSession> {
        if request.order_id.trim().is_empty() {
            return Err(AppError::Validation("order_id cannot be empty".to_string()));
        }
        if request.description.trim().is_empty() {
            return Err(AppError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        validate_amount(request.amount).map_err(AppError::Domain)?;

        let gateway_request = PaymentRequest {
            order_id: request.order_id.clone(),
            amount: request.amount,
            description: request.description.clone(),
            mobile: request.mobile,
            email: request.email,
        };
        let session = self.gateway.request_payment(&gateway_request).await?;

        let tx = PendingTransaction::new(
            session.authority,
            request.order_id,
            request.amount,
            request.description,
        );
        validate_pending_transaction(&tx).map_err(AppError::Domain)?;
        if let Err(e) = self.tx_repo.save(&tx) {
            log::error!(
                "Gateway session {} for order {} was opened but not stored: {}",
                tx.authority,
                tx.order_id,
                e
            );
            return Err(e);
        }

        log::info!(
            "Payment initiated for order {} ({} Rial)",
            tx.order_id,
            tx.amount
        );
        self.event_bus.emit(PaymentInitiated::new(
            tx.authority.clone(),
            tx.order_id.clone(),
            tx.amount,
        ));

        Ok(PaymentSession {
            payment_url: self.gateway.payment_url(&tx.authority),
            authority: tx.authority,
            order_id: tx.order_id,
            amount: tx.amount,
        })
    }

    // ========================================================================
    // CALLBACK VALIDATION
    // ========================================================================

    /// Validate a gateway callback and, on success, mark the transaction
    /// verified exactly once.
    pub async fn validate_callback(
        &self,
        authority: &str,
        status: &str,
    ) -> AppResult<PaymentValidation> {
        match self.validate_inner(authority, status).await {
            Ok(validation) => {
                log::info!(
                    "Payment verified for order {} (ref {})",
                    validation.order_id,
                    validation.ref_id
                );
                Ok(validation)
            }
            Err(err) => {
                if !matches!(err, AppError::Security(SecurityError::ReplayAttack { .. })) {
                    log::warn!("Payment callback rejected: {}", err);
                    self.event_bus.emit(PaymentCallbackRejected::new(
                        authority.to_string(),
                        err.kind().as_str().to_string(),
                        err.to_string(),
                    ));
                }
                Err(err)
            }
        }
    }

    pub async fn handle_callback(&self, callback: &PaymentCallback) -> AppResult<PaymentValidation> {
        self.validate_callback(&callback.authority, &callback.status)
            .await
    }

    async fn validate_inner(&self, authority: &str, status: &str) -> AppResult<PaymentValidation> {
        let status = CallbackStatus::parse(status).ok_or_else(|| {
            AppError::Validation(format!("Unknown payment status '{}'", status))
        })?;
        if status == CallbackStatus::Nok {
            return Err(PaymentError::Cancelled.into());
        }

        let _guard = self.locks.acquire(authority).await;

        let mut pending = self.tx_repo.get_by_authority(authority)?.ok_or_else(|| {
            PaymentError::TransactionNotFound {
                authority: authority.to_string(),
            }
        })?;

        if pending.is_verified() {
            return Err(self.replay(authority));
        }

        let now = current_time();
        if pending.state == TransactionState::Expired
            || pending.is_expired_at(now, self.config.transaction_ttl())
        {
            if pending.state == TransactionState::Created {
                if let Err(e) = self.tx_repo.mark_expired(authority) {
                    log::warn!("Could not mark transaction {} expired: {}", authority, e);
                }
            }
            return Err(PaymentError::Expired {
                authority: authority.to_string(),
                age_minutes: pending.age_at(now).num_minutes(),
            }
            .into());
        }

        let verification = self
            .gateway
            .verify_payment(authority, pending.amount)
            .await?;

        let verified_at = current_time();
        let ref_id = verification.ref_id.clone();
        pending
            .mark_verified(verification.ref_id, verification.card_pan, verified_at)
            .map_err(AppError::Domain)?;
        validate_pending_transaction(&pending).map_err(AppError::Domain)?;

        let swapped = self.tx_repo.mark_verified(
            authority,
            &ref_id,
            pending.card_pan.as_deref(),
            verified_at,
        )?;
        if !swapped {
            return Err(self.replay(authority));
        }

        self.event_bus.emit(PaymentVerified::new(
            authority.to_string(),
            pending.order_id.clone(),
            pending.amount,
            ref_id.clone(),
        ));

        Ok(PaymentValidation {
            is_valid: true,
            ref_id,
            order_id: pending.order_id,
            amount: pending.amount,
            card_pan: pending.card_pan,
        })
    }

    fn replay(&self, authority: &str) -> AppError {
        log::error!(
            "SECURITY: replayed payment callback for verified authority {}",
            authority
        );
        self.event_bus
            .emit(ReplayAttemptDetected::new(authority.to_string()));
        SecurityError::ReplayAttack {
            authority: authority.to_string(),
        }
        .into()
    }

    // ========================================================================
    // QUERIES & CLEANUP
    // ========================================================================

    pub fn get_transaction(&self, authority: &str) -> AppResult<PendingTransaction> {
        self.tx_repo
            .get_by_authority(authority)?
            .ok_or_else(|| AppError::NotFound("Transaction".to_string()))
    }

    pub fn transactions_for_order(&self, order_id: &str) -> AppResult<Vec<PendingTransaction>> {
        self.tx_repo.list_by_order(order_id)
    }

    /// Delete unverified transactions older than the retention window.
    /// Runs at most once per sweep interval unless `force` is set.
    pub fn purge_stale_transactions(&self, force: bool) -> AppResult<PurgeReport> {
        let now = current_time();
        let cutoff = now
            .checked_sub_signed(self.config.retention())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        if !force
            && !self
                .cache
                .is_stale_at(PURGE_CACHE_KEY, self.config.sweep_interval(), now)
        {
            log::debug!("Stale transaction sweep skipped, ran recently");
            return Ok(PurgeReport {
                removed: 0,
                cutoff,
                skipped: true,
            });
        }

        let removed = self.tx_repo.delete_stale(cutoff)?;
        self.cache.mark_refreshed_at(PURGE_CACHE_KEY, now);

        if removed > 0 {
            log::info!("Purged {} stale pending transactions", removed);
            self.event_bus
                .emit(StaleTransactionsPurged::new(removed, cutoff));
        }

        Ok(PurgeReport {
            removed,
            cutoff,
            skipped: false,
        })
    }
}
