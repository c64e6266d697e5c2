// src/integrations/gateway.rs
//
// Payment gateway seam.
//
// Services depend on this trait only; ZarinpalClient is the production
// implementation and tests substitute a mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// What the store asks the gateway to charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: String,
    /// Rial
    pub amount: u64,
    pub description: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

/// A payment session opened at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySession {
    pub authority: String,
}

/// Gateway confirmation of a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayVerification {
    pub ref_id: String,
    pub card_pan: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment session and return its authority.
    async fn request_payment(&self, request: &PaymentRequest) -> AppResult<GatewaySession>;

    /// Confirm that `authority` was paid for exactly `amount`.
    async fn verify_payment(&self, authority: &str, amount: u64) -> AppResult<GatewayVerification>;

    /// URL the customer is sent to for paying `authority`.
    fn payment_url(&self, authority: &str) -> String;
}
