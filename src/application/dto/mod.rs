// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are client-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO), except request DTOs

use serde::{Deserialize, Serialize};

use crate::domain::{PaymentValidation, PendingTransaction};
use crate::services::{InitiatePaymentRequest, PaymentSession, PurgeReport};

// ============================================================================
// PAYMENT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentDto {
    pub order_id: String,
    pub amount: u64,
    pub description: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSessionDto {
    pub authority: String,
    pub payment_url: String,
    pub order_id: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentValidationDto {
    pub is_valid: bool,
    pub ref_id: String,
    pub order_id: String,
    pub amount: u64,
    pub card_pan: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDto {
    pub authority: String,
    pub order_id: String,
    pub amount: u64,
    pub state: String,
    pub created_at: String,
    pub verified_at: Option<String>,
    pub ref_id: Option<String>,
}

// ============================================================================
// MAINTENANCE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeReportDto {
    pub removed: usize,
    pub cutoff: String,
    pub skipped: bool,
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<InitiatePaymentDto> for InitiatePaymentRequest {
    fn from(dto: InitiatePaymentDto) -> Self {
        Self {
            order_id: dto.order_id,
            amount: dto.amount,
            description: dto.description,
            mobile: dto.mobile.filter(|m| !m.trim().is_empty()),
            email: dto.email.filter(|e| !e.trim().is_empty()),
        }
    }
}

impl From<PaymentSession> for PaymentSessionDto {
    fn from(session: PaymentSession) -> Self {
        Self {
            authority: session.authority,
            payment_url: session.payment_url,
            order_id: session.order_id,
            amount: session.amount,
        }
    }
}

impl From<PaymentValidation> for PaymentValidationDto {
    fn from(validation: PaymentValidation) -> Self {
        Self {
            is_valid: validation.is_valid,
            ref_id: validation.ref_id,
            order_id: validation.order_id,
            amount: validation.amount,
            card_pan: validation.card_pan,
        }
    }
}

impl From<PendingTransaction> for TransactionDto {
    fn from(tx: PendingTransaction) -> Self {
        Self {
            authority: tx.authority,
            order_id: tx.order_id,
            amount: tx.amount,
            state: tx.state.to_string(),
            created_at: tx.created_at.to_rfc3339(),
            verified_at: tx.verified_at.map(|dt| dt.to_rfc3339()),
            ref_id: tx.ref_id,
        }
    }
}

impl From<PurgeReport> for PurgeReportDto {
    fn from(report: PurgeReport) -> Self {
        Self {
            removed: report.removed,
            cutoff: report.cutoff.to_rfc3339(),
            skipped: report.skipped,
        }
    }
}
