// src/application/commands/payment_commands.rs
//
// Payment Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::error_handling::ToErrorResponse;
use crate::application::{dto::*, state::AppState};
use crate::domain::PaymentCallback;

/// Open a gateway session for an order
pub async fn initiate_payment(
    state: &AppState,
    dto: InitiatePaymentDto,
) -> Result<PaymentSessionDto, String> {
    state
        .payment_service
        .initiate_payment(dto.into())
        .await
        .map(PaymentSessionDto::from)
        .to_error_response()
}

/// Validate the gateway redirect the client was sent back with
pub async fn handle_payment_callback(
    state: &AppState,
    callback_url: String,
) -> Result<PaymentValidationDto, String> {
    let callback = PaymentCallback::from_url(&callback_url).to_error_response()?;

    state
        .payment_service
        .handle_callback(&callback)
        .await
        .map(PaymentValidationDto::from)
        .to_error_response()
}

pub async fn get_transaction(state: &AppState, authority: String) -> Result<TransactionDto, String> {
    state
        .payment_service
        .get_transaction(&authority)
        .map(TransactionDto::from)
        .to_error_response()
}

pub async fn purge_stale_transactions(
    state: &AppState,
    force: bool,
) -> Result<PurgeReportDto, String> {
    state
        .payment_service
        .purge_stale_transactions(force)
        .map(PurgeReportDto::from)
        .to_error_response()
}
