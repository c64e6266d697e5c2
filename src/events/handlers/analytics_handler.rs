// src/events/handlers/analytics_handler.rs
//
// Analytics Event Handler
//
// Bridge between the event bus and the AnalyticsService.
//
// CRITICAL RULES:
// - Maps payment events to analytics records, nothing else
// - Never fails: AnalyticsService swallows its own errors
// - Uses closure-based subscription (EventHandler is internal to bus)

use std::sync::Arc;

use crate::domain::AnalyticsEvent;
use crate::events::{
    EventBus, PaymentCallbackRejected, PaymentInitiated, PaymentVerified, ReplayAttemptDetected,
    StaleTransactionsPurged,
};
use crate::services::AnalyticsService;

pub const PAYMENT_INITIATED: &str = "payment_initiated";
pub const PAYMENT_VERIFIED: &str = "payment_verified";
pub const PAYMENT_REJECTED: &str = "payment_rejected";
pub const PAYMENT_REPLAY: &str = "payment_replay_attempt";
pub const TRANSACTIONS_PURGED: &str = "pending_transactions_purged";

/// Registers all analytics handlers with the event bus.
pub fn register_analytics_handlers(bus: &EventBus, service: Arc<AnalyticsService>) {
    let s = Arc::clone(&service);
    bus.subscribe::<PaymentInitiated, _>(move |event| {
        s.track(
            AnalyticsEvent::new(PAYMENT_INITIATED, event.occurred_at)
                .with_authority(&event.authority)
                .with_order(event.order_id.clone(), event.amount),
        );
    });

    let s = Arc::clone(&service);
    bus.subscribe::<PaymentVerified, _>(move |event| {
        s.track(
            AnalyticsEvent::new(PAYMENT_VERIFIED, event.occurred_at)
                .with_authority(&event.authority)
                .with_order(event.order_id.clone(), event.amount),
        );
    });

    let s = Arc::clone(&service);
    bus.subscribe::<PaymentCallbackRejected, _>(move |event| {
        s.track(
            AnalyticsEvent::new(PAYMENT_REJECTED, event.occurred_at)
                .with_authority(&event.authority)
                .with_detail(format!("{}: {}", event.kind, event.reason)),
        );
    });

    let s = Arc::clone(&service);
    bus.subscribe::<ReplayAttemptDetected, _>(move |event| {
        s.track(
            AnalyticsEvent::new(PAYMENT_REPLAY, event.occurred_at).with_authority(&event.authority),
        );
    });

    bus.subscribe::<StaleTransactionsPurged, _>(move |event| {
        service.track(
            AnalyticsEvent::new(TRANSACTIONS_PURGED, event.occurred_at)
                .with_detail(event.removed.to_string()),
        );
    });

    log::debug!("Analytics handlers registered");
}
