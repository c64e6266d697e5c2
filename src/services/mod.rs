// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod analytics_service;
pub mod authority_locks;
pub mod payment_service;


// Re-export all services and their types
pub use analytics_service::AnalyticsService;

pub use authority_locks::{AuthorityGuard, AuthorityLocks};

pub use payment_service::{
    InitiatePaymentRequest,
    PaymentService,
    PaymentSession,
    PurgeReport,
    PURGE_CACHE_KEY,
};
