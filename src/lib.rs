// src/lib.rs
// Noghre Sod - payment core of the jewelry store client
//
// Architecture:
// - Domain-centric: transaction rules live in the domain
// - Event-driven: services announce payment facts, analytics listens
// - Explicit: every failure is a typed AppError, no panics
// - Application Layer: client boundary (DTOs + JSON errors)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod cache;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_pending_transaction,
    AnalyticsEvent,
    CallbackStatus,
    PaymentCallback,
    PaymentValidation,
    PendingTransaction,
    TransactionState,
    MAX_PAYMENT_AMOUNT,
    MIN_PAYMENT_AMOUNT,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult, ErrorKind, PaymentError, SecurityError};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    register_analytics_handlers,
    DomainEvent,
    EventBus,
    EventLogEntry,
    PaymentCallbackRejected,
    PaymentInitiated,
    PaymentVerified,
    ReplayAttemptDetected,
    StaleTransactionsPurged,
};

// ============================================================================
// PUBLIC API - Infrastructure
// ============================================================================

pub use cache::CacheManager;
pub use config::AppConfig;
pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{
    AnalyticsRepository,
    PendingTransactionRepository,
    SqliteAnalyticsRepository,
    SqlitePendingTransactionRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AnalyticsService,
    InitiatePaymentRequest,
    PaymentService,
    PaymentSession,
    PurgeReport,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{PaymentGateway, ZarinpalClient};
