// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO event emission
// - State transitions are single SQL statements (compare-and-swap)
// - Explicit SQL only

pub mod analytics_repository;
pub mod pending_transaction_repository;

pub use analytics_repository::{AnalyticsRepository, SqliteAnalyticsRepository};
pub use pending_transaction_repository::{
    PendingTransactionRepository, SqlitePendingTransactionRepository,
};
