// src/services/analytics_service.rs
//
// Analytics sink.
//
// CRITICAL RULES:
// - track() never fails; storage errors are logged at warn and dropped
// - Authorities only reach the store as digests (see AnalyticsEvent)

use std::sync::Arc;

use crate::domain::{validate_analytics_event, AnalyticsEvent};
use crate::error::{AppError, AppResult};
use crate::repositories::AnalyticsRepository;

pub struct AnalyticsService {
    repo: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    pub fn new(repo: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repo }
    }

    /// Record an event, swallowing any failure.
    pub fn track(&self, event: AnalyticsEvent) {
        if let Err(e) = self.try_track(&event) {
            log::warn!("Dropping analytics event '{}': {}", event.name, e);
        }
    }

    fn try_track(&self, event: &AnalyticsEvent) -> AppResult<()> {
        validate_analytics_event(event).map_err(AppError::Domain)?;
        self.repo.record(event)
    }

    pub fn count(&self, name: &str) -> AppResult<u64> {
        self.repo.count_by_name(name)
    }
}
