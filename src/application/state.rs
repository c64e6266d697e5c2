// src/application/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::events::EventBus;
use crate::services::{AnalyticsService, PaymentService};

/// Application state shared by every command.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
/// Services are initialized in main.rs and passed here.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub payment_service: Arc<PaymentService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub config: Arc<AppConfig>,
}
