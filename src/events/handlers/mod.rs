// src/events/handlers/mod.rs
//
// Event Handlers - INTERNAL MODULE
//
// Handlers use closure-based subscription via EventBus::subscribe.

pub mod analytics_handler;

// Only export the registration function, not handler closures
pub use analytics_handler::register_analytics_handlers;
