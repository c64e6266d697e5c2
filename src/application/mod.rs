// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - It provides the boundary between clients (CLI, app shell) and Services
// - It translates between DTOs and domain entities
// - Every error leaves this layer as a JSON ErrorResponse

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ToErrorResponse};
pub use state::AppState;
