// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between clients and Services
// - Commands accept DTOs, return DTOs
// - Commands handle error conversion (JSON ErrorResponse)
// - Commands NEVER contain business logic

pub mod payment_commands;

pub use payment_commands::*;
