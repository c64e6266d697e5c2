// src/error/mod.rs

pub mod types;

pub use types::{AppError, AppResult, ErrorKind, PaymentError, SecurityError};
