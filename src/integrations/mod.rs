// src/integrations/mod.rs
//
// External Integrations Module

pub mod gateway;
pub mod zarinpal;

pub use gateway::{GatewaySession, GatewayVerification, PaymentGateway, PaymentRequest};
pub use zarinpal::ZarinpalClient;

#[cfg(test)]
pub use gateway::MockPaymentGateway;
