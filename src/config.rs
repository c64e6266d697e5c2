// src/config.rs
//
// Runtime configuration.
//
// Defaults cover everything except the merchant id. Values are read from
// the process environment (a `.env` file is loaded first, if present).

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;

use crate::error::{AppError, AppResult};

/// Longest accepted TTL or sweep interval (ten years)
pub const MAX_WINDOW_MINUTES: i64 = 10 * 365 * 24 * 60;
/// Longest accepted retention window (ten years)
pub const MAX_RETENTION_DAYS: i64 = 10 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub payment: PaymentConfig,
    /// None means the platform data directory
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub merchant_id: String,
    pub base_url: String,
    pub start_pay_url: String,
    pub callback_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// How long a pending transaction accepts its callback
    pub transaction_ttl_minutes: i64,
    /// How long unverified rows are kept before purge
    pub retention_days: i64,
    /// Minimum spacing between two stale-transaction sweeps
    pub sweep_interval_minutes: i64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            merchant_id: String::new(),
            base_url: "https://payment.zarinpal.com".to_string(),
            start_pay_url: "https://payment.zarinpal.com/pg/StartPay".to_string(),
            callback_url: "noghresod://payment/callback".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            transaction_ttl_minutes: 15,
            retention_days: 7,
            sweep_interval_minutes: 60,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            payment: PaymentConfig::default(),
            database_path: None,
        }
    }
}

// Fields are public, so the accessors clamp instead of trusting them.
impl PaymentConfig {
    pub fn transaction_ttl(&self) -> Duration {
        Duration::minutes(self.transaction_ttl_minutes.clamp(0, MAX_WINDOW_MINUTES))
    }

    pub fn retention(&self) -> Duration {
        Duration::days(self.retention_days.clamp(0, MAX_RETENTION_DAYS))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::minutes(self.sweep_interval_minutes.clamp(0, MAX_WINDOW_MINUTES))
    }
}

impl AppConfig {
    /// Load `.env` (if any) and read configuration from the environment.
    pub fn from_env() -> AppResult<Self> {
        if dotenv::dotenv().is_ok() {
            log::debug!("Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(v) = lookup("ZARINPAL_MERCHANT_ID") {
            config.gateway.merchant_id = v.trim().to_string();
        }
        if let Some(v) = lookup("ZARINPAL_BASE_URL") {
            config.gateway.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("ZARINPAL_START_PAY_URL") {
            config.gateway.start_pay_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("NOGHRESOD_CALLBACK_URL") {
            config.gateway.callback_url = v;
        }
        if let Some(v) = lookup("NOGHRESOD_HTTP_TIMEOUT_SECS") {
            config.gateway.timeout_secs = parse_positive("NOGHRESOD_HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("NOGHRESOD_TRANSACTION_TTL_MINUTES") {
            config.payment.transaction_ttl_minutes = parse_bounded(
                "NOGHRESOD_TRANSACTION_TTL_MINUTES",
                &v,
                MAX_WINDOW_MINUTES,
            )?;
        }
        if let Some(v) = lookup("NOGHRESOD_RETENTION_DAYS") {
            config.payment.retention_days =
                parse_bounded("NOGHRESOD_RETENTION_DAYS", &v, MAX_RETENTION_DAYS)?;
        }
        if let Some(v) = lookup("NOGHRESOD_SWEEP_INTERVAL_MINUTES") {
            config.payment.sweep_interval_minutes = parse_bounded(
                "NOGHRESOD_SWEEP_INTERVAL_MINUTES",
                &v,
                MAX_WINDOW_MINUTES,
            )?;
        }
        if let Some(v) = lookup("NOGHRESOD_DB_PATH") {
            config.database_path = Some(PathBuf::from(v));
        }

        Ok(config)
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: FromStr + PartialOrd + Default,
{
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::Validation(format!("{} must be a number, got '{}'", key, raw)))?;
    if value <= T::default() {
        return Err(AppError::Validation(format!(
            "{} must be greater than zero, got '{}'",
            key, raw
        )));
    }
    Ok(value)
}

fn parse_bounded(key: &str, raw: &str, max: i64) -> AppResult<i64> {
    let value: i64 = parse_positive(key, raw)?;
    if value > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {}, got '{}'",
            key, max, raw
        )));
    }
    Ok(value)
}
