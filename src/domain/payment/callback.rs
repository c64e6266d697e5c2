use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Raw gateway redirect as received. `status` is kept verbatim; judging it
/// is the validator's first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCallback {
    pub authority: String,
    pub status: String,
}

/// Status values the gateway sends back on redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallbackStatus {
    Ok,
    Nok,
}

impl CallbackStatus {
    /// Exact, case-sensitive match on the gateway's wire values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "OK" => Some(CallbackStatus::Ok),
            "NOK" => Some(CallbackStatus::Nok),
            _ => None,
        }
    }
}

impl std::fmt::Display for CallbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackStatus::Ok => write!(f, "OK"),
            CallbackStatus::Nok => write!(f, "NOK"),
        }
    }
}

impl PaymentCallback {
    pub fn new(authority: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            status: status.into(),
        }
    }

    /// Parse a redirect such as
    /// `noghresod://payment/callback?Authority=A000...&Status=OK`.
    ///
    /// Query parameter names are matched case-insensitively.
    pub fn from_url(raw: &str) -> AppResult<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| AppError::Validation(format!("Invalid callback URL '{}': {}", raw, e)))?;

        let mut authority = None;
        let mut status = None;
        for (key, value) in url.query_pairs() {
            if key.eq_ignore_ascii_case("authority") {
                authority = Some(value.into_owned());
            } else if key.eq_ignore_ascii_case("status") {
                status = Some(value.into_owned());
            }
        }

        let authority = authority
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Callback is missing Authority".to_string()))?;
        let status = status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Callback is missing Status".to_string()))?;

        Ok(Self { authority, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deep_link() {
        let cb = PaymentCallback::from_url(
            "noghresod://payment/callback?Authority=A0000000000000000000000000000123&Status=OK",
        )
        .unwrap();
        assert_eq!(cb.authority, "A0000000000000000000000000000123");
        assert_eq!(cb.status, "OK");
    }

    #[test]
    fn test_parse_https_callback_with_lowercase_keys() {
        let cb = PaymentCallback::from_url("https://shop.example/verify?status=NOK&authority=A1")
            .unwrap();
        assert_eq!(cb.authority, "A1");
        assert_eq!(cb.status, "NOK");
    }

    #[test]
    fn test_unknown_status_is_kept_verbatim() {
        let cb = PaymentCallback::from_url("noghresod://payment/callback?Authority=A1&Status=ok")
            .unwrap();
        assert_eq!(cb.status, "ok");
        assert_eq!(CallbackStatus::parse(&cb.status), None);
    }

    #[test]
    fn test_missing_authority_is_validation_error() {
        let err = PaymentCallback::from_url("noghresod://payment/callback?Status=OK").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_status_is_validation_error() {
        let err = PaymentCallback::from_url("noghresod://payment/callback?Authority=A1&Status=")
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_garbage_url_is_validation_error() {
        assert!(matches!(
            PaymentCallback::from_url("not a url"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_status_parse_is_exact() {
        assert_eq!(CallbackStatus::parse("OK"), Some(CallbackStatus::Ok));
        assert_eq!(CallbackStatus::parse("NOK"), Some(CallbackStatus::Nok));
        assert_eq!(CallbackStatus::parse(" OK"), None);
        assert_eq!(CallbackStatus::parse(""), None);
    }
}
