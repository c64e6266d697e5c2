// src/integrations/zarinpal/client.rs
//
// Zarinpal REST API Integration (v4)
//
// ARCHITECTURE:
// - JSON client for payment request / verify
// - Maps gateway envelopes -> GatewaySession / GatewayVerification
// - Transport failures go through the AppError boundary adapter
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never touches the store; the PaymentService decides what to persist

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult, PaymentError, SecurityError};
use crate::integrations::gateway::{
    GatewaySession, GatewayVerification, PaymentGateway, PaymentRequest,
};

/// Gateway code for a successful request / verification
const CODE_SUCCESS: i64 = 100;
/// Gateway code for "already verified"
const CODE_ALREADY_VERIFIED: i64 = 101;

const REQUEST_PATH: &str = "/pg/v4/payment/request.json";
const VERIFY_PATH: &str = "/pg/v4/payment/verify.json";

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    merchant_id: &'a str,
    amount: u64,
    callback_url: &'a str,
    description: &'a str,
    metadata: RequestMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct RequestMetadata<'a> {
    order_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct VerifyBody<'a> {
    merchant_id: &'a str,
    amount: u64,
    authority: &'a str,
}

/// `data` and `errors` are objects when populated and `[]` when empty.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    errors: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorData {
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RequestData {
    code: i64,
    #[serde(default)]
    message: String,
    authority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    code: i64,
    #[serde(default)]
    message: String,
    ref_id: Option<Value>,
    card_pan: Option<String>,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct ZarinpalClient {
    config: GatewayConfig,
    http_client: Client,
}

impl ZarinpalClient {
    pub fn new(config: GatewayConfig) -> AppResult<Self> {
        if config.merchant_id.trim().is_empty() {
            return Err(AppError::Authentication(
                "Zarinpal merchant id is not configured".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> AppResult<(u16, String)> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self
            .http_client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }
}

#[async_trait]
impl PaymentGateway for ZarinpalClient {
    async fn request_payment(&self, request: &PaymentRequest) -> AppResult<GatewaySession> {
        let body = RequestBody {
            merchant_id: &self.config.merchant_id,
            amount: request.amount,
            callback_url: &self.config.callback_url,
            description: &request.description,
            metadata: RequestMetadata {
                order_id: &request.order_id,
                mobile: request.mobile.as_deref(),
                email: request.email.as_deref(),
            },
        };

        let (status, text) = self.post(REQUEST_PATH, &body).await?;
        let session = interpret_request_response(status, &text)?;
        log::info!(
            "Gateway opened session for order {} ({} Rial)",
            request.order_id,
            request.amount
        );
        Ok(session)
    }

    async fn verify_payment(&self, authority: &str, amount: u64) -> AppResult<GatewayVerification> {
        let body = VerifyBody {
            merchant_id: &self.config.merchant_id,
            amount,
            authority,
        };

        let (status, text) = self.post(VERIFY_PATH, &body).await?;
        interpret_verify_response(authority, status, &text)
    }

    fn payment_url(&self, authority: &str) -> String {
        format!(
            "{}/{}",
            self.config.start_pay_url.trim_end_matches('/'),
            authority
        )
    }
}

// ============================================================================
// RESPONSE INTERPRETATION
// ============================================================================

/// Parse the envelope; a populated `errors` object wins over the HTTP
/// status, a non-2xx status without one is a server error.
fn parse_envelope(status: u16, text: &str) -> AppResult<Value> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) if (200..300).contains(&status) => {
            return Err(AppError::Unknown(format!(
                "Malformed gateway response: {}",
                e
            )))
        }
        Err(_) => {
            return Err(AppError::Server {
                status,
                message: text.chars().take(200).collect(),
            })
        }
    };

    if envelope.errors.is_object() {
        let error: ErrorData = serde_json::from_value(envelope.errors)?;
        return Err(PaymentError::GatewayRejected {
            code: error.code,
            message: error.message,
        }
        .into());
    }

    if !(200..300).contains(&status) {
        return Err(AppError::Server {
            status,
            message: format!("Gateway returned HTTP {}", status),
        });
    }

    if !envelope.data.is_object() {
        return Err(AppError::Unknown(
            "Gateway response carries no data".to_string(),
        ));
    }

    Ok(envelope.data)
}

fn interpret_request_response(status: u16, text: &str) -> AppResult<GatewaySession> {
    let data: RequestData = serde_json::from_value(parse_envelope(status, text)?)?;

    if data.code != CODE_SUCCESS {
        return Err(PaymentError::GatewayRejected {
            code: data.code,
            message: data.message,
        }
        .into());
    }

    let authority = data
        .authority
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::Unknown("Gateway returned no authority".to_string()))?;

    Ok(GatewaySession { authority })
}

fn interpret_verify_response(
    authority: &str,
    status: u16,
    text: &str,
) -> AppResult<GatewayVerification> {
    let data: VerifyData = serde_json::from_value(parse_envelope(status, text)?)?;

    match data.code {
        CODE_SUCCESS => {
            let ref_id = match data.ref_id {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) if !s.is_empty() => s,
                _ => {
                    return Err(AppError::Unknown(
                        "Gateway verified without a ref_id".to_string(),
                    ))
                }
            };
            Ok(GatewayVerification {
                ref_id,
                card_pan: data.card_pan.filter(|p| !p.is_empty()),
            })
        }
        CODE_ALREADY_VERIFIED => Err(SecurityError::AlreadyVerifiedAtGateway {
            authority: authority.to_string(),
        }
        .into()),
        code => Err(PaymentError::GatewayRejected {
            code,
            message: data.message,
        }
        .into()),
    }
}
