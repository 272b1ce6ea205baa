//! Response normalization.
//!
//! Everything here is pure: a status and a body go in, a [`Normalized`]
//! outcome comes out. Side effects of a session expiry belong to the caller.
//!
//! The backend answers in several legacy shapes (`data|result`,
//! `success|etat`, `message`, `error|errors`). Each accessor below picks one
//! key following a fixed precedence; a JSON `null` counts as absent.

use reqwest::StatusCode;
use serde_json::Value;

use crate::envelope::{ApiEnvelope, GENERIC_ERROR_MESSAGE};
use crate::transport::TransportFailure;

/// Structured codes treated as a session expiry when
/// [`ExpiryPolicy::honor_error_codes`] is enabled.
pub const EXPIRY_ERROR_CODES: &[&str] = &[
    "UNAUTHORIZED",
    "TOKEN_EXPIRED",
    "INVALID_TOKEN",
    "SESSION_EXPIRED",
];

/// How session expiry is detected beyond the 401 status and the message heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Also treat a failing body whose `code` is in [`EXPIRY_ERROR_CODES`] as expired.
    pub honor_error_codes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryReason {
    /// HTTP 401
    Unauthorized,
    /// 2xx/3xx body with a false success flag and a message mentioning "token"
    TokenMessage,
    /// Error body whose message mentions "token" or "unauthorized"
    RejectedMessage,
    /// Structured `code` field
    ErrorCode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Envelope(ApiEnvelope),
    SessionExpired(ExpiryReason),
}

impl Normalized {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Normalized::SessionExpired(_))
    }
}

/// Parse a raw body; empty or invalid JSON becomes `Value::Null`.
pub fn parse_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|value| !value.is_null())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `success`, else `etat`, else `false`
pub fn success_flag(body: &Value) -> bool {
    field(body, "success")
        .or_else(|| field(body, "etat"))
        .map(truthy)
        .unwrap_or(false)
}

/// `data`, else `result`
pub fn payload(body: &Value) -> Option<Value> {
    field(body, "data").or_else(|| field(body, "result")).cloned()
}

/// `message` when present and non-empty, else `""`
pub fn message(body: &Value) -> String {
    field(body, "message")
        .filter(|value| truthy(value))
        .map(text)
        .unwrap_or_default()
}

/// `errors` as a list, else `[error]`, else `[]`
pub fn errors(body: &Value) -> Vec<String> {
    if let Some(errors) = field(body, "errors") {
        return match errors {
            Value::Array(items) => items.iter().map(text).collect(),
            other => vec![text(other)],
        };
    }
    field(body, "error").map(|e| vec![text(e)]).unwrap_or_default()
}

pub fn mentions_token(message: &str) -> bool {
    message.to_lowercase().contains("token")
}

pub fn mentions_token_or_unauthorized(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("token") || lowered.contains("unauthorized")
}

fn expiry_code(body: &Value, policy: &ExpiryPolicy) -> Option<String> {
    if !policy.honor_error_codes {
        return None;
    }
    let code = field(body, "code")?.as_str()?;
    EXPIRY_ERROR_CODES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(code))
        .map(|known| known.to_string())
}

/// Normalize a received response, whatever its status.
pub fn normalize_response(status: StatusCode, body: &[u8], policy: &ExpiryPolicy) -> Normalized {
    if status == StatusCode::NO_CONTENT {
        return Normalized::Envelope(ApiEnvelope::no_content());
    }

    if (200..400).contains(&status.as_u16()) {
        return normalize_accepted(&parse_body(body), policy);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Normalized::SessionExpired(ExpiryReason::Unauthorized);
    }

    let parsed = parse_body(body);
    if parsed.is_object() {
        return normalize_rejected(&parsed, policy);
    }

    Normalized::Envelope(ApiEnvelope::server_problem())
}

/// Normalize a request that never produced a response.
pub fn normalize_failure(_failure: &TransportFailure) -> Normalized {
    Normalized::Envelope(ApiEnvelope::network_failure())
}

fn normalize_accepted(body: &Value, policy: &ExpiryPolicy) -> Normalized {
    let success = success_flag(body);
    let message = message(body);

    if !success {
        if mentions_token(&message) {
            return Normalized::SessionExpired(ExpiryReason::TokenMessage);
        }
        if let Some(code) = expiry_code(body, policy) {
            return Normalized::SessionExpired(ExpiryReason::ErrorCode(code));
        }
    }

    Normalized::Envelope(ApiEnvelope::new(
        success,
        payload(body),
        message,
        errors(body),
    ))
}

/// Error status carrying a JSON object body.
fn normalize_rejected(body: &Value, policy: &ExpiryPolicy) -> Normalized {
    let parsed_message = field(body, "message").map(text);
    let error_message = field(body, "error").map(text);
    let parsed_errors = field(body, "errors").map(|_| errors(body));

    if parsed_message
        .as_deref()
        .is_some_and(mentions_token_or_unauthorized)
    {
        return Normalized::SessionExpired(ExpiryReason::RejectedMessage);
    }
    if let Some(code) = expiry_code(body, policy) {
        return Normalized::SessionExpired(ExpiryReason::ErrorCode(code));
    }

    let errors = parsed_errors.unwrap_or_else(|| {
        error_message
            .iter()
            .filter(|e| !e.is_empty())
            .cloned()
            .collect()
    });
    let message = parsed_message
        .or(error_message)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

    Normalized::Envelope(ApiEnvelope::new(false, None, message, errors))
}
