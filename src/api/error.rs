//! API error payload returned for every failed request.

use super::code::ErrorCode;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Uniform JSON error body.
///
/// Serialized as `{"code": 1009, "status": "BAD_REQUEST", "message": "...", "errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i32,
    #[serde(with = "status_name")]
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<String>,
}

impl ApiError {
    /// Builds an error with a list of details, kept verbatim.
    pub fn new(code: ErrorCode, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            code: code.as_i32(),
            status: code.status(),
            message: message.into(),
            errors,
        }
    }

    /// Builds an error with a single, trimmed detail.
    pub fn single(code: ErrorCode, message: impl Into<String>, error: &str) -> Self {
        Self::new(code, message, vec![error.trim().to_string()])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Serializes a status as its upper-snake name, e.g. `METHOD_NOT_ALLOWED`.
pub mod status_name {
    use axum::http::StatusCode;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn name(status: StatusCode) -> String {
        match status.canonical_reason() {
            Some(reason) => reason
                .chars()
                .map(|c| match c {
                    ' ' | '-' => '_',
                    c => c.to_ascii_uppercase(),
                })
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect(),
            None => status.as_str().to_string(),
        }
    }

    pub fn parse(value: &str) -> Option<StatusCode> {
        if let Ok(numeric) = value.parse::<u16>() {
            return StatusCode::from_u16(numeric).ok();
        }
        (100..600)
            .filter_map(|n| StatusCode::from_u16(n).ok())
            .find(|status| status.canonical_reason().is_some() && name(*status) == value)
    }

    pub fn serialize<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&name(*status))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| D::Error::custom(format!("unknown HTTP status `{}`", value)))
    }
}
