//! Authentication entry point.
//!
//! Requests rejected by [`authenticate`] never reach a handler, so they do
//! not go through the error translator: the [`JwtAuthenticationEntryPoint`]
//! hands them to a [`SecurityResponder`] that writes the response itself.
//! Token validation lives behind [`TokenVerifier`].

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("missing Authorization header")]
    MissingToken,

    #[error("Authorization header is not a bearer token")]
    MalformedHeader,

    #[error("token rejected: {0}")]
    Rejected(String),
}

/// Authenticated caller, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
}

pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Principal, AuthenticationError>;
}

/// Writes the response for requests rejected before reaching a handler.
pub trait SecurityResponder: Send + Sync {
    fn unexpected_jwt(&self, error: &AuthenticationError) -> Response;
}

/// 401 with a bearer challenge and a short JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSecurityResponder;

impl SecurityResponder for JsonSecurityResponder {
    fn unexpected_jwt(&self, _error: &AuthenticationError) -> Response {
        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "status": "UNAUTHORIZED",
                "message": "Full authentication is required to access this resource",
            })),
        )
            .into_response();
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

#[derive(Clone)]
pub struct JwtAuthenticationEntryPoint {
    responder: Arc<dyn SecurityResponder>,
}

impl JwtAuthenticationEntryPoint {
    pub fn new(responder: Arc<dyn SecurityResponder>) -> Self {
        Self { responder }
    }

    pub fn commence(&self, error: &AuthenticationError) -> Response {
        debug!("Rejecting unauthenticated request: {}", error);
        self.responder.unexpected_jwt(error)
    }
}

impl Default for JwtAuthenticationEntryPoint {
    fn default() -> Self {
        Self::new(Arc::new(JsonSecurityResponder))
    }
}

/// State for the [`authenticate`] middleware.
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub entry_point: JwtAuthenticationEntryPoint,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            verifier,
            entry_point: JwtAuthenticationEntryPoint::default(),
        }
    }

    pub fn with_entry_point(mut self, entry_point: JwtAuthenticationEntryPoint) -> Self {
        self.entry_point = entry_point;
        self
    }
}

/// Use with `axum::middleware::from_fn_with_state(state, authenticate)`.
pub async fn authenticate(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let principal = bearer_token(req.headers()).and_then(|token| state.verifier.verify(token));

    match principal {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(err) => state.entry_point.commence(&err),
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthenticationError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError::MissingToken)?
        .to_str()
        .map_err(|_| AuthenticationError::MalformedHeader)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthenticationError::MalformedHeader),
    }
}
