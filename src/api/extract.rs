//! Request extractors and fallbacks that reject with a [`Failure`].

use super::failure::{Failure, Validation};
use super::params::short_type_name;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, Method},
};
use serde::de::DeserializeOwned;
use std::future::{ready, Ready};
use validator::Validate;

pub const APPLICATION_JSON: &str = "application/json";

/// Content type assumed when a request carries none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// JSON request body that is deserialized and then validated.
///
/// Rejections:
/// - non-JSON `Content-Type` -> unsupported media type
/// - unreadable bytes or a `serde_json` error -> unreadable body
/// - `Validate` errors -> validation failure named after `T`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        if !is_json(&content_type) {
            return Err(Failure::unsupported_media_type(content_type, [APPLICATION_JSON]));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| Failure::unreadable_body(rejection.body_text()))?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|err| Failure::unreadable_body(err.to_string()))?;

        value
            .validate()
            .map_err(|errors| Failure::Validation(Validation::from_errors(&object_name::<T>(), &errors)))?;

        Ok(Self(value))
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == APPLICATION_JSON || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// `MeetupCreation` -> `meetupCreation`
fn object_name<T>() -> String {
    let name = short_type_name::<T>();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Method-router fallback answering with the unsupported-method failure.
///
/// ```ignore
/// Router::new().route(
///     "/meetups",
///     post(create_meetup).fallback(unsupported_method(&[Method::POST])),
/// );
/// ```
pub fn unsupported_method(supported: &[Method]) -> impl Fn(Method) -> Ready<Failure> + Clone + Send + Sync + 'static {
    let supported: Vec<String> = supported.iter().map(ToString::to_string).collect();
    move |method: Method| ready(Failure::unsupported_method(method.to_string(), supported.clone()))
}
