//! Failure-to-response translation.
//!
//! [`ErrorTranslator::translate`] is a total function: every [`Failure`]
//! maps to exactly one `(StatusCode, ApiError)` pair, with the code and
//! status fixed per kind and the message and details rendered from the
//! failure instance. Nothing here blocks or keeps state between calls.

use super::code::ErrorCode;
use super::error::ApiError;
use super::failure::{
    BadCredentials, ConstraintViolations, DuplicateEntity, EntityNotFound, Failure,
    MissingParameter, TypeMismatch, Unhandled, UnreadableBody, UnsupportedMediaType,
    UnsupportedMethod, Validation, ValueNotAllowed,
};
use crate::config::TranslatorConfig;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::OnceLock;
use tracing::{debug, error};

const INTERNAL_MESSAGE: &str = "It's not you. It's us. We are having some problems";
const INTERNAL_DETAIL: &str = "error occurred";

/// How name lists inside messages are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageFormat {
    /// Byte-compatible with existing clients: every listed name is followed
    /// by its separator, so messages end in `"name "` or `"json, "`.
    #[default]
    Legacy,
    /// Separators only between names.
    Clean,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTranslator {
    format: MessageFormat,
}

static INSTALLED: OnceLock<ErrorTranslator> = OnceLock::new();

/// Sets the translator used when a [`Failure`] is turned into a response.
/// Returns `false` if one was already installed.
pub fn install(translator: ErrorTranslator) -> bool {
    INSTALLED.set(translator).is_ok()
}

pub fn current() -> ErrorTranslator {
    INSTALLED.get().copied().unwrap_or_default()
}

/// Translates with the installed translator.
pub fn translate(failure: &Failure) -> (StatusCode, ApiError) {
    current().translate(failure)
}

impl ErrorTranslator {
    pub fn new(format: MessageFormat) -> Self {
        Self { format }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        let format = if config.legacy_format {
            MessageFormat::Legacy
        } else {
            MessageFormat::Clean
        };
        Self::new(format)
    }

    pub fn format(&self) -> MessageFormat {
        self.format
    }

    pub fn translate(&self, failure: &Failure) -> (StatusCode, ApiError) {
        let api_error = match failure {
            Failure::UnsupportedMethod(f) => self.unsupported_method(f),
            Failure::UnsupportedMediaType(f) => self.unsupported_media_type(f),
            Failure::Validation(f) => self.validation(f),
            Failure::MissingParameter(f) => missing_parameter(f),
            Failure::UnreadableBody(f) => unreadable_body(f),
            Failure::ConstraintViolation(f) => self.constraint_violation(f),
            Failure::TypeMismatch(f) => type_mismatch(f),
            Failure::BadCredentials(f) => bad_credentials(f),
            Failure::EntityNotFound(f) => entity_not_found(f),
            Failure::DuplicateEntity(f) => duplicate_entity(f),
            Failure::ValueNotAllowed(f) => value_not_allowed(f),
            Failure::Unhandled(f) => unhandled(f),
        };

        debug!(
            code = api_error.code,
            status = api_error.status.as_u16(),
            "translated failure: {}",
            failure
        );

        (api_error.status, api_error)
    }

    fn unsupported_method(&self, failure: &UnsupportedMethod) -> ApiError {
        let error = format!(
            "{} method is not supported for this request. Supported methods are {}",
            failure.method,
            self.join(&failure.supported, " ", ", ")
        );
        ApiError::single(ErrorCode::RequestMethodNotSupported, "Unsupported HTTP method", &error)
    }

    fn unsupported_media_type(&self, failure: &UnsupportedMediaType) -> ApiError {
        let error = format!(
            "{} media type is not supported. Supported media types are {}",
            failure.content_type,
            self.join(&failure.supported, ", ", ", ")
        );
        ApiError::single(ErrorCode::MediaTypeNotSupported, "Unsupported media type", &error)
    }

    fn validation(&self, failure: &Validation) -> ApiError {
        let fields = failure
            .field_errors
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()));
        let objects = failure
            .object_errors
            .iter()
            .map(|e| (e.object.as_str(), e.message.as_str()));
        let (names, errors): (Vec<&str>, Vec<String>) = fields
            .chain(objects)
            .map(|(name, message)| (name, format!("{}: {}", name, message)))
            .unzip();

        ApiError::new(
            ErrorCode::MethodArgumentNotValid,
            format!("Invalid arguments: {}", self.join(&names, " ", " ")),
            errors,
        )
    }

    fn constraint_violation(&self, failure: &ConstraintViolations) -> ApiError {
        let (paths, errors): (Vec<&str>, Vec<String>) = failure
            .violations
            .iter()
            .map(|v| (v.path.as_str(), format!("{}: {}", v.path, v.message)))
            .unzip();

        ApiError::new(
            ErrorCode::ConstraintViolation,
            format!("Invalid arguments: {}", self.join(&paths, " ", " ")),
            errors,
        )
    }

    /// Legacy format appends `legacy_separator` after every item; clean
    /// format puts `clean_separator` between items.
    fn join<S: AsRef<str>>(&self, items: &[S], legacy_separator: &str, clean_separator: &str) -> String {
        match self.format {
            MessageFormat::Legacy => items
                .iter()
                .map(|item| format!("{}{}", item.as_ref(), legacy_separator))
                .collect(),
            MessageFormat::Clean => items
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(clean_separator),
        }
    }
}

fn missing_parameter(failure: &MissingParameter) -> ApiError {
    let error = format!("{} parameter is missing", failure.name);
    ApiError::single(ErrorCode::MissingRequestParameter, "Parameter missing", &error)
}

/// Only the first whitespace-delimited token of the parser message is kept.
fn unreadable_body(failure: &UnreadableBody) -> ApiError {
    let error = failure.cause.split_whitespace().next().unwrap_or_default();
    ApiError::single(ErrorCode::MessageNotReadable, "Invalid body", error)
}

fn type_mismatch(failure: &TypeMismatch) -> ApiError {
    let message = format!("Invalid {}argument type", failure.name);
    let error = format!("{} should be of type {}", failure.name, failure.required_type);
    ApiError::single(ErrorCode::MethodArgumentTypeMismatch, message, &error)
}

fn bad_credentials(failure: &BadCredentials) -> ApiError {
    ApiError::single(ErrorCode::BadCredentials, "Bad credentials", &failure.message)
}

fn entity_not_found(failure: &EntityNotFound) -> ApiError {
    let message = format!("{} was not found", failure.entity);
    let error = format!("{} was not found for parameter {}", failure.entity, failure.id);
    ApiError::single(ErrorCode::EntityNotFound, message, &error)
}

fn duplicate_entity(failure: &DuplicateEntity) -> ApiError {
    let message = format!("{} already exists", failure.entity());
    let error = format!(
        "{{{}}} already exists. Select another {{{}}}",
        failure.values().join(", "),
        failure.unique_fields().join(", ")
    );
    ApiError::single(ErrorCode::DuplicateEntity, message, &error)
}

fn value_not_allowed(failure: &ValueNotAllowed) -> ApiError {
    let error = format!(
        "The {} {{{}}} is not allowed because {}",
        failure.attribute, failure.value, failure.reason
    );
    ApiError::single(ErrorCode::ValueNotAllowed, "Value not allowed", &error)
}

fn unhandled(failure: &Unhandled) -> ApiError {
    error!(error = ?failure.cause(), "unhandled failure reached the error boundary");
    ApiError::single(ErrorCode::Internal, INTERNAL_MESSAGE, INTERNAL_DETAIL)
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let (status, body) = translate(&self);
        (status, Json(body)).into_response()
    }
}
