//! Stable error codes shared with API clients.
//!
//! A code identifies a failure kind independently of its HTTP status, so
//! clients can branch on it even when two kinds share a status.

use axum::http::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Internal = 1000,
    RequestMethodNotSupported = 1001,
    MediaTypeNotSupported = 1002,
    MethodArgumentNotValid = 1003,
    MissingRequestParameter = 1004,
    MessageNotReadable = 1005,
    ConstraintViolation = 1006,
    MethodArgumentTypeMismatch = 1007,
    BadCredentials = 1008,
    EntityNotFound = 1009,
    DuplicateEntity = 1010,
    ValueNotAllowed = 1011,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::RequestMethodNotSupported,
        ErrorCode::MediaTypeNotSupported,
        ErrorCode::MethodArgumentNotValid,
        ErrorCode::MissingRequestParameter,
        ErrorCode::MessageNotReadable,
        ErrorCode::ConstraintViolation,
        ErrorCode::MethodArgumentTypeMismatch,
        ErrorCode::BadCredentials,
        ErrorCode::EntityNotFound,
        ErrorCode::DuplicateEntity,
        ErrorCode::ValueNotAllowed,
        ErrorCode::Internal,
    ];

    /// Numeric value sent in the `code` field.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_i32() == value)
    }

    /// HTTP status every failure of this kind is answered with.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::RequestMethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::MediaTypeNotSupported => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorCode::MethodArgumentNotValid
            | ErrorCode::MissingRequestParameter
            | ErrorCode::MessageNotReadable
            | ErrorCode::MethodArgumentTypeMismatch
            | ErrorCode::EntityNotFound => StatusCode::BAD_REQUEST,
            ErrorCode::BadCredentials => StatusCode::UNAUTHORIZED,
            ErrorCode::ConstraintViolation
            | ErrorCode::DuplicateEntity
            | ErrorCode::ValueNotAllowed => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            ErrorCode::Internal => "unhandled",
            ErrorCode::RequestMethodNotSupported => "unsupported_method",
            ErrorCode::MediaTypeNotSupported => "unsupported_media_type",
            ErrorCode::MethodArgumentNotValid => "validation",
            ErrorCode::MissingRequestParameter => "missing_parameter",
            ErrorCode::MessageNotReadable => "unreadable_body",
            ErrorCode::ConstraintViolation => "constraint_violation",
            ErrorCode::MethodArgumentTypeMismatch => "type_mismatch",
            ErrorCode::BadCredentials => "bad_credentials",
            ErrorCode::EntityNotFound => "entity_not_found",
            ErrorCode::DuplicateEntity => "duplicate_entity",
            ErrorCode::ValueNotAllowed => "value_not_allowed",
        }
    }

    /// Message template, used by the `catalog` command.
    pub fn template(self) -> &'static str {
        match self {
            ErrorCode::Internal => "It's not you. It's us. We are having some problems",
            ErrorCode::RequestMethodNotSupported => "Unsupported HTTP method",
            ErrorCode::MediaTypeNotSupported => "Unsupported media type",
            ErrorCode::MethodArgumentNotValid => "Invalid arguments: <field>...",
            ErrorCode::MissingRequestParameter => "Parameter missing",
            ErrorCode::MessageNotReadable => "Invalid body",
            ErrorCode::ConstraintViolation => "Invalid arguments: <path>...",
            ErrorCode::MethodArgumentTypeMismatch => "Invalid <name>argument type",
            ErrorCode::BadCredentials => "Bad credentials",
            ErrorCode::EntityNotFound => "<entity> was not found",
            ErrorCode::DuplicateEntity => "<entity> already exists",
            ErrorCode::ValueNotAllowed => "Value not allowed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<i32> = ErrorCode::ALL.iter().map(|c| c.as_i32()).collect();
        assert_eq!(codes.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn test_statuses_stay_within_the_documented_set() {
        let allowed = [400, 401, 405, 409, 415, 500];
        for code in ErrorCode::ALL {
            assert!(allowed.contains(&code.status().as_u16()), "{:?}", code);
        }
    }

    #[test]
    fn test_from_i32() {
        assert_eq!(ErrorCode::from_i32(1010), Some(ErrorCode::DuplicateEntity));
        assert_eq!(ErrorCode::from_i32(42), None);
    }
}
