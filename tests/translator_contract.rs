//! Behavioural contract of the error translator.
//!
//! Every failure kind maps to a fixed code and status, and the rendered
//! messages match what API clients already parse.

use axum::http::StatusCode;
use meetups::api::failure::{
    ConstraintViolations, FieldError, ObjectError, Validation, Violation,
};
use meetups::api::{ApiError, ErrorCode, ErrorTranslator, Failure, MessageFormat};
use std::collections::HashSet;

fn representatives() -> Vec<(Failure, StatusCode)> {
    vec![
        (
            Failure::unsupported_method("PUT", ["GET", "POST"]),
            StatusCode::METHOD_NOT_ALLOWED,
        ),
        (
            Failure::unsupported_media_type("text/plain", ["application/json"]),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ),
        (
            Failure::Validation(Validation {
                field_errors: vec![FieldError {
                    field: "name".to_string(),
                    message: "must not be blank".to_string(),
                }],
                object_errors: vec![],
            }),
            StatusCode::BAD_REQUEST,
        ),
        (Failure::missing_parameter("ownerId"), StatusCode::BAD_REQUEST),
        (
            Failure::unreadable_body("Unexpected character ('x')"),
            StatusCode::BAD_REQUEST,
        ),
        (
            Failure::ConstraintViolation(ConstraintViolations {
                violations: vec![Violation {
                    path: "create.capacity".to_string(),
                    message: "must be positive".to_string(),
                }],
            }),
            StatusCode::CONFLICT,
        ),
        (Failure::type_mismatch("meetupId", "i64"), StatusCode::BAD_REQUEST),
        (Failure::bad_credentials("Wrong password"), StatusCode::UNAUTHORIZED),
        (Failure::not_found("Meetup", 3), StatusCode::BAD_REQUEST),
        (
            Failure::duplicate("User", ["alice@example.com"], ["email"]).unwrap(),
            StatusCode::CONFLICT,
        ),
        (
            Failure::value_not_allowed("status", "ACCEPTED", "the invitation expired"),
            StatusCode::CONFLICT,
        ),
        (
            Failure::unhandled(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ]
}

#[test]
fn test_every_kind_has_documented_status_and_unique_code() {
    let translator = ErrorTranslator::default();
    let mut codes = HashSet::new();

    for (failure, expected_status) in representatives() {
        let (status, error) = translator.translate(&failure);
        assert_eq!(status, expected_status, "{}", failure);
        assert_eq!(error.status, expected_status);
        assert_eq!(error.code, failure.code().as_i32());
        assert!(codes.insert(error.code), "code {} reused", error.code);
    }

    assert_eq!(codes.len(), ErrorCode::ALL.len());
}

#[test]
fn test_translation_is_deterministic() {
    let translator = ErrorTranslator::default();
    for (failure, _) in representatives() {
        let first = translator.translate(&failure);
        let second = translator.translate(&failure);
        assert_eq!(first, second);
    }
}

#[test]
fn test_validation_keeps_field_order() {
    let failure = Failure::Validation(Validation {
        field_errors: vec![
            FieldError {
                field: "name".to_string(),
                message: "must not be blank".to_string(),
            },
            FieldError {
                field: "email".to_string(),
                message: "invalid format".to_string(),
            },
        ],
        object_errors: vec![ObjectError {
            object: "userCreation".to_string(),
            message: "passwords do not match".to_string(),
        }],
    });

    let (_, error) = ErrorTranslator::default().translate(&failure);

    assert_eq!(
        error.errors,
        vec![
            "name: must not be blank",
            "email: invalid format",
            "userCreation: passwords do not match"
        ]
    );
    assert_eq!(error.message, "Invalid arguments: name email userCreation ");
    let name = error.message.find("name").unwrap();
    let email = error.message.find("email").unwrap();
    assert!(name < email);
}

#[test]
fn test_duplicate_entity_detail() {
    let failure = Failure::duplicate("User", ["alice@example.com"], ["email"]).unwrap();
    let (status, error) = ErrorTranslator::default().translate(&failure);

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error.message, "User already exists");
    assert_eq!(
        error.errors,
        vec!["{alice@example.com} already exists. Select another {email}"]
    );
}

#[test]
fn test_unreadable_body_keeps_first_token() {
    let failure = Failure::unreadable_body("Unexpected character ('x')");
    let (_, error) = ErrorTranslator::default().translate(&failure);

    assert_eq!(error.message, "Invalid body");
    assert_eq!(error.errors, vec!["Unexpected"]);
}

#[test]
fn test_catch_all_never_leaks_cause() {
    let secret = "SELECT * FROM users WHERE password = 'hunter2'";
    let failure: Failure = anyhow::anyhow!(secret).into();

    for format in [MessageFormat::Legacy, MessageFormat::Clean] {
        let (status, error) = ErrorTranslator::new(format).translate(&failure);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::to_string(&error).unwrap();
        assert!(!body.contains("hunter2"));
        assert!(!body.contains("SELECT"));
    }
}

#[test]
fn test_api_error_json_round_trip() {
    let failure = Failure::Validation(Validation {
        field_errors: vec![
            FieldError {
                field: "day".to_string(),
                message: "must be a future date".to_string(),
            },
            FieldError {
                field: "capacity".to_string(),
                message: "must be positive".to_string(),
            },
        ],
        object_errors: vec![],
    });
    let (_, error) = ErrorTranslator::default().translate(&failure);

    let json = serde_json::to_string(&error).unwrap();
    let parsed: ApiError = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.code, error.code);
    assert_eq!(parsed.status, error.status);
    assert_eq!(parsed.message, error.message);
    assert_eq!(parsed.errors, error.errors);
}

#[test]
fn test_clean_format_only_changes_separators() {
    let failure = Failure::unsupported_method("PATCH", ["GET", "POST"]);
    let (legacy_status, legacy) = ErrorTranslator::new(MessageFormat::Legacy).translate(&failure);
    let (clean_status, clean) = ErrorTranslator::new(MessageFormat::Clean).translate(&failure);

    assert_eq!(legacy_status, clean_status);
    assert_eq!(legacy.code, clean.code);
    assert_eq!(legacy.message, clean.message);
    assert_ne!(legacy.errors, clean.errors);
}
