//! Failures intercepted at the HTTP boundary.
//!
//! Every variant of [`Failure`] is one row of the translation table: it
//! carries exactly the data its message and details are rendered from.
//! Failures can also be read from tagged JSON (`{"kind": "entity_not_found", ...}`),
//! which is what the `translate` command consumes.

use super::code::ErrorCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Errors raised while building a failure value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureError {
    #[error("duplicate {entity} failure needs at least one conflicting value")]
    EmptyConflictValues { entity: String },

    #[error("duplicate {entity} failure needs at least one unique field")]
    EmptyUniqueFields { entity: String },
}

#[derive(Debug, Error, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    #[error("{} method is not supported", .0.method)]
    UnsupportedMethod(UnsupportedMethod),

    #[error("{} media type is not supported", .0.content_type)]
    UnsupportedMediaType(UnsupportedMediaType),

    #[error("request validation failed")]
    Validation(Validation),

    #[error("{} parameter is missing", .0.name)]
    MissingParameter(MissingParameter),

    #[error("unreadable body: {}", .0.cause)]
    UnreadableBody(UnreadableBody),

    #[error("constraint violation")]
    ConstraintViolation(ConstraintViolations),

    #[error("{} should be of type {}", .0.name, .0.required_type)]
    TypeMismatch(TypeMismatch),

    #[error("bad credentials: {}", .0.message)]
    BadCredentials(BadCredentials),

    #[error("{} {} was not found", .0.entity, .0.id)]
    EntityNotFound(EntityNotFound),

    #[error("{} already exists", .0.entity)]
    DuplicateEntity(DuplicateEntity),

    #[error("value {} not allowed for {}", .0.value, .0.attribute)]
    ValueNotAllowed(ValueNotAllowed),

    #[error("unhandled failure: {0}")]
    Unhandled(Unhandled),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnsupportedMethod {
    pub method: String,
    #[serde(default)]
    pub supported: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnsupportedMediaType {
    pub content_type: String,
    #[serde(default)]
    pub supported: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectError {
    pub object: String,
    pub message: String,
}

/// Field errors followed by object-level errors, in production order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Validation {
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
    #[serde(default)]
    pub object_errors: Vec<ObjectError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MissingParameter {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnreadableBody {
    /// Message of the underlying parser error.
    pub cause: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConstraintViolations {
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeMismatch {
    pub name: String,
    pub required_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BadCredentials {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityNotFound {
    pub entity: String,
    pub id: String,
}

/// A unique-constraint conflict. Both lists are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DuplicateEntityFields")]
pub struct DuplicateEntity {
    entity: String,
    values: Vec<String>,
    unique_fields: Vec<String>,
}

#[derive(Deserialize)]
struct DuplicateEntityFields {
    entity: String,
    values: Vec<String>,
    unique_fields: Vec<String>,
}

impl TryFrom<DuplicateEntityFields> for DuplicateEntity {
    type Error = FailureError;

    fn try_from(fields: DuplicateEntityFields) -> Result<Self, Self::Error> {
        DuplicateEntity::new(fields.entity, fields.values, fields.unique_fields)
    }
}

impl DuplicateEntity {
    pub fn new<V, F>(entity: impl Into<String>, values: V, unique_fields: F) -> Result<Self, FailureError>
    where
        V: IntoIterator,
        V::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let entity = entity.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let unique_fields: Vec<String> = unique_fields.into_iter().map(Into::into).collect();

        if values.is_empty() {
            return Err(FailureError::EmptyConflictValues { entity });
        }
        if unique_fields.is_empty() {
            return Err(FailureError::EmptyUniqueFields { entity });
        }

        Ok(Self {
            entity,
            values,
            unique_fields,
        })
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn unique_fields(&self) -> &[String] {
        &self.unique_fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValueNotAllowed {
    pub attribute: String,
    pub value: String,
    pub reason: String,
}

/// Anything the boundary has no dedicated row for. The cause is logged, never returned.
#[derive(Debug)]
pub struct Unhandled(anyhow::Error);

impl Unhandled {
    pub fn new(cause: impl Into<anyhow::Error>) -> Self {
        Self(cause.into())
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Display for Unhandled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl<'de> Deserialize<'de> for Unhandled {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            message: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self(anyhow::anyhow!(raw.message)))
    }
}

impl Failure {
    pub fn code(&self) -> ErrorCode {
        match self {
            Failure::UnsupportedMethod(_) => ErrorCode::RequestMethodNotSupported,
            Failure::UnsupportedMediaType(_) => ErrorCode::MediaTypeNotSupported,
            Failure::Validation(_) => ErrorCode::MethodArgumentNotValid,
            Failure::MissingParameter(_) => ErrorCode::MissingRequestParameter,
            Failure::UnreadableBody(_) => ErrorCode::MessageNotReadable,
            Failure::ConstraintViolation(_) => ErrorCode::ConstraintViolation,
            Failure::TypeMismatch(_) => ErrorCode::MethodArgumentTypeMismatch,
            Failure::BadCredentials(_) => ErrorCode::BadCredentials,
            Failure::EntityNotFound(_) => ErrorCode::EntityNotFound,
            Failure::DuplicateEntity(_) => ErrorCode::DuplicateEntity,
            Failure::ValueNotAllowed(_) => ErrorCode::ValueNotAllowed,
            Failure::Unhandled(_) => ErrorCode::Internal,
        }
    }

    pub fn unsupported_method<I>(method: impl Into<String>, supported: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Failure::UnsupportedMethod(UnsupportedMethod {
            method: method.into(),
            supported: supported.into_iter().map(Into::into).collect(),
        })
    }

    pub fn unsupported_media_type<I>(content_type: impl Into<String>, supported: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Failure::UnsupportedMediaType(UnsupportedMediaType {
            content_type: content_type.into(),
            supported: supported.into_iter().map(Into::into).collect(),
        })
    }

    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Failure::MissingParameter(MissingParameter { name: name.into() })
    }

    pub fn unreadable_body(cause: impl Into<String>) -> Self {
        Failure::UnreadableBody(UnreadableBody {
            cause: cause.into(),
        })
    }

    pub fn type_mismatch(name: impl Into<String>, required_type: impl Into<String>) -> Self {
        Failure::TypeMismatch(TypeMismatch {
            name: name.into(),
            required_type: required_type.into(),
        })
    }

    pub fn bad_credentials(message: impl Into<String>) -> Self {
        Failure::BadCredentials(BadCredentials {
            message: message.into(),
        })
    }

    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Failure::EntityNotFound(EntityNotFound {
            entity: entity.into(),
            id: id.to_string(),
        })
    }

    /// Fails when either list is empty.
    pub fn duplicate<V, F>(entity: impl Into<String>, values: V, unique_fields: F) -> Result<Self, FailureError>
    where
        V: IntoIterator,
        V::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        DuplicateEntity::new(entity, values, unique_fields).map(Failure::DuplicateEntity)
    }

    pub fn value_not_allowed(
        attribute: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Failure::ValueNotAllowed(ValueNotAllowed {
            attribute: attribute.into(),
            value: value.to_string(),
            reason: reason.into(),
        })
    }

    pub fn unhandled(cause: impl Into<anyhow::Error>) -> Self {
        Failure::Unhandled(Unhandled::new(cause))
    }
}

impl Validation {
    /// Flattens `validator` output. Nested structs become `parent.child`,
    /// list items `parent[index].child`, and schema-level errors are
    /// reported as errors of `object_name`.
    ///
    /// `validator` keeps errors in a hash map, so names are sorted to keep
    /// responses stable between runs.
    pub fn from_errors(object_name: &str, errors: &ValidationErrors) -> Self {
        let mut validation = Validation::default();
        validation.collect(object_name, "", errors);
        validation
    }

    fn collect(&mut self, object_name: &str, prefix: &str, errors: &ValidationErrors) {
        let mut entries: Vec<_> = errors.errors().iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (name, kind) in entries {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            };

            match kind {
                ValidationErrorsKind::Field(list) if *name == "__all__" => {
                    let object = if prefix.is_empty() { object_name } else { prefix };
                    for error in list {
                        self.object_errors.push(ObjectError {
                            object: object.to_string(),
                            message: default_message(error),
                        });
                    }
                }
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        self.field_errors.push(FieldError {
                            field: path.clone(),
                            message: default_message(error),
                        });
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.collect(object_name, &path, inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.collect(object_name, &format!("{}[{}]", path, index), inner);
                    }
                }
            }
        }
    }
}

fn default_message(error: &validator::ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("failed `{}` validation", error.code),
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        Failure::Validation(Validation::from_errors("request", &errors))
    }
}

impl From<Validation> for Failure {
    fn from(validation: Validation) -> Self {
        Failure::Validation(validation)
    }
}

impl From<ConstraintViolations> for Failure {
    fn from(violations: ConstraintViolations) -> Self {
        Failure::ConstraintViolation(violations)
    }
}

impl From<DuplicateEntity> for Failure {
    fn from(duplicate: DuplicateEntity) -> Self {
        Failure::DuplicateEntity(duplicate)
    }
}

/// A malformed failure is a server bug, reported through the catch-all row.
impl From<FailureError> for Failure {
    fn from(err: FailureError) -> Self {
        Failure::unhandled(err)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Unhandled(Unhandled(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use validator::ValidationError;

    #[test]
    fn test_duplicate_rejects_empty_values() {
        let err = DuplicateEntity::new("User", Vec::<String>::new(), ["email"]).unwrap_err();
        assert_eq!(
            err,
            FailureError::EmptyConflictValues {
                entity: "User".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_rejects_empty_unique_fields() {
        let err = Failure::duplicate("User", ["alice"], Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, FailureError::EmptyUniqueFields { .. }));
    }

    #[test]
    fn test_failure_error_maps_to_internal() {
        let failure: Failure = FailureError::EmptyConflictValues {
            entity: "User".to_string(),
        }
        .into();
        assert_eq!(failure.code(), ErrorCode::Internal);
    }

    #[test]
    fn test_deserialize_tagged_failure() {
        let failure: Failure =
            serde_json::from_str(r#"{"kind": "entity_not_found", "entity": "Meetup", "id": "7"}"#)
                .unwrap();
        match failure {
            Failure::EntityNotFound(not_found) => {
                assert_eq!(not_found.entity, "Meetup");
                assert_eq!(not_found.id, "7");
            }
            other => panic!("unexpected failure: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_duplicate_enforces_non_empty_lists() {
        let result: Result<Failure, _> = serde_json::from_str(
            r#"{"kind": "duplicate_entity", "entity": "User", "values": [], "unique_fields": ["email"]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_unhandled() {
        let failure: Failure =
            serde_json::from_str(r#"{"kind": "unhandled", "message": "pool exhausted"}"#).unwrap();
        assert_eq!(failure.code(), ErrorCode::Internal);
        assert_eq!(failure.to_string(), "unhandled failure: pool exhausted");
    }

    #[test]
    fn test_validation_from_validator_errors() {
        let mut errors = ValidationErrors::new();
        let mut blank = ValidationError::new("length");
        blank.message = Some(Cow::from("must not be blank"));
        errors.add("name", blank);
        errors.add("email", ValidationError::new("email"));
        errors.add("__all__", ValidationError::new("dates"));

        let validation = Validation::from_errors("meetupCreation", &errors);

        assert_eq!(
            validation.field_errors,
            vec![
                FieldError {
                    field: "email".to_string(),
                    message: "failed `email` validation".to_string(),
                },
                FieldError {
                    field: "name".to_string(),
                    message: "must not be blank".to_string(),
                },
            ]
        );
        assert_eq!(
            validation.object_errors,
            vec![ObjectError {
                object: "meetupCreation".to_string(),
                message: "failed `dates` validation".to_string(),
            }]
        );
    }

    #[test]
    fn test_validation_flattens_nested_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct Owner {
            #[validate(email)]
            email: String,
        }

        #[derive(Validate)]
        struct MeetupCreation {
            #[validate(nested)]
            owner: Owner,
        }

        let creation = MeetupCreation {
            owner: Owner {
                email: "not-an-email".to_string(),
            },
        };
        let errors = creation.validate().unwrap_err();

        let validation = Validation::from_errors("meetupCreation", &errors);
        assert_eq!(validation.field_errors.len(), 1);
        assert_eq!(validation.field_errors[0].field, "owner.email");
        assert!(validation.object_errors.is_empty());
    }
}
