//! HTTP error boundary for the meetups API.
//!
//! Provides:
//! - Failure kinds raised by handlers and extractors
//! - Translation of failures into `ApiError` responses
//! - Extractors and parameter helpers that reject with failures

pub mod code;
pub mod error;
pub mod extract;
pub mod failure;
pub mod params;
pub mod translator;

pub use code::ErrorCode;
pub use error::ApiError;
pub use extract::{unsupported_method, ValidJson};
pub use failure::{Failure, FailureError};
pub use translator::{ErrorTranslator, MessageFormat};

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, Failure>;
