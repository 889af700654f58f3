//! Query-string and path parameter helpers.
//!
//! Handlers take `Query<HashMap<String, String>>` or `Path<String>` and
//! convert through these functions, so a missing or malformed parameter
//! surfaces as the matching [`Failure`] instead of a bare rejection.

use super::failure::Failure;
use std::collections::HashMap;
use std::str::FromStr;

/// Parses a raw parameter value, reporting `name` and the expected type on failure.
pub fn parse<T: FromStr>(name: &str, raw: &str) -> Result<T, Failure> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| Failure::type_mismatch(name, short_type_name::<T>()))
}

pub fn required<T: FromStr>(params: &HashMap<String, String>, name: &str) -> Result<T, Failure> {
    let raw = params
        .get(name)
        .ok_or_else(|| Failure::missing_parameter(name))?;
    parse(name, raw)
}

pub fn optional<T: FromStr>(params: &HashMap<String, String>, name: &str) -> Result<Option<T>, Failure> {
    params.get(name).map(|raw| parse(name, raw)).transpose()
}

/// `alloc::vec::Vec<i64>` -> `Vec`, `i64` -> `i64`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
