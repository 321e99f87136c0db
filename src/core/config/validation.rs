//! Validation helper functions for configuration types.

use crate::core::errors::{FocalcovError, Result};

/// Validate that a u64 value is greater than zero.
pub fn validate_positive_u64(value: u64, field: &str) -> Result<()> {
    if value == 0 {
        return Err(FocalcovError::validation_field(
            format!("{} must be greater than 0", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that an optional usize limit, when set, is greater than zero.
pub fn validate_optional_limit(value: Option<usize>, field: &str) -> Result<()> {
    if value == Some(0) {
        return Err(FocalcovError::validation_field(
            format!("{} must be greater than 0 when set", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a string value is not blank.
pub fn validate_non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FocalcovError::validation_field(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a URL uses an HTTP scheme.
pub fn validate_http_url(value: &str, field: &str) -> Result<()> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(FocalcovError::validation_field(
            format!("{} must start with http:// or https://", field),
            field,
        ));
    }
    Ok(())
}
