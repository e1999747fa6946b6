//! Request validation: required fields, id syntax, email shape.

use crate::error::AppError;
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

pub struct RequestValidator;

impl RequestValidator {
    /// Every field must be present and non-blank; otherwise `Incomplete values`.
    pub fn require_all(fields: &[(&str, Option<&str>)]) -> Result<(), AppError> {
        for (name, value) in fields {
            if value.map(str::trim).map(str::is_empty).unwrap_or(true) {
                tracing::debug!(field = %name, "missing required field");
                return Err(AppError::Validation("Incomplete values".into()));
            }
        }
        Ok(())
    }

    /// Ids are validated before any query runs.
    pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation(format!("Invalid id: {}", raw)))
    }

    pub fn validate_email(email: &str) -> Result<(), AppError> {
        if is_valid_email(email) {
            Ok(())
        } else {
            Err(AppError::Validation(format!("{} is not a valid email", email)))
        }
    }

    /// Counts for mock generation: integers, never negative.
    pub fn non_negative_count(name: &str, value: i64) -> Result<usize, AppError> {
        usize::try_from(value)
            .map_err(|_| AppError::Validation(format!("{} must be a non-negative integer", name)))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}
