use std::fmt;
use std::time::Duration;

use serde::Serialize;
use shelf_http::error::AppError;
use thiserror::Error;

/// One failed rule on one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: &'static str,
    pub message: String,
}

/// Every rule violation found in a request, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Names of the offending fields, deduplicated, in order.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for violation in &self.0 {
            if !fields.contains(&violation.field) {
                fields.push(violation.field);
            }
        }
        fields
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

/// Failures surfaced by the books pipeline.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("invalid book request: {0}")]
    Validation(ValidationErrors),

    #[error("book with id '{id}' not found")]
    NotFound { id: String },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("storage operation '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl BookError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage {
            message: message.to_string(),
        }
    }
}

impl From<ValidationErrors> for BookError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<BookError> for AppError {
    fn from(error: BookError) -> Self {
        match error {
            BookError::Validation(errors) => {
                let message = errors.to_string();
                let details = errors
                    .violations()
                    .iter()
                    .filter_map(|violation| serde_json::to_value(violation).ok())
                    .collect();
                AppError::validation(details, message)
            }
            BookError::NotFound { .. } => AppError::not_found(error.to_string()),
            BookError::Storage { .. } | BookError::Timeout { .. } => {
                AppError::Internal(anyhow::Error::new(error))
            }
        }
    }
}
