//! Validation utilities.

use crate::{CarelinkError, FieldError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `CarelinkError` on failure.
    fn validate_request(&self) -> Result<(), CarelinkError> {
        self.validate().map_err(validation_errors_to_carelink_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator` output into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect()
}

/// Converts `validator::ValidationErrors` to `CarelinkError`.
#[must_use]
pub fn validation_errors_to_carelink_error(errors: ValidationErrors) -> CarelinkError {
    let mut fields = field_errors(&errors);
    fields.sort_by(|a, b| a.field.cmp(&b.field));

    let message = fields
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    CarelinkError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use crate::LocationInput;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_validate_request_names_fields() {
        let input = LocationInput {
            city: String::new(),
            state: " ".to_string(),
        };
        let err = input.validate_request().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("city"));
        assert!(message.contains("state"));
        assert_eq!(err.status_code(), 400);
    }
}
