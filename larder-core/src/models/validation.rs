//! Validation error types

use std::fmt;

/// Validation error for a single record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Text that should hold a whole number doesn't
    NotANumber { field: &'static str, value: String },

    /// Whole number below zero
    Negative { field: &'static str, value: String },

    /// Number too large for the column
    OutOfRange { field: &'static str, value: String },

    /// Field name that the record doesn't have
    UnknownField { name: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::Empty { field }
            | Self::NotANumber { field, .. }
            | Self::Negative { field, .. }
            | Self::OutOfRange { field, .. } => field,
            Self::UnknownField { name } => name,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::NotANumber { field, value } => {
                write!(f, "{} must be a whole number, got '{}'", field, value)
            }
            Self::Negative { field, value } => {
                write!(f, "{} cannot be negative, got '{}'", field, value)
            }
            Self::OutOfRange { field, value } => {
                write!(f, "{} is out of range: '{}'", field, value)
            }
            Self::UnknownField { name } => write!(f, "unknown field '{}'", name),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::NotANumber {
            field: "prepTime",
            value: "ten".to_string(),
        };
        assert_eq!(err.to_string(), "prepTime must be a whole number, got 'ten'");
        assert_eq!(err.field(), "prepTime");
    }

    #[test]
    fn unknown_field_reports_name() {
        let err = ValidationError::UnknownField {
            name: "colour".to_string(),
        };
        assert_eq!(err.field(), "colour");
        assert_eq!(err.to_string(), "unknown field 'colour'");
    }
}
