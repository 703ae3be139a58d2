//! Error types for egg harvest submissions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::traits::StoreError;

/// Form field that carries the "at least one subtotal" error.
pub const EGG_TYPES_FIELD: &str = "egg_types";

/// Form field of the single total quantity.
pub const QUANTITY_FIELD: &str = "quantity";

pub const AT_LEAST_ONE_QUANTITY: &str = "At least one quantity value is required.";
pub const QUANTITY_REQUIRED: &str = "Quantity field is required.";
pub const NOT_A_NON_NEGATIVE_INTEGER: &str = "must be a non-negative integer";
pub const TOTAL_TOO_LARGE: &str = "The quantities add up to more than can be recorded.";
pub const LABEL_CONFLICTS_WITH_TOTAL: &str = "egg type label conflicts with the total line item";

/// A single form error, attached to the field the user must correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All errors found in one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Errors that end the processing of a harvest submission.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Submitted values were rejected; the user may correct and resubmit
    #[error("Invalid submission: {0}")]
    Validation(ValidationErrors),

    /// Egg types could not be loaded (distinct from "none configured")
    #[error("Egg type catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Log, category or term creation failed; nothing was kept
    #[error("Failed to persist harvest log: {0}")]
    Persistence(String),
}

impl HarvestError {
    pub fn catalog(err: StoreError) -> Self {
        Self::CatalogUnavailable(err.to_string())
    }

    pub fn persistence(err: StoreError) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for HarvestError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display() {
        let mut errors = ValidationErrors::default();
        errors.push(ValidationError::new("quantity", QUANTITY_REQUIRED));
        errors.push(ValidationError::new("1_quantity", NOT_A_NON_NEGATIVE_INTEGER));

        assert_eq!(
            errors.to_string(),
            "quantity: Quantity field is required.; 1_quantity: must be a non-negative integer"
        );
        assert!(errors.for_field("1_quantity").is_some());
        assert!(errors.for_field("egg_types").is_none());
    }

    #[test]
    fn test_store_error_maps_to_catalog_unavailable() {
        let err = HarvestError::catalog(StoreError::Backend("connection reset".into()));
        assert!(matches!(err, HarvestError::CatalogUnavailable(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
