//! Error types for the transformation library
//!
//! Evaluating a transform never fails on numeric grounds; the only failures
//! are structural ones such as asking a one-way transform for its inverse or
//! feeding it the wrong kind of coordinate.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

use crate::coordinate::CoordinateKindName;

/// Errors raised by transformations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The transformation has no algebraic inverse
    #[error("No inverse available for '{operation}'")]
    NoInverse { operation: String },

    /// The transformation received a coordinate of the wrong kind
    #[error("'{operation}' expects a {expected} coordinate but received {found}")]
    CoordinateMismatch {
        operation: String,
        expected: CoordinateKindName,
        found: CoordinateKindName,
    },

    /// A constructor received a value it cannot work with
    #[error("Invalid parameter for '{operation}': {message}")]
    InvalidParameter { operation: String, message: String },
}

impl TransformError {
    pub(crate) fn no_inverse(operation: impl Into<String>) -> Self {
        Self::NoInverse {
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::no_inverse("Geographic Offset");
        assert_eq!(err.to_string(), "No inverse available for 'Geographic Offset'");

        let err = TransformError::CoordinateMismatch {
            operation: "Mercator".to_string(),
            expected: CoordinateKindName::Geographic,
            found: CoordinateKindName::Geocentric,
        };
        assert_eq!(
            err.to_string(),
            "'Mercator' expects a geographic coordinate but received geocentric"
        );
    }
}
