//! Errors raised by the unit algebra

use metron_core::{codes, NumberError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T, E = UomError> = std::result::Result<T, E>;

/// Errors that can occur while building or converting units
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UomError {
    /// Empty symbol on creation
    #[error("invalid unit symbol {0:?}: symbols must not be empty")]
    InvalidSymbol(String),

    /// Units measure different things or have different shapes
    #[error("cannot convert {from} to {to}: {reason}")]
    IncompatibleDimensions {
        from: String,
        to: String,
        reason: String,
    },

    /// Conversion chain does not terminate
    #[error("circular reference while reducing unit {0}")]
    CircularReference(String),

    /// Non-identity conversion from a unit to itself
    #[error("unit {0} can only be converted to itself with a factor of 1 and no offset")]
    InvalidSelfConversion(String),

    #[error(transparent)]
    Number(#[from] NumberError),
}

impl UomError {
    pub(crate) fn incompatible(from: &str, to: &str, reason: impl Into<String>) -> Self {
        UomError::IncompatibleDimensions {
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.into(),
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            UomError::InvalidSymbol(_) => codes::INVALID_SYMBOL,
            UomError::IncompatibleDimensions { .. } => codes::INCOMPATIBLE_DIMENSIONS,
            UomError::CircularReference(_) => codes::CIRCULAR_REF,
            UomError::InvalidSelfConversion(_) => codes::INVALID_SELF_CONVERSION,
            UomError::Number(e) => e.code(),
        }
    }

    /// Suggestion for fixing the error, when one applies
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            UomError::InvalidSymbol(_) => Some("Give every unit a non-empty symbol"),
            UomError::IncompatibleDimensions { .. } => {
                Some("Check that both units measure the same kind of quantity")
            }
            UomError::CircularReference(_) => {
                Some("Make sure every conversion chain ends at a unit converted to itself")
            }
            UomError::InvalidSelfConversion(_) => {
                Some("Use a scaling factor of 1 and an offset of 0 for a base unit")
            }
            UomError::Number(NumberError::DivisionByZero) => Some("Ensure divisor is not zero"),
            UomError::Number(_) => None,
        }
    }

    /// Structured, serializable form of this error
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            suggestion: self.suggestion().map(str::to_string),
        }
    }
}

/// Serializable error record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(UomError::InvalidSymbol(String::new()).code(), codes::INVALID_SYMBOL);
        assert_eq!(UomError::CircularReference("x".into()).code(), codes::CIRCULAR_REF);
        assert_eq!(UomError::from(NumberError::DivisionByZero).code(), codes::DIV_ZERO);
    }

    #[test]
    fn test_incompatible_message() {
        let err = UomError::incompatible("m", "kg", "length is not mass");
        assert_eq!(err.to_string(), "cannot convert m to kg: length is not mass");
    }

    #[test]
    fn test_report_serialization() {
        let report = UomError::CircularReference("a".into()).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "CIRCULAR_REF");
        assert!(json["suggestion"].is_string());

        let report = UomError::Number(NumberError::Overflow).report();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("suggestion").is_none());
    }
}
