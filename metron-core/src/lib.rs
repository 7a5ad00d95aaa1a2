//! Metron Core - Fundamental types
//!
//! This crate provides the core types shared by the Metron crates:
//! - `Number`: Arbitrary precision decimal numbers
//! - `NumberError`: Arithmetic failures
//! - `codes`: Machine-readable error codes

mod number;

pub use number::{Number, NumberError, WORK_PRECISION};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_SYMBOL: &str = "INVALID_SYMBOL";
    pub const INCOMPATIBLE_DIMENSIONS: &str = "INCOMPATIBLE_DIMENSIONS";
    pub const CIRCULAR_REF: &str = "CIRCULAR_REF";
    pub const INVALID_SELF_CONVERSION: &str = "INVALID_SELF_CONVERSION";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const OVERFLOW: &str = "OVERFLOW";
}

impl NumberError {
    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            NumberError::ParseError(_) => codes::PARSE_ERROR,
            NumberError::DivisionByZero => codes::DIV_ZERO,
            NumberError::DomainError(_) => codes::DOMAIN_ERROR,
            NumberError::Overflow => codes::OVERFLOW,
        }
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, NumberError};
    pub use crate::codes;
}
