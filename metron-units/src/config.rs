//! Measurement system configuration

use serde::{Deserialize, Serialize};

/// Tunables of a [`crate::MeasurementSystem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Longest symbol generated for a product or quotient before falling
    /// back to a content hash
    pub max_symbol_length: usize,

    /// Relative tolerance used by [`crate::Quantity::approx_eq`]
    pub tolerance: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            max_symbol_length: 16,
            tolerance: 1e-9,
        }
    }
}

impl SystemConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_symbol_length(mut self, length: usize) -> Self {
        self.max_symbol_length = length;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}
