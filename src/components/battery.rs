//! Battery: an ideal DC voltage source.

use serde::{Deserialize, Serialize};

/// An ideal battery.
///
/// Batteries require an extra row/column in the MNA matrix for the branch
/// current. The source enforces: V+ - V- = voltage. The positive pole sits
/// on the right terminal unless the instance is flipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battery {
    /// Source voltage in volts.
    pub voltage: f64,
}

impl Battery {
    /// Default voltage for newly placed batteries.
    pub const DEFAULT_VOLTAGE: f64 = 9.0;

    /// Create a new battery.
    pub fn new(voltage: f64) -> Self {
        Self { voltage }
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VOLTAGE)
    }
}
