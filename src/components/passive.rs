//! Passive components: resistor and switch.

use serde::{Deserialize, Serialize};

/// A fixed resistor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resistor {
    /// Resistance in ohms, always > 0.
    pub resistance: f64,
}

impl Resistor {
    /// Default resistance for newly placed resistors.
    pub const DEFAULT_RESISTANCE: f64 = 100.0;

    /// Create a new resistor.
    pub fn new(resistance: f64) -> Self {
        Self {
            // Minimum resistance to avoid a singular conductance
            resistance: resistance.max(1e-3),
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

impl Default for Resistor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RESISTANCE)
    }
}

/// A switch.
///
/// Modeled as a resistance:
/// - Closed: very small resistance (0.01 ohms)
/// - Open: very large resistance (1e9 ohms)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Switch {
    pub closed: bool,
}

impl Switch {
    /// Resistance when closed.
    pub const R_CLOSED: f64 = 0.01;
    /// Resistance when open.
    pub const R_OPEN: f64 = 1e9;

    /// Create a new switch.
    pub fn new(closed: bool) -> Self {
        Self { closed }
    }

    /// Get the current resistance.
    pub fn resistance(&self) -> f64 {
        if self.closed {
            Self::R_CLOSED
        } else {
            Self::R_OPEN
        }
    }

    /// Get the current conductance.
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance()
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

impl Default for Switch {
    fn default() -> Self {
        Self::new(false)
    }
}
