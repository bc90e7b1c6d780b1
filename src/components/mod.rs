//! Component models for the workbench.
//!
//! Four component kinds are supported, all two-terminal:
//! - [`Resistor`] - fixed resistance
//! - [`Battery`] - ideal DC voltage source
//! - [`Led`] - exponential diode with a color-dependent forward voltage
//! - [`Switch`] - extreme low/high resistance depending on state
//!
//! A component's electrical attributes are authoritative input; the
//! [`Measurement`] attached to each placed instance is a presentation
//! derivative recomputed on every evaluation.

mod battery;
mod led;
mod passive;

pub use battery::Battery;
pub use led::{DiodeModel, Led, NOMINAL_LED_CURRENT};
pub use passive::{Resistor, Switch};

use serde::{Deserialize, Serialize};

/// A circuit component, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Component {
    Resistor(Resistor),
    Battery(Battery),
    Led(Led),
    Switch(Switch),
}

impl Component {
    /// Human-readable kind label.
    pub fn label(&self) -> &'static str {
        match self {
            Component::Resistor(_) => "resistor",
            Component::Battery(_) => "battery",
            Component::Led(_) => "led",
            Component::Switch(_) => "switch",
        }
    }

    /// Check if this component is nonlinear (requires Newton-Raphson iteration).
    pub fn is_nonlinear(&self) -> bool {
        matches!(self, Component::Led(_))
    }

    /// Check if this component is a voltage source.
    pub fn is_source(&self) -> bool {
        matches!(self, Component::Battery(_))
    }

    /// Short attribute summary for logs and the CLI table.
    pub fn summary(&self) -> String {
        match self {
            Component::Resistor(r) => format!("{} ohm", r.resistance),
            Component::Battery(b) => format!("{} V", b.voltage),
            Component::Led(d) => format!("Vf {} V", d.forward_voltage),
            Component::Switch(s) => {
                if s.closed {
                    "closed".to_string()
                } else {
                    "open".to_string()
                }
            }
        }
    }
}

/// Per-instance evaluation output, written by the result annotator.
///
/// `current` and `voltage_drop` are `None` when the last evaluation had no
/// result for this component (unconnected terminal, skipped stamp, or a
/// `no-nets` evaluation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Branch current in amperes (signed; left-to-right positive).
    pub current: Option<f64>,
    /// Voltage drop across the component in volts (signed).
    pub voltage_drop: Option<f64>,
    /// Whether an LED is conducting enough to light up.
    pub powered: bool,
    /// Visual brightness in [0, 1] (LEDs only, 0 otherwise).
    pub intensity: f64,
}

impl Measurement {
    /// Reset to the "nothing computed" state.
    pub fn clear(&mut self) {
        *self = Measurement::default();
    }
}
