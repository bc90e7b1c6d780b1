//! Circuit evaluation: netlist translation and numerical solving.
//!
//! ## Modified Nodal Analysis
//!
//! The advanced solver assembles a system of equations Ax = z where:
//! - x contains net voltages and battery branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where G is the conductance matrix (net equations), B and C connect
//! voltage sources to nets, v is the vector of net voltages, and j the
//! vector of source currents. LEDs are nonlinear and enter G through their
//! Newton-Raphson companion models.
//!
//! When the advanced solver is unavailable or fails (singular matrix,
//! non-convergence), evaluation falls back to a matrix-free path heuristic
//! good enough to light LEDs in demos.

mod annotate;
mod engine;
mod fallback;
mod mna;
mod netlist;
mod newton;

pub use annotate::{apply_readouts, readouts_from_solution};
pub use engine::{evaluate, EngineConfig, EvalReport, EvalStatus};
pub use fallback::solve_paths;
pub use mna::MnaMatrix;
pub use netlist::{translate, DiodeStamp, Netlist, ResistorStamp, SourceStamp};
pub use newton::{DcSolution, NewtonRaphson};

use crate::circuit::ComponentId;

/// Convergence tolerance for Newton-Raphson iteration (volts).
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// Maximum Newton-Raphson iterations per evaluation.
pub const MAX_ITERATIONS: usize = 50;

/// Leak conductance stamped on every diagonal. Anchors the floating
/// voltage reference (the workbench has no ground node) and keeps
/// wired-but-dangling nets from producing a zero pivot.
pub const MIN_CONDUCTANCE: f64 = 1e-12;

/// Current magnitude above which an LED counts as powered (amperes).
pub const POWERED_THRESHOLD: f64 = 1e-6;

/// One solved branch, addressed back to its component.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchReadout {
    pub component: ComponentId,
    /// Signed branch current in amperes. For batteries, positive means
    /// conventional current flowing out of the positive pole.
    pub current: f64,
    /// Signed voltage drop in volts.
    pub voltage_drop: f64,
}
