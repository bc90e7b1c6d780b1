//! # Voltlab Core
//!
//! The evaluation engine behind an interactive circuit workbench: users
//! drop batteries, resistors, LEDs and switches onto a canvas, wire their
//! terminals together, and watch currents flow and LEDs light up.
//!
//! This library provides:
//! - A workspace model for placed components, junctions and wires
//! - Net building over the wiring graph (union-find)
//! - Modified Nodal Analysis (MNA) based DC evaluation with
//!   Newton-Raphson iteration for the exponential LED model
//! - A matrix-free path-tracing fallback when MNA cannot solve
//! - Result annotation back onto the components (current, voltage drop,
//!   LED powered state and intensity)
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Workspace representation, connectors, wires, nets
//! - [`components`] - Component models (battery, resistor, LED, switch)
//! - [`solver`] - Netlist translation, MNA assembly, solving, annotation
//! - [`session`] - Evaluation orchestration over a live workspace
//!
//! ## Evaluation Method
//!
//! Each evaluation pass:
//!
//! 1. Partition connectors into nets with union-find over the wires
//! 2. Translate components into solver stamps addressed by net
//! 3. Assemble and solve the MNA system Ax = z; LEDs iterate using
//!    Newton-Raphson until the voltage update falls below tolerance
//! 4. Write branch currents and drops back onto the components
//!
//! There is no ground node: a tiny leak conductance on every diagonal
//! anchors the floating reference, and only voltage differences are
//! reported.

pub mod circuit;
pub mod components;
pub mod error;
pub mod session;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Workspace;
pub use error::{Result, WorkbenchError};
pub use session::{Session, SessionConfig};
pub use solver::{evaluate, EngineConfig, EvalReport, EvalStatus};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmWorkbench;

/// Thermal voltage at room temperature (approximately 26mV)
pub const THERMAL_VOLTAGE: f64 = 0.0258;
