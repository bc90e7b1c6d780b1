//! Evaluation entry point: one pass from workspace to annotated results.

use serde::{Deserialize, Serialize};

use super::annotate::{apply_readouts, readouts_from_solution};
use super::fallback::solve_paths;
use super::netlist::translate;
use super::newton::NewtonRaphson;
use super::{CONVERGENCE_TOLERANCE, MAX_ITERATIONS};
use crate::circuit::{NetMap, Workspace};
use crate::error::WorkbenchError;

/// Knobs for a single evaluation pass.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Use the MNA solver; when false, only the path heuristic runs.
    pub use_mna: bool,
    /// Newton-Raphson iteration cap.
    pub max_iterations: usize,
    /// Newton-Raphson convergence tolerance (volts).
    pub tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_mna: true,
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }
}

/// How an evaluation pass concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvalStatus {
    /// MNA solved the circuit.
    Success,
    /// Nothing is wired together; all measurements cleared.
    NoNets,
    /// MNA disabled; results come from the path heuristic.
    NoSolver,
    /// MNA failed (singular or non-convergent); results come from the
    /// path heuristic.
    SolverFailed,
}

impl EvalStatus {
    /// Stable string form for UI / serialization surfaces.
    pub fn reason_code(self) -> &'static str {
        match self {
            EvalStatus::Success => "success",
            EvalStatus::NoNets => "no-nets",
            EvalStatus::NoSolver => "no-solver",
            EvalStatus::SolverFailed => "solver-failed",
        }
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalReport {
    pub status: EvalStatus,
    /// Newton-Raphson iterations spent (0 when MNA did not run).
    pub iterations: usize,
}

/// Evaluate the workspace in place.
///
/// Builds nets, translates to a netlist, solves, and annotates every
/// touched component's measurement. Never returns an error: failures
/// degrade to the fallback solver or to cleared measurements.
pub fn evaluate(workspace: &mut Workspace, config: &EngineConfig) -> EvalReport {
    workspace.clear_measurements();

    let nets = NetMap::build(workspace);
    let netlist = match translate(workspace, &nets) {
        Ok(netlist) => netlist,
        Err(WorkbenchError::NoNets) => {
            log::debug!("evaluation skipped: no wired nets");
            return EvalReport {
                status: EvalStatus::NoNets,
                iterations: 0,
            };
        }
        Err(err) => {
            log::warn!("netlist translation failed: {err}");
            return EvalReport {
                status: EvalStatus::NoNets,
                iterations: 0,
            };
        }
    };

    if config.use_mna {
        let solver = NewtonRaphson::with_config(config.max_iterations, config.tolerance);
        match solver.solve(&netlist) {
            Ok(solution) => {
                let readouts = readouts_from_solution(&netlist, &solution);
                apply_readouts(workspace, &readouts);
                return EvalReport {
                    status: EvalStatus::Success,
                    iterations: solution.iterations,
                };
            }
            Err(err) => {
                log::warn!("MNA solve failed, using path fallback: {err}");
                let readouts = solve_paths(&netlist);
                apply_readouts(workspace, &readouts);
                return EvalReport {
                    status: EvalStatus::SolverFailed,
                    iterations: 0,
                };
            }
        }
    }

    let readouts = solve_paths(&netlist);
    apply_readouts(workspace, &readouts);
    EvalReport {
        status: EvalStatus::NoSolver,
        iterations: 0,
    }
}
