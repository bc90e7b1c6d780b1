//! Newton-Raphson iteration over the MNA system.
//!
//! Resistive-only netlists solve in a single pass. With LEDs present, the
//! system is rebuilt each iteration with the diodes linearized at the
//! previous solution (step-limited per diode for stability), until the
//! maximum per-node change between successive solves falls below
//! tolerance.

use super::mna::MnaMatrix;
use super::netlist::Netlist;
use super::{CONVERGENCE_TOLERANCE, MAX_ITERATIONS, MIN_CONDUCTANCE};
use crate::error::{Result, WorkbenchError};

/// Converged DC operating point for a netlist.
#[derive(Debug, Clone)]
pub struct DcSolution {
    /// Voltage per solver node.
    pub voltages: Vec<f64>,
    /// Current per source stamp, aligned with `Netlist::sources`; positive
    /// means conventional current out of the positive pole. Zero for
    /// sources that were skipped (unconnected or degenerate).
    pub source_currents: Vec<f64>,
    /// Newton-Raphson iterations used (1 for resistive-only netlists).
    pub iterations: usize,
}

impl DcSolution {
    /// Voltage at a node (`None` reads as the 0 V reference).
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        node.map_or(0.0, |i| self.voltages[i])
    }
}

/// Newton-Raphson solver for the nonlinear MNA system.
pub struct NewtonRaphson {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new()
    }
}

impl NewtonRaphson {
    /// Create a solver with the default iteration budget and tolerance.
    pub fn new() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }

    /// Create a solver with a custom iteration budget and tolerance.
    pub fn with_config(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            tolerance,
        }
    }

    /// Solve the netlist's DC operating point.
    ///
    /// Fails with [`WorkbenchError::SingularMatrix`] or
    /// [`WorkbenchError::ConvergenceFailure`]; the caller is expected to
    /// fall back to the path heuristic on either.
    pub fn solve(&self, netlist: &Netlist) -> Result<DcSolution> {
        let n = netlist.node_count;

        // Sources with both poles wired to distinct nodes get a branch row;
        // the rest are electrically inert and carry no current.
        let active_sources: Vec<usize> = netlist
            .sources
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                s.net_pos.is_some() && s.net_neg.is_some() && s.net_pos != s.net_neg
            })
            .map(|(i, _)| i)
            .collect();

        let size = n + active_sources.len();
        let mut matrix = MnaMatrix::new(size);

        let has_diodes = netlist.has_active_diodes();
        // Per-node voltage guess and per-diode linearization point
        let mut v_guess = vec![0.0; n];
        let mut diode_op = vec![0.0; netlist.diodes.len()];
        let mut residual = f64::INFINITY;

        for iter in 0..self.max_iterations {
            self.assemble(netlist, &active_sources, &diode_op, &mut matrix);
            matrix.factor()?;
            matrix.solve()?;

            if !has_diodes {
                return Ok(self.extract(netlist, &active_sources, &matrix, 1));
            }

            // Convergence is judged on successive solves; the
            // linearization point only gets step-limited, never blended,
            // so the metric and the operating point cannot disagree.
            residual = (0..n)
                .map(|i| (matrix.x[i] - v_guess[i]).abs())
                .fold(0.0, f64::max);

            v_guess.copy_from_slice(&matrix.x[..n]);
            for (k, diode) in netlist.diodes.iter().enumerate() {
                if let (Some(a), Some(c)) = (diode.net_anode, diode.net_cathode) {
                    let vd = v_guess[a] - v_guess[c];
                    diode_op[k] = diode.model.limit_step(diode_op[k], vd);
                }
            }

            if residual < self.tolerance {
                return Ok(self.extract(netlist, &active_sources, &matrix, iter + 1));
            }
        }

        Err(WorkbenchError::convergence_failure(
            self.max_iterations,
            residual,
        ))
    }

    /// Build the full system matrix for one iteration.
    fn assemble(
        &self,
        netlist: &Netlist,
        active_sources: &[usize],
        diode_op: &[f64],
        matrix: &mut MnaMatrix,
    ) {
        let n = netlist.node_count;
        matrix.clear();

        // Leak conductance anchors the floating reference and keeps
        // dangling-but-wired nets from producing an empty row.
        for i in 0..n {
            matrix.add(i, i, MIN_CONDUCTANCE);
        }

        // A stamp with a null (unconnected) node is an open branch: skip.
        for r in &netlist.resistors {
            if let [Some(n1), Some(n2)] = r.nets {
                matrix.stamp_conductance(Some(n1), Some(n2), 1.0 / r.resistance);
            }
        }

        for (br, &idx) in active_sources.iter().enumerate() {
            let s = &netlist.sources[idx];
            matrix.stamp_voltage_source(s.net_pos, s.net_neg, n + br, s.voltage);
        }

        for (k, d) in netlist.diodes.iter().enumerate() {
            if let (Some(a), Some(c)) = (d.net_anode, d.net_cathode) {
                if a == c {
                    continue;
                }
                let (g, i_eq) = d.model.linearize(diode_op[k]);
                matrix.stamp_conductance(Some(a), Some(c), g);
                matrix.stamp_current_source(Some(a), Some(c), i_eq);
            }
        }
    }

    /// Read the solution vector back out into a [`DcSolution`].
    fn extract(
        &self,
        netlist: &Netlist,
        active_sources: &[usize],
        matrix: &MnaMatrix,
        iterations: usize,
    ) -> DcSolution {
        let n = netlist.node_count;
        let mut source_currents = vec![0.0; netlist.sources.len()];
        for (br, &idx) in active_sources.iter().enumerate() {
            // The MNA branch variable is the current into the positive
            // pole; negate so positive means delivered current.
            source_currents[idx] = -matrix.x[n + br];
        }
        DcSolution {
            voltages: matrix.x[..n].to_vec(),
            source_currents,
            iterations,
        }
    }
}
