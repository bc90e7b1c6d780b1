//! Error types for the Voltlab evaluation engine.
//!
//! This module provides a unified error type [`WorkbenchError`] covering
//! workspace validation, netlist translation, and numerical solving.

use thiserror::Error;

/// Result type alias using [`WorkbenchError`].
pub type Result<T> = std::result::Result<T, WorkbenchError>;

/// Unified error type for all Voltlab operations.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    // ============ Workspace Errors ============
    /// Wire endpoints violate a structural invariant
    #[error("Invalid wire: {message}")]
    InvalidWire { message: String },

    /// A connector references a component or junction that does not exist
    #[error("Unknown connector {connector}")]
    UnknownConnector { connector: String },

    /// Component referenced by id does not exist
    #[error("Unknown component C{id}")]
    UnknownComponent { id: u32 },

    /// Invalid component attribute value
    #[error("Invalid parameter '{param}' for component C{id}: {message}")]
    InvalidParameter {
        id: u32,
        param: &'static str,
        message: String,
    },

    // ============ Translation Errors ============
    /// The workspace contains no electrical nets (nothing is wired)
    #[error("No electrical nets found - nothing to compute")]
    NoNets,

    // ============ Simulation Errors ============
    /// Matrix is singular and cannot be solved
    #[error("Singular matrix - circuit may contain a short or an isolated net")]
    SingularMatrix,

    /// Newton-Raphson iteration did not converge
    #[error("Newton-Raphson did not converge after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    // ============ I/O Errors ============
    /// Error reading a workspace file
    #[cfg(feature = "cli")]
    #[error("Failed to read workspace file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding a workspace snapshot
    #[error("Failed to decode workspace snapshot: {source}")]
    SnapshotDecodeError {
        #[source]
        source: serde_json::Error,
    },
}

impl WorkbenchError {
    /// Create an invalid-wire error.
    pub fn invalid_wire(message: impl Into<String>) -> Self {
        Self::InvalidWire {
            message: message.into(),
        }
    }

    /// Create an invalid-parameter error.
    pub fn invalid_parameter(id: u32, param: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            id,
            param,
            message: message.into(),
        }
    }

    /// Create a convergence failure error.
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }
}

impl From<serde_json::Error> for WorkbenchError {
    fn from(source: serde_json::Error) -> Self {
        Self::SnapshotDecodeError { source }
    }
}
