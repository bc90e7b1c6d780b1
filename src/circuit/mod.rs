//! Workspace graph representation and net building.
//!
//! This module provides the editable circuit model ([`Workspace`]) and the
//! net builder ([`NetMap`]) that collapses its wire graph into electrical
//! nets for the solver.

mod nets;
mod types;
mod workspace;

pub use nets::NetMap;
pub use types::{ComponentId, Connector, JunctionId, NetId, Terminal, WireId};
pub use workspace::{ComponentInstance, Wire, Workspace};
