//! Model translation: workspace components into solver primitives.
//!
//! Each placed component becomes a stamp addressed by solver node indices.
//! A terminal whose net is a singleton (nothing wired to it) maps to a
//! null (`None`) node; such stamps are carried through and skipped by both
//! solvers rather than rejected.

use crate::circuit::{ComponentId, NetMap, Terminal, Workspace};
use crate::components::{Component, DiodeModel};
use crate::error::{Result, WorkbenchError};

/// A resistive branch (resistor, or a switch with its state folded in).
#[derive(Debug, Clone)]
pub struct ResistorStamp {
    /// Solver nodes for the [left, right] terminals.
    pub nets: [Option<usize>; 2],
    pub resistance: f64,
    pub component: ComponentId,
}

/// An ideal voltage source branch.
#[derive(Debug, Clone)]
pub struct SourceStamp {
    pub net_pos: Option<usize>,
    pub net_neg: Option<usize>,
    pub voltage: f64,
    pub component: ComponentId,
}

/// A nonlinear diode branch.
#[derive(Debug, Clone)]
pub struct DiodeStamp {
    pub net_anode: Option<usize>,
    pub net_cathode: Option<usize>,
    pub model: DiodeModel,
    pub component: ComponentId,
}

/// The solver-facing view of a workspace snapshot.
#[derive(Debug)]
pub struct Netlist {
    /// Number of solver nodes (wired nets).
    pub node_count: usize,
    pub resistors: Vec<ResistorStamp>,
    pub sources: Vec<SourceStamp>,
    pub diodes: Vec<DiodeStamp>,
}

impl Netlist {
    /// Whether any diode stamp is fully connected (forces iteration).
    pub fn has_active_diodes(&self) -> bool {
        self.diodes
            .iter()
            .any(|d| d.net_anode.is_some() && d.net_cathode.is_some())
    }
}

/// Translate a workspace snapshot into stamp lists.
///
/// Solver nodes are the wired nets, renumbered densely in net-id order.
/// Returns [`WorkbenchError::NoNets`] when no net joins two connectors:
/// nothing is wired, so there is nothing to compute.
pub fn translate(workspace: &Workspace, nets: &NetMap) -> Result<Netlist> {
    // Dense renumbering of wired nets; singleton nets stay unmapped.
    let mut node_of_net: Vec<Option<usize>> = vec![None; nets.len()];
    let mut node_count = 0usize;
    for net in 0..nets.len() {
        if nets.is_wired(crate::circuit::NetId(net)) {
            node_of_net[net] = Some(node_count);
            node_count += 1;
        }
    }
    if node_count == 0 {
        return Err(WorkbenchError::NoNets);
    }

    let node_for = |component: &crate::circuit::ComponentInstance, terminal: Terminal| {
        nets.net_of(component.connector(terminal))
            .and_then(|net| node_of_net[net.0])
    };

    let mut resistors = Vec::new();
    let mut sources = Vec::new();
    let mut diodes = Vec::new();

    for instance in &workspace.components {
        match &instance.part {
            Component::Resistor(r) => resistors.push(ResistorStamp {
                nets: [
                    node_for(instance, Terminal::Left),
                    node_for(instance, Terminal::Right),
                ],
                resistance: r.resistance,
                component: instance.id,
            }),
            Component::Switch(s) => resistors.push(ResistorStamp {
                nets: [
                    node_for(instance, Terminal::Left),
                    node_for(instance, Terminal::Right),
                ],
                resistance: s.resistance(),
                component: instance.id,
            }),
            Component::Battery(b) => sources.push(SourceStamp {
                net_pos: node_for(instance, instance.positive_terminal()),
                net_neg: node_for(instance, instance.negative_terminal()),
                voltage: b.voltage,
                component: instance.id,
            }),
            Component::Led(d) => diodes.push(DiodeStamp {
                net_anode: node_for(instance, instance.positive_terminal()),
                net_cathode: node_for(instance, instance.negative_terminal()),
                model: d.model(),
                component: instance.id,
            }),
        }
    }

    Ok(Netlist {
        node_count,
        resistors,
        sources,
        diodes,
    })
}
