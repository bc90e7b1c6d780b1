//! Workspace: the owned model of placed components, junctions, and wires.
//!
//! The workspace is the explicit root object passed into evaluation. It
//! hands out ids from a single monotonic counter; ids are never reused
//! within a workspace's lifetime.

use serde::{Deserialize, Serialize};

use super::types::{ComponentId, Connector, JunctionId, Terminal, WireId};
use crate::components::{Component, Measurement};
use crate::error::{Result, WorkbenchError};

/// A placed component instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub id: ComponentId,
    /// Electrical attributes, tagged by kind.
    pub part: Component,
    /// Whether terminal polarity roles are swapped (rotated/flipped part).
    #[serde(default)]
    pub flipped: bool,
    /// Evaluation output; presentation derivative, never persisted.
    #[serde(skip)]
    pub measurement: Measurement,
}

impl ComponentInstance {
    /// Terminal carrying the battery's positive pole / the LED's anode.
    pub fn positive_terminal(&self) -> Terminal {
        if self.flipped {
            Terminal::Left
        } else {
            Terminal::Right
        }
    }

    /// Terminal carrying the battery's negative pole / the LED's cathode.
    pub fn negative_terminal(&self) -> Terminal {
        self.positive_terminal().other()
    }

    /// Connector for one of this instance's terminals.
    pub fn connector(&self, terminal: Terminal) -> Connector {
        Connector::terminal(self.id, terminal)
    }
}

/// An undirected wire between exactly two connectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    pub id: WireId,
    pub ends: [Connector; 2],
}

impl Wire {
    /// Check whether either end attaches to the given connector.
    pub fn touches(&self, connector: Connector) -> bool {
        self.ends[0] == connector || self.ends[1] == connector
    }
}

/// The full editable circuit model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    pub components: Vec<ComponentInstance>,
    pub junctions: Vec<JunctionId>,
    pub wires: Vec<Wire>,
    /// Monotonic id counter shared by components, junctions, and wires.
    next_id: u32,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a component.
    pub fn add_component(&mut self, part: Component) -> ComponentId {
        let id = ComponentId(self.alloc_id());
        self.components.push(ComponentInstance {
            id,
            part,
            flipped: false,
            measurement: Measurement::default(),
        });
        id
    }

    /// Place a bare wire junction.
    pub fn add_junction(&mut self) -> JunctionId {
        let id = JunctionId(self.alloc_id());
        self.junctions.push(id);
        id
    }

    /// Connect two connectors with a wire.
    ///
    /// Rejects degenerate wires: both ends on the same connector, both ends
    /// on the same component, or an end whose owner does not exist.
    pub fn add_wire(&mut self, a: Connector, b: Connector) -> Result<WireId> {
        if a == b {
            return Err(WorkbenchError::invalid_wire(
                "both endpoints are the same connector",
            ));
        }
        if let (Some(ca), Some(cb)) = (a.component(), b.component()) {
            if ca == cb {
                return Err(WorkbenchError::invalid_wire(format!(
                    "both endpoints are terminals of {ca}"
                )));
            }
        }
        for end in [a, b] {
            if !self.contains_connector(end) {
                return Err(WorkbenchError::UnknownConnector {
                    connector: end.to_string(),
                });
            }
        }
        let id = WireId(self.alloc_id());
        self.wires.push(Wire { id, ends: [a, b] });
        Ok(id)
    }

    /// Remove a wire by id. Removing an unknown wire is a no-op.
    pub fn remove_wire(&mut self, id: WireId) {
        self.wires.retain(|w| w.id != id);
    }

    /// Remove a component and every wire attached to its terminals.
    pub fn remove_component(&mut self, id: ComponentId) {
        self.components.retain(|c| c.id != id);
        self.wires.retain(|w| {
            w.ends
                .iter()
                .all(|end| end.component() != Some(id))
        });
    }

    /// Remove a junction and every wire attached to it.
    pub fn remove_junction(&mut self, id: JunctionId) {
        self.junctions.retain(|j| *j != id);
        self.wires
            .retain(|w| !w.touches(Connector::Junction(id)));
    }

    /// Look up a component instance.
    pub fn component(&self, id: ComponentId) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Look up a component instance mutably.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut ComponentInstance> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Set a switch's state.
    pub fn set_switch(&mut self, id: ComponentId, closed: bool) -> Result<()> {
        match self.component_mut(id) {
            Some(ComponentInstance {
                part: Component::Switch(s),
                ..
            }) => {
                s.closed = closed;
                Ok(())
            }
            Some(_) => Err(WorkbenchError::invalid_parameter(
                id.0,
                "closed",
                "component is not a switch",
            )),
            None => Err(WorkbenchError::UnknownComponent { id: id.0 }),
        }
    }

    /// Flip a component's terminal polarity roles.
    pub fn set_flipped(&mut self, id: ComponentId, flipped: bool) -> Result<()> {
        let inst = self
            .component_mut(id)
            .ok_or(WorkbenchError::UnknownComponent { id: id.0 })?;
        inst.flipped = flipped;
        Ok(())
    }

    /// Check whether a connector's owner exists in this workspace.
    pub fn contains_connector(&self, connector: Connector) -> bool {
        match connector {
            Connector::Terminal { component, .. } => self.component(component).is_some(),
            Connector::Junction(j) => self.junctions.contains(&j),
        }
    }

    /// Every connector in the workspace, in a deterministic order:
    /// component terminals (left, then right) in placement order, then
    /// junctions in placement order.
    pub fn connectors(&self) -> Vec<Connector> {
        let mut out = Vec::with_capacity(self.components.len() * 2 + self.junctions.len());
        for c in &self.components {
            out.push(c.connector(Terminal::Left));
            out.push(c.connector(Terminal::Right));
        }
        for &j in &self.junctions {
            out.push(Connector::Junction(j));
        }
        out
    }

    /// Clear every component's measurement.
    pub fn clear_measurements(&mut self) {
        for c in &mut self.components {
            c.measurement.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Resistor};

    fn two_part_workspace() -> (Workspace, ComponentId, ComponentId) {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::default()));
        let res = ws.add_component(Component::Resistor(Resistor::default()));
        (ws, bat, res)
    }

    #[test]
    fn ids_are_monotonic_and_unique() {
        let (mut ws, bat, res) = two_part_workspace();
        let j = ws.add_junction();
        assert!(bat.0 < res.0);
        assert!(res.0 < j.0);
        ws.remove_component(res);
        let res2 = ws.add_component(Component::Resistor(Resistor::default()));
        assert!(res2.0 > j.0, "removed ids must not be reused");
    }

    #[test]
    fn rejects_degenerate_wires() {
        let (mut ws, bat, res) = two_part_workspace();
        let a = Connector::terminal(bat, Terminal::Left);
        assert!(ws.add_wire(a, a).is_err());
        assert!(ws
            .add_wire(a, Connector::terminal(bat, Terminal::Right))
            .is_err());
        assert!(ws
            .add_wire(a, Connector::terminal(ComponentId(999), Terminal::Left))
            .is_err());
        assert!(ws
            .add_wire(a, Connector::terminal(res, Terminal::Left))
            .is_ok());
    }

    #[test]
    fn removing_a_component_drops_its_wires() {
        let (mut ws, bat, res) = two_part_workspace();
        let j = ws.add_junction();
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(res, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(Connector::terminal(res, Terminal::Right), Connector::Junction(j))
            .unwrap();
        assert_eq!(ws.wires.len(), 2);

        ws.remove_component(res);
        assert!(ws.wires.is_empty());
        assert_eq!(ws.components.len(), 1);
    }

    #[test]
    fn flipping_swaps_polarity_roles() {
        let (mut ws, bat, _) = two_part_workspace();
        assert_eq!(ws.component(bat).unwrap().positive_terminal(), Terminal::Right);
        ws.set_flipped(bat, true).unwrap();
        assert_eq!(ws.component(bat).unwrap().positive_terminal(), Terminal::Left);
    }

    #[test]
    fn snapshot_roundtrip_skips_measurements() {
        let (mut ws, bat, res) = two_part_workspace();
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(res, Terminal::Left),
        )
        .unwrap();
        ws.component_mut(bat).unwrap().measurement.current = Some(1.0);

        let json = serde_json::to_string(&ws).unwrap();
        let back: Workspace = serde_json::from_str(&json).unwrap();
        assert_eq!(back.components.len(), 2);
        assert_eq!(back.wires.len(), 1);
        assert_eq!(back.component(bat).unwrap().measurement.current, None);
    }
}
