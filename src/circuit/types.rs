//! Core identifier types for the workspace graph.
//!
//! Components, junctions, and wires are addressed by small opaque ids
//! handed out by the workspace's monotonic counter. Net ids are dense
//! indices produced fresh on every evaluation and must never be assumed
//! stable across evaluations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a placed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A unique identifier for a bare wire junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JunctionId(pub u32);

impl fmt::Display for JunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}", self.0)
    }
}

/// A unique identifier for a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireId(pub u32);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// One of the two terminals every component has.
///
/// Polarity convention: a battery's positive pole and an LED's anode sit
/// on the [`Terminal::Right`] terminal unless the instance is flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    Left,
    Right,
}

impl Terminal {
    /// The opposite terminal.
    pub fn other(self) -> Terminal {
        match self {
            Terminal::Left => Terminal::Right,
            Terminal::Right => Terminal::Left,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Left => write!(f, "L"),
            Terminal::Right => write!(f, "R"),
        }
    }
}

/// A wire attachment point: a component terminal or a bare junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    /// A terminal on a placed component.
    Terminal {
        component: ComponentId,
        terminal: Terminal,
    },
    /// A free-standing wire junction.
    Junction(JunctionId),
}

impl Connector {
    /// Shorthand constructor for a component terminal.
    pub fn terminal(component: ComponentId, terminal: Terminal) -> Self {
        Connector::Terminal {
            component,
            terminal,
        }
    }

    /// The component this connector belongs to, if it is a terminal.
    pub fn component(&self) -> Option<ComponentId> {
        match self {
            Connector::Terminal { component, .. } => Some(*component),
            Connector::Junction(_) => None,
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connector::Terminal {
                component,
                terminal,
            } => write!(f, "{component}.{terminal}"),
            Connector::Junction(j) => write!(f, "{j}"),
        }
    }
}

/// A dense net index valid for a single evaluation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "net{}", self.0)
    }
}
