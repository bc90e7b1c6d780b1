//! Net builder: collapses the wire graph into electrical nets.
//!
//! Two connectors belong to the same net iff they are joined by a path of
//! wires (transitively, through junctions). Nets are rebuilt from scratch
//! on every evaluation; their dense ids carry no identity across
//! evaluations. Net building cannot fail: with no wires at all, every
//! connector gets its own singleton net.

use std::collections::HashMap;

use super::types::{Connector, NetId};
use super::workspace::Workspace;

/// Disjoint-set over connector indices with path halving.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// The connector → net assignment for one evaluation.
#[derive(Debug)]
pub struct NetMap {
    ids: HashMap<Connector, NetId>,
    sizes: Vec<usize>,
}

impl NetMap {
    /// Build the net assignment for a workspace snapshot.
    ///
    /// Net ids are dense `[0, N)`, numbered by first appearance in the
    /// workspace's deterministic connector order, so repeated builds of an
    /// unchanged workspace produce identical assignments.
    pub fn build(workspace: &Workspace) -> Self {
        let connectors = workspace.connectors();
        let index: HashMap<Connector, usize> = connectors
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();

        let mut sets = DisjointSet::new(connectors.len());
        for wire in &workspace.wires {
            // Workspace mutators keep wire endpoints valid; tolerate stale
            // ends in hand-built snapshots by ignoring them.
            if let (Some(&a), Some(&b)) = (index.get(&wire.ends[0]), index.get(&wire.ends[1])) {
                sets.union(a, b);
            }
        }

        let mut ids = HashMap::with_capacity(connectors.len());
        let mut root_to_net: HashMap<usize, NetId> = HashMap::new();
        let mut sizes = Vec::new();
        for (i, &connector) in connectors.iter().enumerate() {
            let root = sets.find(i);
            let net = *root_to_net.entry(root).or_insert_with(|| {
                sizes.push(0);
                NetId(sizes.len() - 1)
            });
            sizes[net.0] += 1;
            ids.insert(connector, net);
        }

        Self { ids, sizes }
    }

    /// Net assignment for a connector. `None` only for connectors unknown
    /// to the workspace snapshot this map was built from.
    pub fn net_of(&self, connector: Connector) -> Option<NetId> {
        self.ids.get(&connector).copied()
    }

    /// Total number of nets, singletons included.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether there are no nets at all (empty workspace).
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Number of connectors in a net.
    pub fn size_of(&self, net: NetId) -> usize {
        self.sizes[net.0]
    }

    /// Whether a net joins at least two connectors (i.e. carries a wire).
    pub fn is_wired(&self, net: NetId) -> bool {
        self.sizes[net.0] > 1
    }
}
