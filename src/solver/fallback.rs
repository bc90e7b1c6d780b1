//! Matrix-free fallback solver.
//!
//! Used when the MNA solver is unavailable or fails (singular matrix,
//! non-convergence). Estimates branch currents by walking current paths
//! from each battery's positive net to its negative net over the passive
//! edges, splitting current across parallel paths by conductance and
//! assigning LEDs their forward-voltage drop heuristically. Best effort,
//! not physically exact; it never reports numeric failure.

use std::collections::VecDeque;

use super::netlist::Netlist;
use super::BranchReadout;
use crate::circuit::ComponentId;

/// Placeholder series resistance an LED contributes to a path.
const LED_PATH_RESISTANCE: f64 = 10.0;

/// Maximum edge-disjoint paths searched per source.
const MAX_PATHS_PER_SOURCE: usize = 8;

/// Paths with less series resistance than this are pure wire; they carry
/// no meaningful current to report.
const MIN_PATH_RESISTANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
enum EdgeKind {
    /// Resistor or switch.
    Resistive { resistance: f64 },
    /// LED: conducts anode → cathode only, drops Vf.
    Led { vf: f64 },
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    /// For resistive edges, an arbitrary orientation; for LEDs, a = anode.
    a: usize,
    b: usize,
    kind: EdgeKind,
    component: ComponentId,
}

impl Edge {
    /// Node reached by traversing from `from`, if this edge conducts that
    /// way. LEDs only conduct from anode to cathode.
    fn step(&self, from: usize) -> Option<usize> {
        match self.kind {
            EdgeKind::Resistive { .. } => {
                if from == self.a {
                    Some(self.b)
                } else if from == self.b {
                    Some(self.a)
                } else {
                    None
                }
            }
            EdgeKind::Led { .. } => (from == self.a).then_some(self.b),
        }
    }

    fn pair(&self) -> (usize, usize) {
        (self.a.min(self.b), self.a.max(self.b))
    }
}

/// Estimate branch currents without matrix solving.
///
/// Returns one readout per touched component, deduplicated with the
/// larger-|current| entry winning, plus one per conducting source.
pub fn solve_paths(netlist: &Netlist) -> Vec<BranchReadout> {
    let mut edges = Vec::new();
    for r in &netlist.resistors {
        if let [Some(n1), Some(n2)] = r.nets {
            if n1 != n2 {
                edges.push(Edge {
                    a: n1,
                    b: n2,
                    kind: EdgeKind::Resistive {
                        resistance: r.resistance,
                    },
                    component: r.component,
                });
            }
        }
    }
    for d in &netlist.diodes {
        if let (Some(a), Some(c)) = (d.net_anode, d.net_cathode) {
            if a != c {
                edges.push(Edge {
                    a,
                    b: c,
                    kind: EdgeKind::Led { vf: d.model.vf },
                    component: d.component,
                });
            }
        }
    }

    let mut adjacency = vec![Vec::new(); netlist.node_count];
    for (idx, e) in edges.iter().enumerate() {
        adjacency[e.a].push(idx);
        adjacency[e.b].push(idx);
    }

    let mut readouts: Vec<BranchReadout> = Vec::new();
    for src in &netlist.sources {
        let (pos, neg) = match (src.net_pos, src.net_neg) {
            (Some(p), Some(n)) if p != n => (p, n),
            _ => continue,
        };

        let mut used = vec![false; edges.len()];
        let mut source_current = 0.0;
        for _ in 0..MAX_PATHS_PER_SOURCE {
            let Some(path) = find_path(&adjacency, &edges, &used, pos, neg) else {
                break;
            };
            source_current += walk_path(&edges, &mut used, &path, src.voltage, &mut readouts);
        }

        if source_current != 0.0 {
            merge(
                &mut readouts,
                BranchReadout {
                    component: src.component,
                    current: source_current,
                    voltage_drop: src.voltage,
                },
            );
        }
    }

    readouts
}

/// Breadth-first search for a path of unused edges from `start` to `goal`.
/// Returns the edge indices in traversal order.
fn find_path(
    adjacency: &[Vec<usize>],
    edges: &[Edge],
    used: &[bool],
    start: usize,
    goal: usize,
) -> Option<Vec<usize>> {
    let mut came_by: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut visited = vec![false; adjacency.len()];
    visited[start] = true;

    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        if node == goal {
            // Rebuild the edge sequence by walking predecessors
            let mut path = Vec::new();
            let mut at = goal;
            while at != start {
                let e = came_by[at].expect("predecessor chain is complete");
                path.push(e);
                let edge = &edges[e];
                at = if edge.a == at { edge.b } else { edge.a };
            }
            path.reverse();
            return Some(path);
        }
        for &e in &adjacency[node] {
            if used[e] {
                continue;
            }
            if let Some(next) = edges[e].step(node) {
                if !visited[next] {
                    visited[next] = true;
                    came_by[next] = Some(e);
                    queue.push_back(next);
                }
            }
        }
    }
    None
}

/// Attribute one path's current to its components. Marks the traversed
/// edges (and their parallel siblings) used, returns the path current.
fn walk_path(
    edges: &[Edge],
    used: &mut [bool],
    path: &[usize],
    source_voltage: f64,
    readouts: &mut Vec<BranchReadout>,
) -> f64 {
    // Group each step into a bundle: the traversed edge plus any unused
    // parallel resistive edges between the same net pair, combined via the
    // reciprocal-sum rule.
    struct Bundle {
        members: Vec<usize>,
        resistance: f64,
    }

    let mut bundles = Vec::with_capacity(path.len());
    let mut r_sum = 0.0;
    let mut vf_sum = 0.0;
    let mut has_led = false;

    for &e in path {
        match edges[e].kind {
            EdgeKind::Resistive { .. } => {
                let pair = edges[e].pair();
                let mut members = Vec::new();
                let mut g = 0.0;
                for (idx, other) in edges.iter().enumerate() {
                    if !used[idx] && other.pair() == pair {
                        if let EdgeKind::Resistive { resistance } = other.kind {
                            used[idx] = true;
                            members.push(idx);
                            g += 1.0 / resistance;
                        }
                    }
                }
                let resistance = 1.0 / g;
                r_sum += resistance;
                bundles.push(Bundle { members, resistance });
            }
            EdgeKind::Led { vf } => {
                used[e] = true;
                has_led = true;
                r_sum += LED_PATH_RESISTANCE;
                vf_sum += vf;
                bundles.push(Bundle {
                    members: vec![e],
                    resistance: LED_PATH_RESISTANCE,
                });
            }
        }
    }

    if r_sum < MIN_PATH_RESISTANCE {
        // A path of pure wire has no meaningful current to report
        return 0.0;
    }

    // LEDs get their forward drop if the source can supply it; otherwise
    // the whole branch is non-conducting.
    let available = source_voltage - vf_sum;
    let current = if has_led && available < 0.0 {
        0.0
    } else {
        available / r_sum
    };

    for bundle in &bundles {
        for &e in &bundle.members {
            let edge = &edges[e];
            match edge.kind {
                EdgeKind::Resistive { resistance } => {
                    // Split the bundle current by conductance
                    let share = current * bundle.resistance / resistance;
                    merge(
                        readouts,
                        BranchReadout {
                            component: edge.component,
                            current: share,
                            voltage_drop: current * bundle.resistance,
                        },
                    );
                }
                EdgeKind::Led { vf } => {
                    let conducting = current > 0.0;
                    merge(
                        readouts,
                        BranchReadout {
                            component: edge.component,
                            current,
                            voltage_drop: if conducting { vf } else { 0.0 },
                        },
                    );
                }
            }
        }
    }

    current
}

/// Deduplicate per component, preferring the larger absolute current.
fn merge(readouts: &mut Vec<BranchReadout>, entry: BranchReadout) {
    match readouts
        .iter_mut()
        .find(|r| r.component == entry.component)
    {
        Some(existing) => {
            if entry.current.abs() > existing.current.abs() {
                *existing = entry;
            }
        }
        None => readouts.push(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Connector, NetMap, Terminal, Workspace};
    use crate::components::{Battery, Component, Led, Resistor, Switch};
    use approx::assert_relative_eq;

    fn netlist_of(ws: &Workspace) -> Netlist {
        let nets = NetMap::build(ws);
        crate::solver::netlist::translate(ws, &nets).unwrap()
    }

    fn readout(readouts: &[BranchReadout], c: crate::circuit::ComponentId) -> &BranchReadout {
        readouts.iter().find(|r| r.component == c).unwrap()
    }

    #[test]
    fn series_circuit_matches_ohms_law() {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(5.0)));
        let res = ws.add_component(Component::Resistor(Resistor::new(100.0)));
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(res, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(
            Connector::terminal(res, Terminal::Right),
            Connector::terminal(bat, Terminal::Left),
        )
        .unwrap();

        let readouts = solve_paths(&netlist_of(&ws));
        assert_relative_eq!(readout(&readouts, res).current, 0.05, epsilon = 1e-9);
        assert_relative_eq!(readout(&readouts, res).voltage_drop, 5.0, epsilon = 1e-9);
        assert_relative_eq!(readout(&readouts, bat).current, 0.05, epsilon = 1e-9);
    }

    #[test]
    fn parallel_resistors_combine_and_split() {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(5.0)));
        let r1 = ws.add_component(Component::Resistor(Resistor::new(100.0)));
        let r2 = ws.add_component(Component::Resistor(Resistor::new(100.0)));
        for r in [r1, r2] {
            ws.add_wire(
                Connector::terminal(bat, Terminal::Right),
                Connector::terminal(r, Terminal::Left),
            )
            .unwrap();
            ws.add_wire(
                Connector::terminal(r, Terminal::Right),
                Connector::terminal(bat, Terminal::Left),
            )
            .unwrap();
        }

        let readouts = solve_paths(&netlist_of(&ws));
        assert_relative_eq!(readout(&readouts, bat).current, 0.1, epsilon = 1e-9);
        assert_relative_eq!(readout(&readouts, r1).current, 0.05, epsilon = 1e-9);
        assert_relative_eq!(readout(&readouts, r2).current, 0.05, epsilon = 1e-9);
    }

    #[test]
    fn led_gets_forward_drop_when_voltage_allows() {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(5.0)));
        let res = ws.add_component(Component::Resistor(Resistor::new(220.0)));
        let led = ws.add_component(Component::Led(Led::new(2.0)));
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(res, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(
            Connector::terminal(res, Terminal::Right),
            Connector::terminal(led, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(
            Connector::terminal(led, Terminal::Right),
            Connector::terminal(bat, Terminal::Left),
        )
        .unwrap();
        ws.set_flipped(led, true).unwrap();

        let readouts = solve_paths(&netlist_of(&ws));
        let led_out = readout(&readouts, led);
        assert_relative_eq!(led_out.voltage_drop, 2.0, epsilon = 1e-9);
        assert_relative_eq!(led_out.current, 3.0 / 230.0, epsilon = 1e-9);
        assert!(led_out.current > 1e-6);
    }

    #[test]
    fn reversed_led_breaks_the_path() {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(5.0)));
        let led = ws.add_component(Component::Led(Led::new(2.0)));
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(led, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(
            Connector::terminal(led, Terminal::Right),
            Connector::terminal(bat, Terminal::Left),
        )
        .unwrap();
        // Unflipped: cathode faces the battery positive, so the only edge
        // cannot be traversed and no path exists

        let readouts = solve_paths(&netlist_of(&ws));
        assert!(readouts.is_empty());
    }

    #[test]
    fn insufficient_voltage_zeroes_the_led_branch() {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(1.5)));
        let res = ws.add_component(Component::Resistor(Resistor::new(220.0)));
        let led = ws.add_component(Component::Led(Led::new(2.0)));
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(res, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(
            Connector::terminal(res, Terminal::Right),
            Connector::terminal(led, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(
            Connector::terminal(led, Terminal::Right),
            Connector::terminal(bat, Terminal::Left),
        )
        .unwrap();
        ws.set_flipped(led, true).unwrap();

        let readouts = solve_paths(&netlist_of(&ws));
        let led_out = readout(&readouts, led);
        assert_eq!(led_out.current, 0.0);
        assert_eq!(led_out.voltage_drop, 0.0);
    }

    #[test]
    fn open_switch_chokes_the_loop() {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(5.0)));
        let sw = ws.add_component(Component::Switch(Switch::new(false)));
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(sw, Terminal::Left),
        )
        .unwrap();
        ws.add_wire(
            Connector::terminal(sw, Terminal::Right),
            Connector::terminal(bat, Terminal::Left),
        )
        .unwrap();

        let readouts = solve_paths(&netlist_of(&ws));
        // The open switch is a path, but its current is negligible
        assert!(readout(&readouts, sw).current < 1e-8);
    }
}
