//! Result annotation: write solved branch quantities back onto components.

use super::netlist::Netlist;
use super::newton::DcSolution;
use super::{BranchReadout, POWERED_THRESHOLD};
use crate::circuit::Workspace;
use crate::components::{Component, NOMINAL_LED_CURRENT};

/// Slack below Vf still counted as "at forward voltage". The exponential
/// model sits a few nVt under the configured Vf at sub-nominal currents.
const FORWARD_MARGIN: f64 = 0.2;

/// Derive per-component readouts from a converged DC solution.
pub fn readouts_from_solution(netlist: &Netlist, solution: &DcSolution) -> Vec<BranchReadout> {
    let mut readouts = Vec::with_capacity(
        netlist.resistors.len() + netlist.diodes.len() + netlist.sources.len(),
    );

    // Stamps with a null (unconnected) node carried no current; they get
    // no readout, leaving the component's cleared measurement in place.
    // Reading the null node as 0 V here would fabricate a drop: the
    // floating system is anchored symmetrically, not at 0 V.
    for r in &netlist.resistors {
        let [Some(n1), Some(n2)] = r.nets else {
            continue;
        };
        let vd = solution.voltage(Some(n1)) - solution.voltage(Some(n2));
        readouts.push(BranchReadout {
            component: r.component,
            current: vd / r.resistance,
            voltage_drop: vd,
        });
    }
    for d in &netlist.diodes {
        let (Some(a), Some(c)) = (d.net_anode, d.net_cathode) else {
            continue;
        };
        let vd = solution.voltage(Some(a)) - solution.voltage(Some(c));
        readouts.push(BranchReadout {
            component: d.component,
            current: d.model.current(vd),
            voltage_drop: vd,
        });
    }
    for (idx, s) in netlist.sources.iter().enumerate() {
        readouts.push(BranchReadout {
            component: s.component,
            current: solution.source_currents[idx],
            voltage_drop: s.voltage,
        });
    }

    readouts
}

/// Clear all measurements, then annotate each component named by a readout.
///
/// Readouts referencing components no longer in the workspace are ignored;
/// components with no readout keep cleared (dormant) measurements.
pub fn apply_readouts(workspace: &mut Workspace, readouts: &[BranchReadout]) {
    workspace.clear_measurements();

    for readout in readouts {
        let Some(instance) = workspace.component_mut(readout.component) else {
            continue;
        };
        instance.measurement.current = Some(readout.current);
        instance.measurement.voltage_drop = Some(readout.voltage_drop);

        if let Component::Led(led) = &instance.part {
            let lit = readout.current.abs() > POWERED_THRESHOLD
                && readout.voltage_drop >= led.forward_voltage - FORWARD_MARGIN;
            instance.measurement.powered = lit;
            instance.measurement.intensity = if lit {
                (readout.current.abs() / NOMINAL_LED_CURRENT).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ComponentId;
    use crate::components::{Battery, Led, Resistor};
    use approx::assert_relative_eq;

    #[test]
    fn annotates_currents_and_clears_stale_values() {
        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(5.0)));
        let res = ws.add_component(Component::Resistor(Resistor::new(100.0)));

        apply_readouts(
            &mut ws,
            &[BranchReadout {
                component: res,
                current: 0.05,
                voltage_drop: 5.0,
            }],
        );
        let res_m = &ws.component(res).unwrap().measurement;
        assert_relative_eq!(res_m.current.unwrap(), 0.05);
        assert_relative_eq!(res_m.voltage_drop.unwrap(), 5.0);
        // The battery got no readout this pass
        assert!(ws.component(bat).unwrap().measurement.current.is_none());

        // A later empty pass wipes the resistor too
        apply_readouts(&mut ws, &[]);
        assert!(ws.component(res).unwrap().measurement.current.is_none());
    }

    #[test]
    fn led_powered_state_follows_current_and_drop() {
        let mut ws = Workspace::new();
        let led = ws.add_component(Component::Led(Led::new(2.0)));

        apply_readouts(
            &mut ws,
            &[BranchReadout {
                component: led,
                current: 0.01,
                voltage_drop: 1.95,
            }],
        );
        let m = &ws.component(led).unwrap().measurement;
        assert!(m.powered);
        assert_relative_eq!(m.intensity, 0.5);

        // Microamp leakage does not light the LED
        apply_readouts(
            &mut ws,
            &[BranchReadout {
                component: led,
                current: 1e-9,
                voltage_drop: 1.95,
            }],
        );
        let m = &ws.component(led).unwrap().measurement;
        assert!(!m.powered);
        assert_eq!(m.intensity, 0.0);
    }

    #[test]
    fn intensity_saturates_at_nominal_current() {
        let mut ws = Workspace::new();
        let led = ws.add_component(Component::Led(Led::new(2.0)));
        apply_readouts(
            &mut ws,
            &[BranchReadout {
                component: led,
                current: 0.08,
                voltage_drop: 2.05,
            }],
        );
        assert_eq!(ws.component(led).unwrap().measurement.intensity, 1.0);
    }

    #[test]
    fn dangling_resistor_carries_no_current() {
        // Closed battery/resistor loop, plus a second resistor attached to
        // the positive net at one end only. The open branch must not be
        // annotated with the anchored node voltage read against 0 V.
        use crate::circuit::{Connector, NetMap, Terminal};
        use crate::solver::{translate, NewtonRaphson};

        let mut ws = Workspace::new();
        let bat = ws.add_component(Component::Battery(Battery::new(5.0)));
        let res = ws.add_component(Component::Resistor(Resistor::new(100.0)));
        let dangling = ws.add_component(Component::Resistor(Resistor::new(100.0)));
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
        ws.add_wire(
            Connector::terminal(bat, Terminal::Right),
            Connector::terminal(dangling, Terminal::Left),
        )
        .unwrap();

        let nets = NetMap::build(&ws);
        let netlist = translate(&ws, &nets).unwrap();
        let solution = NewtonRaphson::new().solve(&netlist).unwrap();
        let readouts = readouts_from_solution(&netlist, &solution);
        apply_readouts(&mut ws, &readouts);

        let open = &ws.component(dangling).unwrap().measurement;
        assert_eq!(open.current, None);
        assert_eq!(open.voltage_drop, None);

        // The closed loop is unaffected
        let loop_m = &ws.component(res).unwrap().measurement;
        assert_relative_eq!(loop_m.current.unwrap(), 0.05, epsilon = 1e-6);
    }

    #[test]
    fn stale_component_ids_are_ignored() {
        let mut ws = Workspace::new();
        apply_readouts(
            &mut ws,
            &[BranchReadout {
                component: ComponentId(42),
                current: 1.0,
                voltage_drop: 1.0,
            }],
        );
        assert!(ws.components.is_empty());
    }
}
