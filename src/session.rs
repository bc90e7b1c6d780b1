//! Workbench session: owns a workspace and drives evaluation.
//!
//! A session pairs the mutable workspace with the engine configuration
//! and the running flag. Structural edits made through the session
//! re-evaluate immediately while the session is running; a paused
//! session accumulates edits and evaluates on the next `start` or
//! explicit `evaluate` call.

use std::time::Duration;

use crate::circuit::{ComponentId, Connector, JunctionId, WireId, Workspace};
use crate::components::Component;
use crate::error::Result;
use crate::solver::{evaluate, EngineConfig, EvalReport, EvalStatus};

/// Nominal interval between periodic ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(650);

/// Session-level configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    /// Interval the host should schedule `tick` at.
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// An interactive workbench session.
#[derive(Debug)]
pub struct Session {
    workspace: Workspace,
    config: SessionConfig,
    running: bool,
    last_report: EvalReport,
}

impl Session {
    /// Create a stopped session over an empty workspace.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_workspace(Workspace::new(), config)
    }

    /// Create a stopped session over an existing workspace.
    pub fn with_workspace(workspace: Workspace, config: SessionConfig) -> Self {
        Self {
            workspace,
            config,
            running: false,
            last_report: EvalReport {
                status: EvalStatus::NoNets,
                iterations: 0,
            },
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Report from the most recent evaluation.
    pub fn last_report(&self) -> EvalReport {
        self.last_report
    }

    /// Start periodic evaluation and run one pass immediately.
    pub fn start(&mut self) -> EvalReport {
        self.running = true;
        self.evaluate()
    }

    /// Stop periodic evaluation. Measurements keep their last values.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Periodic entry point; evaluates only while running.
    pub fn tick(&mut self) -> Option<EvalReport> {
        self.running.then(|| self.evaluate())
    }

    /// Run one evaluation pass unconditionally.
    pub fn evaluate(&mut self) -> EvalReport {
        let report = evaluate(&mut self.workspace, &self.config.engine);
        self.last_report = report;
        report
    }

    /// Place a component; re-evaluates while running.
    pub fn add_component(&mut self, part: Component) -> ComponentId {
        let id = self.workspace.add_component(part);
        self.refresh();
        id
    }

    /// Place a wiring junction; re-evaluates while running.
    pub fn add_junction(&mut self) -> JunctionId {
        let id = self.workspace.add_junction();
        self.refresh();
        id
    }

    /// Connect two connectors; re-evaluates while running.
    pub fn add_wire(&mut self, a: Connector, b: Connector) -> Result<WireId> {
        let id = self.workspace.add_wire(a, b)?;
        self.refresh();
        Ok(id)
    }

    /// Delete a wire; re-evaluates while running.
    pub fn remove_wire(&mut self, id: WireId) {
        self.workspace.remove_wire(id);
        self.refresh();
    }

    /// Delete a component and its attached wires; re-evaluates while
    /// running.
    pub fn remove_component(&mut self, id: ComponentId) {
        self.workspace.remove_component(id);
        self.refresh();
    }

    /// Open or close a switch; re-evaluates while running.
    pub fn set_switch(&mut self, id: ComponentId, closed: bool) -> Result<()> {
        self.workspace.set_switch(id, closed)?;
        self.refresh();
        Ok(())
    }

    /// Flip a component's polarity; re-evaluates while running.
    pub fn set_flipped(&mut self, id: ComponentId, flipped: bool) -> Result<()> {
        self.workspace.set_flipped(id, flipped)?;
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        if self.running {
            self.evaluate();
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Terminal;
    use crate::components::{Battery, Led, Resistor, Switch};

    fn build_led_loop(session: &mut Session) -> (ComponentId, ComponentId) {
        let bat = session.add_component(Component::Battery(Battery::new(5.0)));
        let res = session.add_component(Component::Resistor(Resistor::new(220.0)));
        let led = session.add_component(Component::Led(Led::new(2.0)));
        session
            .add_wire(
                Connector::terminal(bat, Terminal::Right),
                Connector::terminal(res, Terminal::Left),
            )
            .unwrap();
        session
            .add_wire(
                Connector::terminal(res, Terminal::Right),
                Connector::terminal(led, Terminal::Left),
            )
            .unwrap();
        session
            .add_wire(
                Connector::terminal(led, Terminal::Right),
                Connector::terminal(bat, Terminal::Left),
            )
            .unwrap();
        session.set_flipped(led, true).unwrap();
        (bat, led)
    }

    #[test]
    fn edits_reevaluate_only_while_running() {
        let mut session = Session::default();
        let (_, led) = build_led_loop(&mut session);
        // Stopped: nothing annotated yet
        assert!(!session.workspace().component(led).unwrap().measurement.powered);

        let report = session.start();
        assert_eq!(report.status, EvalStatus::Success);
        assert!(session.workspace().component(led).unwrap().measurement.powered);
    }

    #[test]
    fn toggling_a_switch_updates_the_led() {
        let mut session = Session::default();
        session.start();
        let bat = session.add_component(Component::Battery(Battery::new(5.0)));
        let sw = session.add_component(Component::Switch(Switch::new(false)));
        let led = session.add_component(Component::Led(Led::new(2.0)));
        session
            .add_wire(
                Connector::terminal(bat, Terminal::Right),
                Connector::terminal(sw, Terminal::Left),
            )
            .unwrap();
        session
            .add_wire(
                Connector::terminal(sw, Terminal::Right),
                Connector::terminal(led, Terminal::Left),
            )
            .unwrap();
        session
            .add_wire(
                Connector::terminal(led, Terminal::Right),
                Connector::terminal(bat, Terminal::Left),
            )
            .unwrap();
        session.set_flipped(led, true).unwrap();

        assert!(!session.workspace().component(led).unwrap().measurement.powered);
        session.set_switch(sw, true).unwrap();
        assert!(session.workspace().component(led).unwrap().measurement.powered);
        session.set_switch(sw, false).unwrap();
        assert!(!session.workspace().component(led).unwrap().measurement.powered);
    }

    #[test]
    fn tick_is_inert_when_stopped() {
        let mut session = Session::default();
        build_led_loop(&mut session);
        assert!(session.tick().is_none());
        session.start();
        assert!(session.tick().is_some());
        session.stop();
        assert!(session.tick().is_none());
    }

    #[test]
    fn removing_the_source_reports_no_nets_semantics() {
        let mut session = Session::default();
        let (bat, led) = build_led_loop(&mut session);
        session.start();
        assert!(session.workspace().component(led).unwrap().measurement.powered);

        session.remove_component(bat);
        // The loop is broken; the LED must go dark immediately
        assert!(!session.workspace().component(led).unwrap().measurement.powered);
    }
}
