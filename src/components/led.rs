//! LED model.
//!
//! Uses the Shockley diode equation:
//!   I = Is * (exp(V / nVt) - 1)
//!
//! For Newton-Raphson iteration, we linearize around the current operating
//! point:
//!   I ≈ I0 + G_d * (V - V0)
//!
//! where G_d = dI/dV = Is/nVt * exp(V0/nVt)
//!
//! The saturation current is derived from the configured forward voltage so
//! that the diode drops approximately Vf at the nominal LED operating
//! current, across the whole milliamp range. The exponential is evaluated
//! in the equivalent shifted form Inom * exp((V - Vf)/nVt) with the
//! exponent argument clamped to ±40; a clamp on the raw V/nVt would sit
//! below the operating exponent of high-Vf (blue/white) LEDs.

use serde::{Deserialize, Serialize};

use crate::THERMAL_VOLTAGE;

/// Emission coefficient (ideality factor) used for all LEDs.
const IDEALITY: f64 = 2.0;

/// Nominal operating current at which the diode drops exactly Vf.
/// Also the current at which visual intensity saturates.
pub const NOMINAL_LED_CURRENT: f64 = 0.02;

/// Clamp for the shifted exponent argument (V - Vf)/nVt.
const EXP_ARG_MAX: f64 = 40.0;

/// Ceiling for the linearized conductance, preventing ill-conditioning.
const MAX_CONDUCTANCE: f64 = 1e12;

/// Floor for the linearized conductance, preventing a singular stamp.
const MIN_CONDUCTANCE: f64 = 1e-12;

/// An LED component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Led {
    /// Forward voltage in volts (red ~1.8, green ~2.2, blue ~3.3).
    pub forward_voltage: f64,
}

impl Led {
    /// Default forward voltage for newly placed LEDs.
    pub const DEFAULT_FORWARD_VOLTAGE: f64 = 2.0;

    /// Create a new LED.
    pub fn new(forward_voltage: f64) -> Self {
        Self {
            forward_voltage: forward_voltage.max(0.1),
        }
    }

    /// Build the exponential diode model for this LED.
    pub fn model(&self) -> DiodeModel {
        DiodeModel::for_forward_voltage(self.forward_voltage)
    }
}

impl Default for Led {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FORWARD_VOLTAGE)
    }
}

/// Shockley diode parameters plus the linearization helpers used by the
/// Newton-Raphson loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiodeModel {
    /// Saturation current (Is) in amperes.
    pub is: f64,
    /// Emission coefficient times thermal voltage (nVt) in volts.
    pub n_vt: f64,
    /// Forward voltage threshold in volts.
    pub vf: f64,
}

impl DiodeModel {
    /// Derive parameters from a forward voltage: Is is chosen so that the
    /// diode carries the nominal LED current at exactly Vf.
    pub fn for_forward_voltage(vf: f64) -> Self {
        let n_vt = IDEALITY * THERMAL_VOLTAGE;
        let is = NOMINAL_LED_CURRENT * (-vf / n_vt).exp();
        Self { is, n_vt, vf }
    }

    /// exp((V - Vf)/nVt) with the argument clamped to avoid overflow.
    fn exp_term(&self, v: f64) -> f64 {
        ((v - self.vf) / self.n_vt)
            .clamp(-EXP_ARG_MAX, EXP_ARG_MAX)
            .exp()
    }

    /// Diode current at a given voltage: Is * (exp(V/nVt) - 1), evaluated
    /// in shifted form.
    pub fn current(&self, v: f64) -> f64 {
        NOMINAL_LED_CURRENT * self.exp_term(v) - self.is
    }

    /// Conductance dI/dV at a given voltage.
    pub fn conductance(&self, v: f64) -> f64 {
        let g = NOMINAL_LED_CURRENT / self.n_vt * self.exp_term(v);
        g.clamp(MIN_CONDUCTANCE, MAX_CONDUCTANCE)
    }

    /// Linearized companion model at the operating point `v_op`.
    ///
    /// Returns (conductance G, equivalent current source I_eq) such that
    /// I = G * V + I_eq.
    pub fn linearize(&self, v_op: f64) -> (f64, f64) {
        let g = self.conductance(v_op);
        let i = self.current(v_op);
        (g, i - g * v_op)
    }

    /// Limit the voltage step between Newton-Raphson iterations.
    pub fn limit_step(&self, v_old: f64, v_new: f64) -> f64 {
        let max_step = self.vf.max(0.5);
        if (v_new - v_old).abs() > max_step {
            if v_new > v_old {
                v_old + max_step
            } else {
                v_old - max_step
            }
        } else {
            v_new
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn drops_forward_voltage_at_nominal_current() {
        let m = Led::new(2.0).model();
        assert_relative_eq!(m.current(2.0), NOMINAL_LED_CURRENT, max_relative = 1e-9);
        // One decade of current moves the drop by only ~0.12 V
        let v_decade = m.n_vt * 10f64.ln();
        assert_relative_eq!(
            m.current(2.0 - v_decade),
            NOMINAL_LED_CURRENT / 10.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn high_vf_leds_conduct_too() {
        // Blue LED: the operating exponent Vf/nVt is ~64, well past a
        // naive ±40 clamp on the raw argument
        let m = Led::new(3.3).model();
        assert_relative_eq!(m.current(3.3), NOMINAL_LED_CURRENT, max_relative = 1e-9);
        assert!(m.conductance(3.3) > 0.1);
    }

    #[test]
    fn reverse_bias_current_is_negligible() {
        let m = Led::new(2.0).model();
        let i = m.current(-5.0);
        assert!(i <= 0.0);
        assert!(i.abs() < 1e-12);
    }

    #[test]
    fn overflow_is_clamped() {
        let m = Led::new(2.0).model();
        assert!(m.current(1000.0).is_finite());
        assert!(m.conductance(1000.0).is_finite());
        assert!(m.conductance(1000.0) <= MAX_CONDUCTANCE);
    }

    #[test]
    fn step_limiting_caps_large_jumps() {
        let m = Led::new(2.0).model();
        assert_relative_eq!(m.limit_step(0.0, 9.0), 2.0);
        assert_relative_eq!(m.limit_step(1.9, 1.95), 1.95);
        assert_relative_eq!(m.limit_step(0.0, -9.0), -2.0);
    }
}
