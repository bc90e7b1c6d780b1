//! WASM bindings for Voltlab Core.
//!
//! This module provides JavaScript-friendly bindings for driving the
//! evaluation engine from a browser-based schematic editor.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmWorkbench } from 'voltlab_core';
//!
//! await init();
//!
//! const bench = new WasmWorkbench(workspaceJson);
//! bench.start();
//! const result = JSON.parse(bench.evaluate());
//! // result.status === "success"
//! // result.measurements[0].powered === true
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::circuit::Workspace;
use crate::session::{Session, SessionConfig};
use crate::solver::EvalReport;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[derive(Serialize)]
struct MeasurementEntry {
    id: u32,
    kind: &'static str,
    current: Option<f64>,
    voltage_drop: Option<f64>,
    powered: bool,
    intensity: f64,
}

#[derive(Serialize)]
struct EvalResult {
    status: &'static str,
    iterations: usize,
    measurements: Vec<MeasurementEntry>,
}

/// WASM-compatible circuit workbench.
///
/// Wraps the native [`Session`] and exposes a JSON-in / JSON-out API for
/// the schematic editor frontend.
#[wasm_bindgen]
pub struct WasmWorkbench {
    session: Session,
}

#[wasm_bindgen]
impl WasmWorkbench {
    /// Create a workbench from a workspace snapshot (JSON).
    ///
    /// Pass an empty string for a fresh, empty workspace.
    #[wasm_bindgen(constructor)]
    pub fn new(workspace_json: &str) -> Result<WasmWorkbench, JsValue> {
        let workspace = if workspace_json.trim().is_empty() {
            Workspace::new()
        } else {
            serde_json::from_str(workspace_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(WasmWorkbench {
            session: Session::with_workspace(workspace, SessionConfig::default()),
        })
    }

    /// Replace the workspace from a snapshot (JSON).
    #[wasm_bindgen]
    pub fn load(&mut self, workspace_json: &str) -> Result<(), JsValue> {
        let workspace: Workspace =
            serde_json::from_str(workspace_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let running = self.session.is_running();
        self.session = Session::with_workspace(workspace, SessionConfig::default());
        if running {
            self.session.start();
        }
        Ok(())
    }

    /// Serialize the current workspace to JSON.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.workspace())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start periodic evaluation; returns the first result as JSON.
    #[wasm_bindgen]
    pub fn start(&mut self) -> String {
        let report = self.session.start();
        self.result_json(report)
    }

    /// Stop periodic evaluation.
    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.session.stop();
    }

    /// Periodic tick; evaluates only while running. Returns the result
    /// as JSON, or `undefined` when stopped.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Option<String> {
        let report = self.session.tick()?;
        Some(self.result_json(report))
    }

    /// Run one evaluation pass and return the result as JSON.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> String {
        let report = self.session.evaluate();
        self.result_json(report)
    }

    /// Open or close a switch.
    #[wasm_bindgen]
    pub fn set_switch(&mut self, component_id: u32, closed: bool) -> Result<(), JsValue> {
        self.session
            .set_switch(crate::circuit::ComponentId(component_id), closed)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Flip a component's polarity.
    #[wasm_bindgen]
    pub fn set_flipped(&mut self, component_id: u32, flipped: bool) -> Result<(), JsValue> {
        self.session
            .set_flipped(crate::circuit::ComponentId(component_id), flipped)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Milliseconds the host should schedule `tick` at.
    #[wasm_bindgen(getter)]
    pub fn tick_interval_ms(&self) -> u32 {
        self.session.config().tick_interval.as_millis() as u32
    }

    fn result_json(&self, report: EvalReport) -> String {
        let measurements = self
            .session
            .workspace()
            .components
            .iter()
            .map(|instance| MeasurementEntry {
                id: instance.id.0,
                kind: instance.part.label(),
                current: instance.measurement.current,
                voltage_drop: instance.measurement.voltage_drop,
                powered: instance.measurement.powered,
                intensity: instance.measurement.intensity,
            })
            .collect();
        let result = EvalResult {
            status: report.status.reason_code(),
            iterations: report.iterations,
            measurements,
        };
        serde_json::to_string(&result).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
