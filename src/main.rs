//! Voltlab - Circuit Workbench Evaluator
//!
//! Loads a workspace snapshot (JSON), runs one evaluation pass, and
//! prints the resulting per-component measurements.
//!
//! # Usage
//!
//! ```bash
//! voltlab workspace.json
//! voltlab --fallback-only workspace.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use voltlab_core::{
    circuit::Workspace,
    components::Component,
    error::{Result, WorkbenchError},
    evaluate, EngineConfig,
};

/// Circuit workbench evaluator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the workspace snapshot file (.json)
    #[arg(value_name = "WORKSPACE_FILE")]
    workspace_file: PathBuf,

    /// Skip MNA and use only the path-tracing heuristic
    #[arg(long)]
    fallback_only: bool,

    /// Maximum Newton-Raphson iterations
    #[arg(long, default_value_t = voltlab_core::solver::MAX_ITERATIONS)]
    max_iterations: usize,

    /// Newton-Raphson convergence tolerance in volts
    #[arg(long, default_value_t = voltlab_core::solver::CONVERGENCE_TOLERANCE)]
    tolerance: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let json = std::fs::read_to_string(&args.workspace_file).map_err(|source| {
        WorkbenchError::FileReadError {
            path: args.workspace_file.display().to_string(),
            source,
        }
    })?;
    let mut workspace: Workspace = serde_json::from_str(&json)?;

    let config = EngineConfig {
        use_mna: !args.fallback_only,
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
    };
    let report = evaluate(&mut workspace, &config);

    println!(
        "status: {} ({} iterations)",
        report.status.reason_code(),
        report.iterations
    );
    println!("{:<6} {:<22} {:>12} {:>12} {:>8}", "id", "component", "current", "drop", "state");
    for instance in &workspace.components {
        let m = &instance.measurement;
        let state = match &instance.part {
            Component::Led(_) => {
                if m.powered {
                    format!("lit {:.0}%", m.intensity * 100.0)
                } else {
                    "dark".to_string()
                }
            }
            _ => String::new(),
        };
        println!(
            "{:<6} {:<22} {:>12} {:>12} {:>8}",
            instance.id.to_string(),
            instance.part.summary(),
            m.current
                .map_or_else(|| "-".to_string(), |i| format!("{:.4e} A", i)),
            m.voltage_drop
                .map_or_else(|| "-".to_string(), |v| format!("{:.3} V", v)),
            state,
        );
    }

    Ok(())
}
