//! Run command implementation.

use std::path::Path;

use forage::export::{METRICS_FILE, SNAPSHOTS_FILE, export_metrics, export_snapshots};
use forage::{RunOptions, RunResult, SimConfig, run_simulation};
use tracing::{error, info};

use super::output::{JsonRunSummary, format_run_text};
use super::{CliError, OutputFormat};

/// Execute the run command.
///
/// Export failures are logged and do not fail the command.
///
/// # Errors
///
/// Returns an error if the overrides produce an invalid configuration.
pub(crate) fn execute(
    ticks: u64,
    agents: Option<usize>,
    seed: Option<u64>,
    out_dir: &Path,
    format: OutputFormat,
    no_export: bool,
) -> Result<(), CliError> {
    let mut config = SimConfig::default();
    if let Some(a) = agents {
        config.initial_agents = a;
    }
    if let Some(s) = seed {
        config.seed = s;
    }

    let options = RunOptions {
        max_ticks: ticks,
        record_snapshots: !no_export,
    };
    let result = run_simulation(config, options)?;

    match format {
        OutputFormat::Text => print!("{}", format_run_text(&result)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonRunSummary::from_result(&result))?;
            println!("{json}");
        }
    }

    if !no_export {
        export_history(&result, out_dir);
    }

    Ok(())
}

/// Write both CSV files into `out_dir`, logging instead of failing.
fn export_history(result: &RunResult, out_dir: &Path) {
    let metrics_path = out_dir.join(METRICS_FILE);
    match export_metrics(&metrics_path, &result.metrics) {
        Ok(()) => info!(path = %metrics_path.display(), "metrics exported"),
        Err(e) => error!(error = %e, "failed to export metrics"),
    }

    let snapshots_path = out_dir.join(SNAPSHOTS_FILE);
    match export_snapshots(&snapshots_path, &result.snapshots) {
        Ok(()) => info!(path = %snapshots_path.display(), "grid snapshots exported"),
        Err(e) => error!(error = %e, "failed to export grid snapshots"),
    }
}
