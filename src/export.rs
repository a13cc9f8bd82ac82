//! CSV export of simulation history.
//!
//! Two files per run: one metrics row per tick, and one row per occupied
//! cell per tick.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::sim::{GridSnapshot, TickMetrics};
use crate::world::EntityKind;

/// Default file name for the metrics history.
pub const METRICS_FILE: &str = "simulation_metrics.csv";

/// Default file name for the snapshot history.
pub const SNAPSHOTS_FILE: &str = "simulation_grid_snapshots.csv";

/// Header row of the metrics CSV.
pub const METRICS_HEADER: &str = "tick,avg_energy,total_births,total_deaths,helper_count,selfish_count,helper_births,selfish_births,energy_snapshot";

/// Header row of the snapshot CSV.
pub const SNAPSHOTS_HEADER: &str = "tick,x,y,energy,strategy,type";

/// Write the metrics history as CSV.
///
/// The energy list is one quoted field with two decimals per agent.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_metrics_csv<W: Write>(out: &mut W, metrics: &[TickMetrics]) -> Result<(), ExportError> {
    writeln!(out, "{METRICS_HEADER}")?;
    for m in metrics {
        let energies: Vec<String> = m.energy_snapshot.iter().map(|e| format!("{e:.2}")).collect();
        writeln!(
            out,
            "{},{:.2},{},{},{},{},{},{},\"{}\"",
            m.tick,
            m.avg_energy,
            m.total_births,
            m.total_deaths,
            m.helper_count,
            m.selfish_count,
            m.helper_births,
            m.selfish_births,
            energies.join(",")
        )?;
    }
    Ok(())
}

/// Write the snapshot history as CSV.
///
/// Food rows leave the energy and strategy columns empty.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_snapshots_csv<W: Write>(out: &mut W, snapshots: &[GridSnapshot]) -> Result<(), ExportError> {
    writeln!(out, "{SNAPSHOTS_HEADER}")?;
    for snapshot in snapshots {
        for cell in &snapshot.cells {
            let (x, y) = (cell.position.x, cell.position.y);
            match (cell.kind, cell.energy, cell.strategy) {
                (EntityKind::Agent, Some(energy), Some(strategy)) => writeln!(
                    out,
                    "{},{x},{y},{energy:.2},{strategy},{}",
                    snapshot.tick,
                    cell.kind.label()
                )?,
                _ => writeln!(out, "{},{x},{y},,,{}", snapshot.tick, cell.kind.label())?,
            }
        }
    }
    Ok(())
}

/// Write the metrics history to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_metrics(path: &Path, metrics: &[TickMetrics]) -> Result<(), ExportError> {
    let mut out = create(path)?;
    write_metrics_csv(&mut out, metrics)?;
    out.flush()?;
    Ok(())
}

/// Write the snapshot history to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_snapshots(path: &Path, snapshots: &[GridSnapshot]) -> Result<(), ExportError> {
    let mut out = create(path)?;
    write_snapshots_csv(&mut out, snapshots)?;
    out.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CellSnapshot;
    use crate::world::{Position, Strategy};

    fn metrics(tick: u64, energies: Vec<f64>) -> TickMetrics {
        TickMetrics {
            tick,
            avg_energy: 12.3456,
            total_deaths: 2,
            helper_count: 1,
            selfish_count: 1,
            helper_births: 3,
            selfish_births: 4,
            total_births: 7,
            food_count: 0,
            energy_snapshot: energies,
        }
    }

    #[test]
    fn test_metrics_csv_format() {
        let mut out = Vec::new();
        write_metrics_csv(&mut out, &[metrics(1, vec![10.0, 14.69])]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], METRICS_HEADER);
        assert_eq!(lines[1], "1,12.35,7,2,1,1,3,4,\"10.00,14.69\"");
    }

    #[test]
    fn test_metrics_csv_empty_population() {
        let mut out = Vec::new();
        write_metrics_csv(&mut out, &[metrics(5, Vec::new())]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",\"\""));
    }

    #[test]
    fn test_snapshot_csv_format() {
        let snapshot = GridSnapshot {
            tick: 3,
            cells: vec![
                CellSnapshot {
                    position: Position::new(4, 0),
                    kind: EntityKind::Agent,
                    strategy: Some(Strategy::Selfish),
                    energy: Some(7.5),
                },
                CellSnapshot {
                    position: Position::new(1, 2),
                    kind: EntityKind::Food,
                    strategy: None,
                    energy: None,
                },
            ],
        };
        let mut out = Vec::new();
        write_snapshots_csv(&mut out, &[snapshot]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![SNAPSHOTS_HEADER, "3,4,0,7.50,SELFISH,AGENT", "3,1,2,,,FOOD"]);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(METRICS_FILE);
        let err = export_metrics(&path, &[]).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
    }
}
