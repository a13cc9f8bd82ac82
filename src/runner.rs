//! Simulation runner for Forage.
//!
//! Provides a pure function interface: `(config, max_ticks) -> RunResult`
//!
//! The runner handles:
//! - Stepping a simulation to a tick limit or extinction
//! - Collecting the metrics and snapshot history
//! - Parallel multi-seed batches with rayon

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::sim::{GridSnapshot, Simulation, TickMetrics};

/// Default tick limit for a run.
pub const DEFAULT_MAX_TICKS: u64 = 1000;

/// How far to drive a run and what to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after this many ticks.
    pub max_ticks: u64,
    /// Keep a grid snapshot for every tick.
    pub record_snapshots: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
            record_snapshots: true,
        }
    }
}

impl RunOptions {
    /// Options that stop after `max_ticks` and keep every snapshot.
    #[must_use]
    pub const fn ticks(max_ticks: u64) -> Self {
        Self {
            max_ticks,
            record_snapshots: true,
        }
    }
}

/// Final result of a run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Configuration the run used.
    pub config: SimConfig,
    /// Last tick executed.
    pub final_tick: u64,
    /// Living agents when the run stopped.
    pub final_population: usize,
    /// Tick at which the last agent died, if it did.
    pub extinct_at: Option<u64>,
    /// Wall time spent stepping.
    pub elapsed: Duration,
    /// One record per tick.
    pub metrics: Vec<TickMetrics>,
    /// One snapshot per tick, empty unless recorded.
    pub snapshots: Vec<GridSnapshot>,
}

impl RunResult {
    /// Metrics of the last tick, if any tick ran.
    #[must_use]
    pub fn last_metrics(&self) -> Option<&TickMetrics> {
        self.metrics.last()
    }

    /// Condensed form for batch statistics.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let last = self.last_metrics();
        RunSummary {
            seed: self.config.seed,
            final_tick: self.final_tick,
            final_population: self.final_population,
            extinct_at: self.extinct_at,
            helper_count: last.map_or(0, |m| m.helper_count),
            selfish_count: last.map_or(0, |m| m.selfish_count),
            total_births: last.map_or(0, |m| m.total_births),
            total_deaths: last.map_or(0, |m| m.total_deaths),
            avg_energy: last.map_or(0.0, |m| m.avg_energy),
        }
    }
}

/// Outcome of one run, without history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Seed the run used.
    pub seed: u64,
    /// Last tick executed.
    pub final_tick: u64,
    /// Living agents when the run stopped.
    pub final_population: usize,
    /// Tick at which the last agent died, if it did.
    pub extinct_at: Option<u64>,
    /// Living helpers at the end.
    pub helper_count: usize,
    /// Living selfish agents at the end.
    pub selfish_count: usize,
    /// Births over the run.
    pub total_births: u64,
    /// Deaths over the run.
    pub total_deaths: u64,
    /// Mean agent energy at the end.
    pub avg_energy: f64,
}

/// Run one simulation to the tick limit or extinction.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run_simulation(config: SimConfig, options: RunOptions) -> Result<RunResult, ConfigError> {
    let sim = Simulation::new(config)?;
    Ok(drive(sim, options))
}

/// Step an existing simulation to the tick limit or extinction.
#[must_use]
pub fn drive(mut sim: Simulation, options: RunOptions) -> RunResult {
    let capacity = usize::try_from(options.max_ticks).unwrap_or(usize::MAX).min(4096);
    let mut metrics = Vec::with_capacity(capacity);
    let mut snapshots = Vec::with_capacity(if options.record_snapshots { capacity } else { 0 });
    let mut extinct_at = None;

    let start = Instant::now();
    while sim.tick() < options.max_ticks {
        let report = sim.step();
        metrics.push(report.metrics);
        if options.record_snapshots {
            snapshots.push(report.snapshot);
        }

        if sim.is_extinct() {
            info!(tick = sim.tick(), "all agents died");
            extinct_at = Some(sim.tick());
            break;
        }
    }
    let elapsed = start.elapsed();

    info!(
        tick = sim.tick(),
        population = sim.population(),
        elapsed_ms = elapsed.as_millis(),
        "simulation ended"
    );

    RunResult {
        config: *sim.config(),
        final_tick: sim.tick(),
        final_population: sim.population(),
        extinct_at,
        elapsed,
        metrics,
        snapshots,
    }
}

/// Run one simulation per seed in parallel.
///
/// `on_done` is called from worker threads as each run finishes. Results
/// come back in seed order.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run_batch(
    config: SimConfig,
    seeds: &[u64],
    max_ticks: u64,
    on_done: impl Fn(&RunSummary) + Sync,
) -> Result<Vec<RunSummary>, ConfigError> {
    config.validate()?;
    let options = RunOptions {
        max_ticks,
        record_snapshots: false,
    };

    seeds
        .par_iter()
        .map(|&seed| -> Result<RunSummary, ConfigError> {
            let result = run_simulation(config.with_seed(seed), options)?;
            let summary = result.summary();
            on_done(&summary);
            Ok(summary)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            grid_size: 20,
            initial_agents: 40,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_run_stops_at_tick_limit() {
        let result = run_simulation(small_config(), RunOptions::ticks(10)).unwrap();
        assert_eq!(result.final_tick, 10);
        assert_eq!(result.metrics.len(), 10);
        assert_eq!(result.snapshots.len(), 10);
        assert!(result.extinct_at.is_none());
        assert_eq!(result.metrics[0].tick, 1);
    }

    #[test]
    fn test_run_stops_on_extinction() {
        let config = SimConfig {
            initial_energy: 0.3,
            food_spawn_probability: 0.0,
            max_food: 0,
            ..small_config()
        };
        let result = run_simulation(config, RunOptions::ticks(100)).unwrap();
        assert_eq!(result.extinct_at, Some(1));
        assert_eq!(result.final_tick, 1);
        assert_eq!(result.final_population, 0);
    }

    #[test]
    fn test_snapshots_optional() {
        let options = RunOptions {
            max_ticks: 5,
            record_snapshots: false,
        };
        let result = run_simulation(small_config(), options).unwrap();
        assert!(result.snapshots.is_empty());
        assert_eq!(result.metrics.len(), 5);
    }

    #[test]
    fn test_summary_reflects_last_tick() {
        let result = run_simulation(small_config(), RunOptions::ticks(3)).unwrap();
        let summary = result.summary();
        let last = result.last_metrics().unwrap();
        assert_eq!(summary.seed, 42);
        assert_eq!(summary.final_population, last.population());
        assert_eq!(summary.total_deaths, last.total_deaths);
    }
}
