//! Output formatting utilities for CLI.

use forage::{RunResult, RunSummary};
use serde::Serialize;

/// JSON-serializable run summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunSummary {
    /// Random seed used.
    seed: u64,
    /// Last tick executed.
    final_tick: u64,
    /// Living agents at the end.
    final_population: usize,
    /// Tick of extinction (null if agents survived).
    extinct_at: Option<u64>,
    /// Wall time in milliseconds.
    elapsed_ms: u128,
    /// Living helpers at the end.
    helper_count: usize,
    /// Living selfish agents at the end.
    selfish_count: usize,
    /// Births over the run.
    total_births: u64,
    /// Deaths over the run.
    total_deaths: u64,
    /// Mean energy at the end.
    avg_energy: f64,
}

impl JsonRunSummary {
    /// Create from a RunResult.
    pub(super) fn from_result(result: &RunResult) -> Self {
        let summary = result.summary();
        Self {
            seed: summary.seed,
            final_tick: summary.final_tick,
            final_population: summary.final_population,
            extinct_at: summary.extinct_at,
            elapsed_ms: result.elapsed.as_millis(),
            helper_count: summary.helper_count,
            selfish_count: summary.selfish_count,
            total_births: summary.total_births,
            total_deaths: summary.total_deaths,
            avg_energy: summary.avg_energy,
        }
    }
}

/// Format a run result as human-readable text.
pub(super) fn format_run_text(result: &RunResult) -> String {
    let mut output = String::new();

    if let Some(tick) = result.extinct_at {
        output.push_str(&format!("All agents died at tick {tick}\n"));
    }
    output.push_str(&format!("Simulation ended at tick {}\n", result.final_tick));
    output.push_str(&format!("Final agent count: {}\n", result.final_population));
    if let Some(last) = result.last_metrics() {
        output.push_str(&format!(
            "  Helpers: {}  Selfish: {}  Births: {}  Deaths: {}\n",
            last.helper_count, last.selfish_count, last.total_births, last.total_deaths
        ));
    }
    output.push_str(&format!("Total execution time: {} ms\n", result.elapsed.as_millis()));

    output
}

/// Aggregate statistics over a batch of runs.
#[derive(Debug, Clone, Default)]
pub(super) struct BatchStats {
    /// Runs completed.
    pub(super) runs: u64,
    /// Runs that ended in extinction.
    pub(super) extinctions: u64,
    /// Surviving runs where helpers outnumber selfish agents.
    pub(super) helper_majority: u64,
    /// Surviving runs where selfish agents outnumber helpers.
    pub(super) selfish_majority: u64,
    /// Surviving runs with equal counts.
    pub(super) ties: u64,
    /// Sum of final populations.
    population_sum: f64,
    /// Sum of squared final populations for std dev calculation.
    population_sq_sum: f64,
    /// Sum of final helper shares over surviving runs.
    helper_share_sum: f64,
    /// Sum of final ticks.
    tick_sum: u64,
}

impl BatchStats {
    /// Aggregate a slice of run summaries.
    pub(super) fn from_summaries(summaries: &[RunSummary]) -> Self {
        let mut stats = Self::default();
        for summary in summaries {
            stats.add(summary);
        }
        stats
    }

    /// Add one run to the stats.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn add(&mut self, summary: &RunSummary) {
        self.runs += 1;
        self.tick_sum += summary.final_tick;

        let population = summary.final_population as f64;
        self.population_sum += population;
        self.population_sq_sum += population * population;

        if summary.extinct_at.is_some() || summary.final_population == 0 {
            self.extinctions += 1;
            return;
        }

        self.helper_share_sum += summary.helper_count as f64 / population;
        match summary.helper_count.cmp(&summary.selfish_count) {
            std::cmp::Ordering::Greater => self.helper_majority += 1,
            std::cmp::Ordering::Less => self.selfish_majority += 1,
            std::cmp::Ordering::Equal => self.ties += 1,
        }
    }

    /// Runs that still had agents at the end.
    pub(super) const fn survivors(&self) -> u64 {
        self.runs - self.extinctions
    }

    /// Fraction of runs that ended in extinction.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn extinction_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.extinctions as f64 / self.runs as f64
    }

    /// Mean helper share of the final population over surviving runs.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_helper_share(&self) -> f64 {
        let survivors = self.survivors();
        if survivors == 0 {
            return 0.0;
        }
        self.helper_share_sum / survivors as f64
    }

    /// Mean final population.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_population(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.population_sum / self.runs as f64
    }

    /// Standard deviation of the final population.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn population_std_dev(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        let n = self.runs as f64;
        let mean = self.avg_population();
        let variance = (self.population_sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Mean run length in ticks.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_ticks(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.tick_sum as f64 / self.runs as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Runs completed.
    runs: u64,
    /// Runs that ended in extinction.
    extinctions: u64,
    /// Extinction rate (0.0-1.0).
    extinction_rate: f64,
    /// Surviving runs won by helpers on headcount.
    helper_majority: u64,
    /// Surviving runs won by selfish agents on headcount.
    selfish_majority: u64,
    /// Surviving runs with equal headcount.
    ties: u64,
    /// Mean helper share of surviving populations.
    avg_helper_share: f64,
    /// Mean final population.
    avg_population: f64,
    /// Final population standard deviation.
    population_std_dev: f64,
    /// Mean run length in ticks.
    avg_ticks: f64,
    /// Per-run summaries in seed order.
    results: Vec<RunSummary>,
}

impl JsonBatchResult {
    /// Create from stats and the per-run summaries.
    pub(super) fn new(stats: &BatchStats, summaries: &[RunSummary]) -> Self {
        Self {
            runs: stats.runs,
            extinctions: stats.extinctions,
            extinction_rate: stats.extinction_rate(),
            helper_majority: stats.helper_majority,
            selfish_majority: stats.selfish_majority,
            ties: stats.ties,
            avg_helper_share: stats.avg_helper_share(),
            avg_population: stats.avg_population(),
            population_std_dev: stats.population_std_dev(),
            avg_ticks: stats.avg_ticks(),
            results: summaries.to_vec(),
        }
    }
}

/// Format batch statistics as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Batch Results ({} runs)\n", stats.runs));
    output.push_str("==========================================\n");
    output.push_str(&format!(
        "  Extinctions:      {:>6} ({:>5.1}%)\n",
        stats.extinctions,
        stats.extinction_rate() * 100.0
    ));
    output.push_str(&format!("  Helper majority:  {:>6}\n", stats.helper_majority));
    output.push_str(&format!("  Selfish majority: {:>6}\n", stats.selfish_majority));
    output.push_str(&format!("  Ties:             {:>6}\n", stats.ties));
    output.push_str(&format!(
        "  Helper share:     {:>5.1}% of surviving populations\n",
        stats.avg_helper_share() * 100.0
    ));
    output.push_str(&format!(
        "  Final population: {:.1} ± {:.1}\n",
        stats.avg_population(),
        stats.population_std_dev()
    ));
    output.push_str(&format!("  Average length:   {:.1} ticks\n", stats.avg_ticks()));

    output
}

/// Format per-run summaries as CSV.
pub(super) fn format_batch_csv(summaries: &[RunSummary]) -> String {
    let mut output = String::new();

    // Header
    output.push_str(
        "seed,final_tick,final_population,extinct_at,helper_count,selfish_count,total_births,total_deaths,avg_energy\n",
    );

    // Data rows
    for s in summaries {
        let extinct_at = s.extinct_at.map(|t| t.to_string()).unwrap_or_default();
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{:.2}\n",
            s.seed,
            s.final_tick,
            s.final_population,
            extinct_at,
            s.helper_count,
            s.selfish_count,
            s.total_births,
            s.total_deaths,
            s.avg_energy
        ));
    }

    output
}
