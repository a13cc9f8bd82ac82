//! Per-tick population metrics.

use serde::{Deserialize, Serialize};

use crate::world::{Agent, Strategy};

/// Cumulative birth counts per strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthCounts {
    /// Children born to helpers.
    pub helper: u64,
    /// Children born to selfish agents.
    pub selfish: u64,
}

impl BirthCounts {
    /// Count one birth for `strategy`.
    pub fn record(&mut self, strategy: Strategy) {
        match strategy {
            Strategy::Helper => self.helper += 1,
            Strategy::Selfish => self.selfish += 1,
        }
    }

    /// Births across both strategies.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.helper + self.selfish
    }
}

/// Immutable summary of the population after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickMetrics {
    /// Tick this record describes.
    pub tick: u64,
    /// Mean energy over living agents, 0 when none remain.
    pub avg_energy: f64,
    /// Deaths since the start of the run.
    pub total_deaths: u64,
    /// Living helpers.
    pub helper_count: usize,
    /// Living selfish agents.
    pub selfish_count: usize,
    /// Helper births since the start of the run.
    pub helper_births: u64,
    /// Selfish births since the start of the run.
    pub selfish_births: u64,
    /// Sum of both birth counters.
    pub total_births: u64,
    /// Active food items.
    pub food_count: usize,
    /// Energy of every living agent, in population order.
    pub energy_snapshot: Vec<f64>,
}

impl TickMetrics {
    /// Reduce the post-tick population into one record.
    ///
    /// `agents` is the living population in population order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn record(
        tick: u64,
        agents: &[Agent],
        total_deaths: u64,
        births: BirthCounts,
        food_count: usize,
    ) -> Self {
        let energy_snapshot: Vec<f64> = agents.iter().map(|a| a.energy).collect();
        let avg_energy = if energy_snapshot.is_empty() {
            0.0
        } else {
            energy_snapshot.iter().sum::<f64>() / energy_snapshot.len() as f64
        };
        let helper_count = agents
            .iter()
            .filter(|a| a.strategy == Strategy::Helper)
            .count();

        Self {
            tick,
            avg_energy,
            total_deaths,
            helper_count,
            selfish_count: agents.len() - helper_count,
            helper_births: births.helper,
            selfish_births: births.selfish,
            total_births: births.total(),
            food_count,
            energy_snapshot,
        }
    }

    /// Living agents across both strategies.
    #[must_use]
    pub const fn population(&self) -> usize {
        self.helper_count + self.selfish_count
    }
}
