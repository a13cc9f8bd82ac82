//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable parameters of one simulation run.
///
/// Built once (defaults plus overrides), validated, then shared read-only by
/// the engine, the strategies, and the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square toroidal grid.
    pub grid_size: u16,
    /// Number of agents placed at seeding.
    pub initial_agents: usize,
    /// Upper bound on simultaneously active food items.
    pub max_food: usize,
    /// Per-tick chance of spawning one food item while below the cap.
    pub food_spawn_probability: f64,
    /// Energy of every seeded agent.
    pub initial_energy: f64,
    /// Minimum energy required to reproduce.
    pub reproduction_threshold: f64,
    /// Minimum ticks between two reproductions of one agent.
    pub reproduction_cooldown: u64,
    /// Energy deducted from every living agent each tick.
    pub cost_of_living: f64,
    /// Energy deducted for each successful cell change.
    pub move_cost: f64,
    /// Energy granted by consuming one food item.
    pub food_reward: f64,
    /// Ticks a food item survives before it expires.
    pub food_lifespan: u32,
    /// Energy a helper hands to an adjacent low-energy agent.
    pub assist_cost: f64,
    /// Agents below this energy are candidates for assistance.
    pub low_energy_threshold: f64,
    /// Chebyshev radius strategies search within.
    pub vision_radius: u16,
    /// Seed for the run's random source.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 150,
            initial_agents: 1500,
            max_food: 100,
            food_spawn_probability: 0.35,
            initial_energy: 100.0,
            reproduction_threshold: 50.0,
            reproduction_cooldown: 40,
            cost_of_living: 0.4,
            move_cost: 0.7,
            food_reward: 25.0,
            food_lifespan: 100,
            assist_cost: 1.0,
            low_energy_threshold: 5.0,
            vision_radius: 5,
            seed: 42,
        }
    }
}

impl SimConfig {
    /// Copy of this configuration with a different seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Copy of this configuration with a different initial population.
    #[must_use]
    pub const fn with_agents(mut self, initial_agents: usize) -> Self {
        self.initial_agents = initial_agents;
        self
    }

    /// Number of cells on the grid.
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::from(self.grid_size) * usize::from(self.grid_size)
    }

    /// Check that this configuration can drive a simulation.
    ///
    /// An initial population larger than the grid is accepted; seeding
    /// places what fits.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }

        if !(0.0..=1.0).contains(&self.food_spawn_probability) {
            return Err(ConfigError::InvalidProbability {
                name: "food_spawn_probability",
                value: self.food_spawn_probability,
            });
        }

        let energies = [
            ("initial_energy", self.initial_energy),
            ("reproduction_threshold", self.reproduction_threshold),
            ("cost_of_living", self.cost_of_living),
            ("move_cost", self.move_cost),
            ("food_reward", self.food_reward),
            ("assist_cost", self.assist_cost),
            ("low_energy_threshold", self.low_energy_threshold),
        ];
        if let Some(&(name, value)) = energies.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidEnergy { name, value });
        }

        if self.vision_radius == 0 {
            return Err(ConfigError::ZeroVisionRadius);
        }

        Ok(())
    }
}
