//! The tick loop.
//!
//! Each tick runs five phases in fixed order:
//! 1. Food aging and expiry
//! 2. Agent actions (strategy, reproduction, cost of living) in shuffled order
//! 3. Death sweep
//! 4. Food spawn
//! 5. Snapshot and metrics

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use tracing::{debug, info, warn};

use super::metrics::{BirthCounts, TickMetrics};
use super::snapshot::GridSnapshot;
use super::strategy::{self, Action};
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::world::{Agent, EntityId, Food, IdSequence, SpatialGrid, Strategy, assert_invariants};

/// Random source owned by a simulation.
pub type SimRng = ChaCha12Rng;

/// Everything produced by one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Population summary after the tick.
    pub metrics: TickMetrics,
    /// Occupied cells after the tick.
    pub snapshot: GridSnapshot,
}

/// A running simulation.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    grid: SpatialGrid,
    /// Living agents in population order.
    agents: Vec<EntityId>,
    /// Placed food items.
    food: Vec<EntityId>,
    tick: u64,
    ids: IdSequence,
    rng: SimRng,
    total_deaths: u64,
    births: BirthCounts,
}

impl Simulation {
    /// Seed a new simulation from `config`.
    ///
    /// Places up to `initial_agents` agents with a fair coin choosing each
    /// strategy, then one food item. A grid too small for the population is
    /// filled as far as it goes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SimRng::seed_from_u64(config.seed);
        let grid = SpatialGrid::new(config.grid_size, &mut rng).ok_or(ConfigError::ZeroGridSize)?;

        let mut sim = Self {
            config,
            grid,
            agents: Vec::with_capacity(config.initial_agents.min(config.capacity())),
            food: Vec::new(),
            tick: 0,
            ids: IdSequence::starting_at(1),
            rng,
            total_deaths: 0,
            births: BirthCounts::default(),
        };

        sim.seed_agents();
        sim.maybe_place_food();

        info!(
            agents = sim.agents.len(),
            size = config.grid_size,
            seed = config.seed,
            "simulation initialised"
        );
        Ok(sim)
    }

    /// Build a simulation around a prepared grid.
    ///
    /// `agents` and `food` list what the caller placed. The population is
    /// shuffled once; fresh identifiers start after the largest one in use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the grid size
    /// does not match it.
    pub fn with_world(
        config: SimConfig,
        grid: SpatialGrid,
        mut agents: Vec<EntityId>,
        food: Vec<EntityId>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.size() != config.grid_size {
            return Err(ConfigError::GridSizeMismatch {
                expected: config.grid_size,
                actual: grid.size(),
            });
        }

        let mut rng = SimRng::seed_from_u64(config.seed);
        agents.shuffle(&mut rng);

        let next_id = grid
            .index_entries()
            .iter()
            .map(|(id, _)| *id)
            .chain(agents.iter().copied())
            .chain(food.iter().copied())
            .max()
            .map_or(1, |id| id.0 + 1);

        Ok(Self {
            config,
            grid,
            agents,
            food,
            tick: 0,
            ids: IdSequence::starting_at(next_id),
            rng,
            total_deaths: 0,
            births: BirthCounts::default(),
        })
    }

    /// Run one tick.
    pub fn step(&mut self) -> TickReport {
        self.tick += 1;
        debug!(tick = self.tick, "tick begins");

        self.age_food();
        let doomed = self.act_all();
        self.sweep(&doomed);
        self.maybe_spawn_food();

        let report = self.capture();
        assert_invariants(&self.grid, &self.agents, &self.food);

        debug!(
            tick = self.tick,
            population = self.agents.len(),
            food = self.food.len(),
            "tick complete"
        );
        report
    }

    /// Age every food item and drop the expired ones.
    fn age_food(&mut self) {
        let lifespan = self.config.food_lifespan;
        let grid = &self.grid;
        self.food.retain(|&id| {
            let expired = grid.update_food(id, |food| {
                food.age_one_tick();
                food.is_expired(lifespan)
            });
            match expired {
                Some(false) => true,
                Some(true) => {
                    let at = grid.position_of(id);
                    grid.remove_entity(id);
                    debug!(food = %id, ?at, "food expired");
                    false
                }
                None => false,
            }
        });
    }

    /// Let every agent alive at the start of the phase act once.
    ///
    /// Returns the agents to remove in the death sweep.
    fn act_all(&mut self) -> Vec<EntityId> {
        let mut order = self.agents.clone();
        order.shuffle(&mut self.rng);

        let mut doomed = Vec::new();
        for id in order {
            if !self.grid.contains(id) {
                warn!(agent = %id, "agent has no position and will be removed");
                doomed.push(id);
                continue;
            }

            let action = strategy::execute(id, &self.grid, &self.config, &mut self.rng);
            if let Action::Ate { food } = action {
                self.food.retain(|&f| f != food);
            }
            debug!(agent = %id, ?action, "acted");

            self.maybe_reproduce(id);

            let cost = self.config.cost_of_living;
            let energy = self.grid.update_agent(id, |agent| {
                agent.energy -= cost;
                agent.energy
            });
            if energy.is_none_or(|e| e <= 0.0) {
                doomed.push(id);
            }
        }

        doomed
    }

    /// Split the agent's energy with a child in an empty adjacent cell.
    fn maybe_reproduce(&mut self, id: EntityId) {
        let Some(parent) = self.grid.agent(id) else {
            return;
        };
        let cooled_down =
            self.tick.saturating_sub(parent.last_reproduced_tick) >= self.config.reproduction_cooldown;
        if parent.energy < self.config.reproduction_threshold || !cooled_down {
            return;
        }

        let Some(at) = self.grid.position_of(id) else {
            return;
        };
        let empty = self.grid.empty_neighbours(at, 1);
        let Some(&spot) = empty.choose(&mut self.rng) else {
            return;
        };

        let share = parent.energy / 2.0;
        let child = Agent::new(self.ids.next_id(), parent.strategy, share);
        if !self.grid.place_entity(child.into(), spot) {
            return;
        }

        let tick = self.tick;
        self.grid.update_agent(id, |agent| {
            agent.energy -= share;
            agent.last_reproduced_tick = tick;
        });
        self.agents.push(child.id);
        self.births.record(parent.strategy);
        info!(parent = %id, child = %child.id, strategy = %parent.strategy, tick, "agent reproduced");
    }

    /// Remove doomed agents that are off the grid or still at non-positive energy.
    ///
    /// An agent assisted after it was marked survives the sweep.
    fn sweep(&mut self, doomed: &[EntityId]) {
        let dead: HashSet<EntityId> = doomed
            .iter()
            .copied()
            .filter(|&id| self.grid.agent(id).is_none_or(|agent| agent.energy <= 0.0))
            .collect();
        if dead.is_empty() {
            return;
        }

        for &id in doomed.iter().filter(|id| dead.contains(id)) {
            self.grid.remove_entity(id);
        }
        self.total_deaths += dead.len() as u64;

        self.agents.retain(|id| !dead.contains(id));
        debug!(tick = self.tick, deaths = dead.len(), "death sweep");
    }

    /// One spawn trial, if below the food cap.
    fn maybe_spawn_food(&mut self) {
        if self.food.len() >= self.config.max_food {
            debug!("maximum food reached, skipping spawn");
            return;
        }
        if self.rng.gen_bool(self.config.food_spawn_probability) {
            self.place_food();
        }
    }

    fn maybe_place_food(&mut self) {
        if self.food.len() < self.config.max_food {
            self.place_food();
        }
    }

    fn place_food(&mut self) {
        let Some(at) = self.grid.take_free_position() else {
            debug!("no free position for food");
            return;
        };
        let food = Food::new(self.ids.next_id(), self.config.food_reward);
        if self.grid.place_entity(food.into(), at) {
            self.food.push(food.id);
            debug!(food = %food.id, %at, "food spawned");
        }
    }

    fn seed_agents(&mut self) {
        let requested = self.config.initial_agents;
        for _ in 0..requested {
            let Some(at) = self.grid.take_free_position() else {
                warn!(
                    placed = self.agents.len(),
                    requested, "ran out of space while placing agents"
                );
                break;
            };

            let strategy = if self.rng.gen_bool(0.5) {
                Strategy::Helper
            } else {
                Strategy::Selfish
            };
            let agent = Agent::new(self.ids.next_id(), strategy, self.config.initial_energy);
            if self.grid.place_entity(agent.into(), at) {
                self.agents.push(agent.id);
            } else {
                warn!(%at, "failed to place agent");
            }
        }
    }

    fn capture(&self) -> TickReport {
        let agents: Vec<Agent> = self
            .agents
            .iter()
            .filter_map(|&id| self.grid.agent(id))
            .collect();
        TickReport {
            metrics: TickMetrics::record(
                self.tick,
                &agents,
                self.total_deaths,
                self.births,
                self.food.len(),
            ),
            snapshot: GridSnapshot::capture(self.tick, &self.grid),
        }
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Living agents in population order.
    #[must_use]
    pub fn living_agents(&self) -> &[EntityId] {
        &self.agents
    }

    /// Number of living agents.
    #[must_use]
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// Placed food items.
    #[must_use]
    pub fn active_food(&self) -> &[EntityId] {
        &self.food
    }

    /// The grid.
    #[must_use]
    pub const fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Deaths since the start of the run.
    #[must_use]
    pub const fn total_deaths(&self) -> u64 {
        self.total_deaths
    }

    /// Births since the start of the run.
    #[must_use]
    pub const fn births(&self) -> BirthCounts {
        self.births
    }

    /// The configuration this simulation runs under.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Whether no agent is left.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.agents.is_empty()
    }
}
