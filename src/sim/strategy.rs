//! Per-agent decision procedures.
//!
//! Both strategies read local grid state, act through the grid's
//! lock-guarded operations, and report what happened.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::SimConfig;
use crate::world::{EntityId, EntityKind, Position, SpatialGrid, Strategy};

/// Outcome of one agent's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The agent did not change cell and spent nothing.
    Stationary,
    /// The agent moved one cell and paid the move cost.
    Moved,
    /// The agent won the food in an adjacent cell.
    Ate {
        /// Food item consumed.
        food: EntityId,
    },
    /// The agent gave the assist cost to an adjacent low-energy agent.
    Assisted {
        /// Agent that received the energy.
        recipient: EntityId,
    },
    /// The agent wanted to assist but could not afford it.
    AssistFailed,
    /// The agent reached food but a stronger neighbour holds the claim.
    Contested,
}

/// Run one turn for the agent `id` under its own strategy.
///
/// An agent that is not on the grid does nothing.
pub fn execute<R: Rng + ?Sized>(
    id: EntityId,
    grid: &SpatialGrid,
    config: &SimConfig,
    rng: &mut R,
) -> Action {
    let (Some(agent), Some(position)) = (grid.agent(id), grid.position_of(id)) else {
        return Action::Stationary;
    };

    match agent.strategy {
        Strategy::Selfish => selfish(id, position, grid, config, rng),
        Strategy::Helper => helper(id, position, grid, config, rng),
    }
}

/// Head for the nearest visible food and contest it once adjacent.
fn selfish<R: Rng + ?Sized>(
    id: EntityId,
    position: Position,
    grid: &SpatialGrid,
    config: &SimConfig,
    rng: &mut R,
) -> Action {
    let food = grid.neighbours_of_kind(position, config.vision_radius, EntityKind::Food);
    if let Some(target) = grid.find_nearest(position, &food) {
        let step = grid.step_toward(position, target);
        if step == target {
            let Some(eaten) = grid.try_consume_food(target, id) else {
                return Action::Contested;
            };
            // The cell was just vacated; losing it to a racing caller only skips the move.
            if grid.move_entity(id, target) {
                charge(grid, id, config.move_cost);
            }
            return Action::Ate { food: eaten.id };
        }

        if try_move(grid, id, step, config) {
            return Action::Moved;
        }
    }

    wander(id, position, grid, config, rng)
}

/// Assist the nearest visible low-energy agent, or walk toward it.
fn helper<R: Rng + ?Sized>(
    id: EntityId,
    position: Position,
    grid: &SpatialGrid,
    config: &SimConfig,
    rng: &mut R,
) -> Action {
    let needy: Vec<(Position, EntityId)> = grid
        .occupied_neighbours(position, config.vision_radius)
        .into_iter()
        .filter_map(|(p, entity)| {
            entity
                .as_agent()
                .filter(|other| other.energy < config.low_energy_threshold)
                .map(|other| (p, other.id))
        })
        .collect();
    let candidates: Vec<Position> = needy.iter().map(|(p, _)| *p).collect();

    if let Some(target) = grid.find_nearest(position, &candidates) {
        if grid.chebyshev(position, target) <= 1 {
            let Some(&(_, recipient)) = needy.iter().find(|(p, _)| *p == target) else {
                return Action::Stationary;
            };
            if grid.transfer_energy(id, recipient, config.assist_cost) {
                debug!(helper = %id, %recipient, amount = config.assist_cost, "assisted");
                return Action::Assisted { recipient };
            }
            debug!(helper = %id, "too weak to assist");
            return Action::AssistFailed;
        }

        if try_move(grid, id, grid.step_toward(position, target), config) {
            return Action::Moved;
        }
    }

    wander(id, position, grid, config, rng)
}

/// Move to a uniformly random empty adjacent cell, if any.
fn wander<R: Rng + ?Sized>(
    id: EntityId,
    position: Position,
    grid: &SpatialGrid,
    config: &SimConfig,
    rng: &mut R,
) -> Action {
    let empty = grid.empty_neighbours(position, 1);
    match empty.choose(rng) {
        Some(&to) if try_move(grid, id, to, config) => Action::Moved,
        _ => Action::Stationary,
    }
}

fn try_move(grid: &SpatialGrid, id: EntityId, to: Position, config: &SimConfig) -> bool {
    if grid.move_entity(id, to) {
        charge(grid, id, config.move_cost);
        true
    } else {
        false
    }
}

fn charge(grid: &SpatialGrid, id: EntityId, amount: f64) {
    grid.update_agent(id, |agent| agent.energy -= amount);
}
