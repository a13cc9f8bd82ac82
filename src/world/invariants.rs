//! Grid invariants - sanity checks that detect bugs.
//!
//! These should never trigger. A violation means an operation left the cell
//! slots, the reverse index, or the engine's bookkeeping out of agreement.

use std::collections::HashSet;

use thiserror::Error;

use super::{EntityId, EntityKind, SpatialGrid};

/// Invariant violation error.
#[derive(Debug, Clone, Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Check the grid's internal consistency.
///
/// Every index entry must point at a cell holding that entity, every
/// occupied cell must be indexed at its own position, and every agent must
/// carry a finite energy value.
#[must_use]
pub fn check_invariants(grid: &SpatialGrid) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let index = grid.index_entries();
    for &(id, position) in &index {
        match grid.entity_at(position) {
            Some(entity) if entity.id() == id => {}
            Some(entity) => violations.push(InvariantViolation::new(format!(
                "Index maps {id} to {position} but the cell holds {}",
                entity.id()
            ))),
            None => violations.push(InvariantViolation::new(format!(
                "Index maps {id} to empty cell {position}"
            ))),
        }
    }

    let occupied = grid.occupied_cells();
    let mut seen = HashSet::with_capacity(occupied.len());
    for (position, entity) in &occupied {
        let id = entity.id();
        if !seen.insert(id) {
            violations.push(InvariantViolation::new(format!(
                "Entity {id} occupies more than one cell"
            )));
        }

        if grid.position_of(id) != Some(*position) {
            violations.push(InvariantViolation::new(format!(
                "Cell {position} holds {id} but the index disagrees"
            )));
        }

        if let Some(agent) = entity.as_agent().filter(|a| !a.energy.is_finite()) {
            violations.push(InvariantViolation::new(format!(
                "Agent {id} has non-finite energy {}",
                agent.energy
            )));
        }
    }

    if occupied.len() != index.len() {
        violations.push(InvariantViolation::new(format!(
            "{} occupied cells but {} index entries",
            occupied.len(),
            index.len()
        )));
    }

    violations
}

/// Check the grid plus the engine's population and food lists against it.
///
/// Every listed agent and food item must be placed with the right kind,
/// and nothing may be placed that neither list knows about.
#[must_use]
pub fn check_population(
    grid: &SpatialGrid,
    agents: &[EntityId],
    food: &[EntityId],
) -> Vec<InvariantViolation> {
    let mut violations = check_invariants(grid);

    let expected = [(agents, EntityKind::Agent), (food, EntityKind::Food)];
    let mut listed = HashSet::with_capacity(agents.len() + food.len());
    for (ids, kind) in expected {
        for &id in ids {
            if !listed.insert(id) {
                violations.push(InvariantViolation::new(format!("{id} is listed twice")));
            }

            let placed = grid.position_of(id).and_then(|p| grid.entity_at(p));
            match placed {
                Some(entity) if entity.id() == id && entity.kind() == kind => {}
                Some(entity) if entity.id() == id => violations.push(InvariantViolation::new(
                    format!("{id} listed as {} but placed as {}", kind.label(), entity.kind().label()),
                )),
                _ => violations.push(InvariantViolation::new(format!(
                    "Listed {} {id} is not on the grid",
                    kind.label()
                ))),
            }
        }
    }

    if grid.occupied_count() != listed.len() {
        violations.push(InvariantViolation::new(format!(
            "{} entities placed but {} listed",
            grid.occupied_count(),
            listed.len()
        )));
    }

    violations
}

/// Assert all grid and population invariants hold.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics listing every violation if any invariant is broken.
#[cfg(debug_assertions)]
pub fn assert_invariants(grid: &SpatialGrid, agents: &[EntityId], food: &[EntityId]) {
    let violations = check_population(grid, agents, food);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Grid invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_grid: &SpatialGrid, _agents: &[EntityId], _food: &[EntityId]) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Agent, Food, Position, Strategy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn create_valid_world() -> (SpatialGrid, Vec<EntityId>, Vec<EntityId>) {
        let grid = SpatialGrid::new(6, &mut ChaCha12Rng::seed_from_u64(3)).unwrap();
        grid.place_entity(Agent::new(EntityId(1), Strategy::Helper, 10.0).into(), Position::new(1, 1));
        grid.place_entity(Agent::new(EntityId(2), Strategy::Selfish, 10.0).into(), Position::new(4, 2));
        grid.place_entity(Food::new(EntityId(3), 25.0).into(), Position::new(0, 5));
        (grid, vec![EntityId(1), EntityId(2)], vec![EntityId(3)])
    }

    #[test]
    fn test_valid_world_passes() {
        let (grid, agents, food) = create_valid_world();
        assert!(check_invariants(&grid).is_empty());
        assert!(check_population(&grid, &agents, &food).is_empty());
    }

    #[test]
    fn test_unlisted_entity_detected() {
        let (grid, agents, _) = create_valid_world();
        let violations = check_population(&grid, &agents, &[]);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("placed"));
    }

    #[test]
    fn test_missing_agent_detected() {
        let (grid, mut agents, food) = create_valid_world();
        agents.push(EntityId(99));
        let violations = check_population(&grid, &agents, &food);
        assert!(violations.iter().any(|v| v.message.contains("not on the grid")));
    }

    #[test]
    fn test_kind_mismatch_detected() {
        let (grid, _, _) = create_valid_world();
        let violations = check_population(&grid, &[EntityId(1), EntityId(3)], &[EntityId(2)]);
        assert!(violations.iter().any(|v| v.message.contains("listed as")));
    }

    #[test]
    fn test_non_finite_energy_detected() {
        let (grid, _, _) = create_valid_world();
        grid.update_agent(EntityId(1), |a| a.energy = f64::NAN);
        let violations = check_invariants(&grid);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("non-finite"));
    }

    #[test]
    fn test_violation_display() {
        let v = InvariantViolation::new("boom".to_string());
        assert_eq!(v.to_string(), "Invariant violation: boom");
    }
}
