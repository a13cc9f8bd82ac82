//! Property-based tests for the spatial grid.
//!
//! Random operation sequences are replayed against both the grid and a
//! plain map model; the two must agree after every step.
//! Run with: cargo test --release prop_grid

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use forage::world::check_invariants;
use forage::{Agent, EntityId, Position, SpatialGrid};

const SIZE: u16 = 6;

#[derive(Debug, Clone)]
enum Op {
    Place(u8, i32, i32),
    Move(u8, i32, i32),
    Remove(u8),
    Release(i32, i32),
    Take,
}

fn op() -> impl Strategy<Value = Op> {
    let coord = -8i32..16;
    prop_oneof![
        (0u8..12, coord.clone(), coord.clone()).prop_map(|(id, x, y)| Op::Place(id, x, y)),
        (0u8..12, coord.clone(), coord.clone()).prop_map(|(id, x, y)| Op::Move(id, x, y)),
        (0u8..12).prop_map(Op::Remove),
        (coord.clone(), coord).prop_map(|(x, y)| Op::Release(x, y)),
        Just(Op::Take),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The grid agrees with a simple model under any operation sequence.
    #[test]
    fn prop_grid_matches_model(ops in prop::collection::vec(op(), 1..80), seed in any::<u64>()) {
        let grid = SpatialGrid::new(SIZE, &mut ChaCha12Rng::seed_from_u64(seed)).unwrap();
        let mut model: HashMap<EntityId, Position> = HashMap::new();

        for op in ops {
            match op {
                Op::Place(id, x, y) => {
                    let id = EntityId(u64::from(id));
                    let at = Position::new(x, y).wrapped(SIZE);
                    let expected = !model.contains_key(&id) && !model.values().any(|p| *p == at);
                    let agent = Agent::new(id, forage::Strategy::Selfish, 1.0);
                    prop_assert_eq!(grid.place_entity(agent.into(), Position::new(x, y)), expected);
                    if expected {
                        model.insert(id, at);
                    }
                }
                Op::Move(id, x, y) => {
                    let id = EntityId(u64::from(id));
                    let to = Position::new(x, y).wrapped(SIZE);
                    let expected = model.contains_key(&id) && !model.values().any(|p| *p == to);
                    prop_assert_eq!(grid.move_entity(id, Position::new(x, y)), expected);
                    if expected {
                        model.insert(id, to);
                    }
                }
                Op::Remove(id) => {
                    let id = EntityId(u64::from(id));
                    let removed = grid.remove_entity(id).map(|e| e.id());
                    prop_assert_eq!(removed, model.remove(&id).map(|_| id));
                }
                Op::Release(x, y) => {
                    let at = Position::new(x, y).wrapped(SIZE);
                    let released = grid.release_position(at);
                    if model.values().any(|p| *p == at) {
                        prop_assert!(!released);
                    }
                }
                Op::Take => {
                    if let Some(at) = grid.take_free_position() {
                        prop_assert!(!model.values().any(|p| *p == at));
                    }
                }
            }

            prop_assert!(check_invariants(&grid).is_empty());
            prop_assert_eq!(grid.occupied_count(), model.len());
            for (id, at) in &model {
                prop_assert_eq!(grid.position_of(*id), Some(*at));
                prop_assert_eq!(grid.entity_at(*at).map(|e| e.id()), Some(*id));
            }
        }
    }

    /// Neighbourhoods never contain the centre and never repeat a cell.
    #[test]
    fn prop_neighbours_unique(size in 1u16..12, radius in 1u16..7, x in -20i32..20, y in -20i32..20) {
        let grid = SpatialGrid::new(size, &mut ChaCha12Rng::seed_from_u64(0)).unwrap();
        let centre = Position::new(x, y).wrapped(size);
        let neighbours = grid.neighbour_positions(centre, radius);

        prop_assert!(!neighbours.contains(&centre));
        for (i, p) in neighbours.iter().enumerate() {
            prop_assert!(!neighbours[i + 1..].contains(p));
            prop_assert!(grid.chebyshev(centre, *p) <= i32::from(radius));
        }
        let window = 2 * usize::from(radius) + 1;
        let side = window.min(usize::from(size));
        prop_assert_eq!(neighbours.len(), side * side - 1);
    }

    /// A greedy step always shortens the toroidal distance to the target.
    #[test]
    fn prop_step_toward_closes_in(
        size in 2u16..30,
        fx in 0i32..30, fy in 0i32..30,
        tx in 0i32..30, ty in 0i32..30
    ) {
        let grid = SpatialGrid::new(size, &mut ChaCha12Rng::seed_from_u64(0)).unwrap();
        let from = Position::new(fx, fy).wrapped(size);
        let to = Position::new(tx, ty).wrapped(size);
        let step = grid.step_toward(from, to);

        if from == to {
            prop_assert_eq!(step, from);
        } else {
            prop_assert_eq!(grid.chebyshev(from, step), 1);
            prop_assert!(grid.chebyshev(step, to) < grid.chebyshev(from, to));
        }
    }
}
