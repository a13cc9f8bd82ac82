#![no_main]

use arbitrary::Arbitrary;
use forage::world::check_invariants;
use forage::{Agent, EntityId, Food, Position, SpatialGrid, Strategy};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// One grid operation.
#[derive(Arbitrary, Debug)]
enum GridOp {
    PlaceAgent { id: u8, x: i16, y: i16, energy: u8 },
    PlaceFood { id: u8, x: i16, y: i16 },
    Move { id: u8, x: i16, y: i16 },
    Remove { id: u8 },
    Release { x: i16, y: i16 },
    Take,
    Transfer { from: u8, to: u8, amount: u8 },
    Consume { x: i16, y: i16, contender: u8 },
}

/// Structured input for grid fuzzing.
#[derive(Arbitrary, Debug)]
struct GridInput {
    /// Grid side length (capped to keep runs fast).
    size: u8,
    /// Pool shuffle seed.
    seed: u64,
    /// Operations to apply in order.
    ops: Vec<GridOp>,
}

fuzz_target!(|input: GridInput| {
    let size = u16::from(input.size % 16);
    let Some(grid) = SpatialGrid::new(size, &mut ChaCha12Rng::seed_from_u64(input.seed)) else {
        return;
    };

    for op in input.ops.iter().take(256) {
        match *op {
            GridOp::PlaceAgent { id, x, y, energy } => {
                let agent = Agent::new(EntityId(u64::from(id)), Strategy::Selfish, f64::from(energy));
                grid.place_entity(agent.into(), Position::new(i32::from(x), i32::from(y)));
            }
            GridOp::PlaceFood { id, x, y } => {
                let food = Food::new(EntityId(u64::from(id)), 25.0);
                grid.place_entity(food.into(), Position::new(i32::from(x), i32::from(y)));
            }
            GridOp::Move { id, x, y } => {
                grid.move_entity(EntityId(u64::from(id)), Position::new(i32::from(x), i32::from(y)));
            }
            GridOp::Remove { id } => {
                grid.remove_entity(EntityId(u64::from(id)));
            }
            GridOp::Release { x, y } => {
                grid.release_position(Position::new(i32::from(x), i32::from(y)));
            }
            GridOp::Take => {
                if let Some(at) = grid.take_free_position() {
                    assert!(!grid.is_occupied(at), "pool handed out occupied cell {at}");
                }
            }
            GridOp::Transfer { from, to, amount } => {
                grid.transfer_energy(EntityId(u64::from(from)), EntityId(u64::from(to)), f64::from(amount));
            }
            GridOp::Consume { x, y, contender } => {
                grid.try_consume_food(Position::new(i32::from(x), i32::from(y)), EntityId(u64::from(contender)));
            }
        }

        let violations = check_invariants(&grid);
        assert!(violations.is_empty(), "invariant violations: {violations:?}");
    }
});
