//! World layer for Forage.
//!
//! Everything that lives on the toroidal grid:
//! - Positions with wrap-around arithmetic
//! - Agents and food, stored by value in their cells
//! - The concurrent spatial grid with its free-position pool
//! - Consistency checks over the grid and the engine's bookkeeping

mod entity;
mod free_pool;
mod grid;
mod invariants;
mod position;

pub use entity::{Agent, Entity, EntityId, EntityKind, Food, IdSequence, Strategy};
pub use grid::SpatialGrid;
pub use invariants::{InvariantViolation, assert_invariants, check_invariants, check_population};
pub use position::Position;
