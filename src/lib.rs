// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Forage: a deterministic agent-based foraging simulation.
//!
//! Helper and selfish agents compete for food on a toroidal grid. Each tick
//! they move, eat, assist, reproduce, and die, and the crate records how the
//! two strategies fare.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Runner (single run, rayon batch)  │
//! ├─────────────────────────────────────┤
//! │   Tick engine + strategies          │
//! ├─────────────────────────────────────┤
//! │   Concurrent spatial grid           │
//! └─────────────────────────────────────┘
//! ```
//!
//! Runs are reproducible: one seeded generator drives every random choice.

pub mod config;
pub mod error;
pub mod export;
pub mod runner;
pub mod sim;
pub mod world;

pub use config::SimConfig;
pub use error::{ConfigError, ExportError};

// Re-export key types at crate root for convenience
pub use runner::{RunOptions, RunResult, RunSummary, run_batch, run_simulation};
pub use sim::{Action, GridSnapshot, Simulation, TickMetrics, TickReport};
pub use world::{Agent, Entity, EntityId, EntityKind, Food, Position, SpatialGrid, Strategy};
