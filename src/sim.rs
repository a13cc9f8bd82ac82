//! Simulation layer for Forage.
//!
//! Drives the world one tick at a time:
//! - Strategy decisions for helpers and selfish agents
//! - The five-phase tick engine
//! - Per-tick metrics and grid snapshots

mod engine;
mod metrics;
mod snapshot;
mod strategy;

pub use engine::{SimRng, Simulation, TickReport};
pub use metrics::{BirthCounts, TickMetrics};
pub use snapshot::{CellSnapshot, GridSnapshot};
pub use strategy::{Action, execute};
