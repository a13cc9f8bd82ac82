//! Copies of the occupied-cell state.

use serde::{Deserialize, Serialize};

use crate::world::{Entity, EntityKind, Position, SpatialGrid, Strategy};

/// One occupied cell at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Cell position.
    pub position: Position,
    /// What occupies the cell.
    pub kind: EntityKind,
    /// Strategy, for agents.
    pub strategy: Option<Strategy>,
    /// Energy, for agents.
    pub energy: Option<f64>,
}

impl CellSnapshot {
    fn from_entity(position: Position, entity: &Entity) -> Self {
        let agent = entity.as_agent();
        Self {
            position,
            kind: entity.kind(),
            strategy: agent.map(|a| a.strategy),
            energy: agent.map(|a| a.energy),
        }
    }
}

/// Occupied cells of the grid after one tick, in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// Occupied cells.
    pub cells: Vec<CellSnapshot>,
}

impl GridSnapshot {
    /// Copy the grid's occupied cells.
    #[must_use]
    pub fn capture(tick: u64, grid: &SpatialGrid) -> Self {
        let cells = grid
            .occupied_cells()
            .iter()
            .map(|(position, entity)| CellSnapshot::from_entity(*position, entity))
            .collect();
        Self { tick, cells }
    }

    /// The cell at `position`, if it was occupied.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&CellSnapshot> {
        self.cells.iter().find(|c| c.position == position)
    }

    /// Number of agents in the snapshot.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.count(EntityKind::Agent)
    }

    /// Number of food items in the snapshot.
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.count(EntityKind::Food)
    }

    fn count(&self, kind: EntityKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}
