//! The concurrent spatial grid.
//!
//! Cells live in an index-addressed arena, each behind its own mutex. The
//! arena index doubles as the lock identity: any operation touching more
//! than one cell takes the locks in ascending index order, which rules out
//! circular waits between concurrent callers.
//!
//! Two structures sit beside the cells and are synchronized on their own:
//! the entity-to-position reverse index and the free-position pool. Both
//! are only ever touched while holding cell locks, never the other way
//! round.

// Coordinates are wrapped into [0, size) before any index conversion.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::free_pool::FreePool;
use super::{Agent, Entity, EntityId, EntityKind, Food, Position};

type Slot = Option<Entity>;

/// Toroidal grid of cells, safe for concurrent callers.
#[derive(Debug)]
pub struct SpatialGrid {
    /// Side length of the square grid.
    size: u16,
    /// Cell slots in row-major order, one lock per cell.
    cells: Vec<Mutex<Slot>>,
    /// Reverse index from entity to its cell.
    positions: DashMap<EntityId, Position>,
    /// Candidate free cells for placement.
    free: FreePool,
}

impl SpatialGrid {
    /// Create an empty grid whose free-position pool is shuffled with `rng`.
    ///
    /// Returns `None` if `size` is zero.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(size: u16, rng: &mut R) -> Option<Self> {
        if size == 0 {
            return None;
        }

        let cell_count = usize::from(size) * usize::from(size);
        let cells = (0..cell_count).map(|_| Mutex::new(None)).collect();
        let mut order: Vec<usize> = (0..cell_count).collect();
        order.shuffle(rng);

        Some(Self {
            size,
            cells,
            positions: DashMap::new(),
            free: FreePool::new(order, cell_count),
        })
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells currently holding an entity.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of cells currently empty.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.cell_count().saturating_sub(self.occupied_count())
    }

    /// Wrap a position onto this grid.
    #[must_use]
    #[inline]
    pub const fn wrap(&self, position: Position) -> Position {
        position.wrapped(self.size)
    }

    #[inline]
    fn index_of(&self, position: Position) -> usize {
        let p = self.wrap(position);
        p.y as usize * usize::from(self.size) + p.x as usize
    }

    #[inline]
    fn position_at(&self, index: usize) -> Position {
        let size = usize::from(self.size);
        Position::new((index % size) as i32, (index / size) as i32)
    }

    /// Lock two distinct cells in ascending index order.
    ///
    /// Guards are returned in argument order.
    fn lock_two(&self, a: usize, b: usize) -> (MutexGuard<'_, Slot>, MutexGuard<'_, Slot>) {
        debug_assert_ne!(a, b, "lock_two requires distinct cells");
        if a < b {
            let first = self.cells[a].lock();
            let second = self.cells[b].lock();
            (first, second)
        } else {
            let second = self.cells[b].lock();
            let first = self.cells[a].lock();
            (first, second)
        }
    }

    /// Lock the cell currently holding `id`.
    ///
    /// Re-reads the index if the entity moved between lookup and lock.
    fn lock_entity(&self, id: EntityId) -> Option<(usize, MutexGuard<'_, Slot>)> {
        loop {
            let index = self.index_of(self.position_of(id)?);
            let guard = self.cells[index].lock();
            if guard.as_ref().is_some_and(|e| e.id() == id) {
                return Some((index, guard));
            }
        }
    }

    /// Place an entity in an empty cell.
    ///
    /// Fails if the wrapped cell is occupied or the entity is already placed.
    pub fn place_entity(&self, entity: Entity, position: Position) -> bool {
        let position = self.wrap(position);
        let index = self.index_of(position);
        let mut cell = self.cells[index].lock();
        if cell.is_some() {
            return false;
        }

        match self.positions.entry(entity.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(position);
                *cell = Some(entity);
                true
            }
        }
    }

    /// Move a placed entity to an empty cell.
    ///
    /// Both cells stay locked until the slots and the reverse index agree.
    /// The vacated cell goes back to the free pool.
    pub fn move_entity(&self, id: EntityId, to: Position) -> bool {
        let Some(from) = self.position_of(id) else {
            return false;
        };
        let to = self.wrap(to);
        let (src_index, dst_index) = (self.index_of(from), self.index_of(to));
        if src_index == dst_index {
            return false;
        }

        let (mut src, mut dst) = self.lock_two(src_index, dst_index);
        if !src.as_ref().is_some_and(|e| e.id() == id) || dst.is_some() {
            return false;
        }

        *dst = src.take();
        self.positions.insert(id, to);
        self.free.offer(src_index);
        true
    }

    /// Remove an entity from the grid, returning it.
    ///
    /// No-op returning `None` if the entity is not placed.
    pub fn remove_entity(&self, id: EntityId) -> Option<Entity> {
        let (index, mut cell) = self.lock_entity(id)?;
        let entity = cell.take();
        self.positions.remove(&id);
        self.free.offer(index);
        entity
    }

    /// Return a position to the free pool if it is unoccupied.
    pub fn release_position(&self, position: Position) -> bool {
        let index = self.index_of(position);
        let cell = self.cells[index].lock();
        cell.is_none() && self.free.offer(index)
    }

    /// Pull some free position from the pool.
    ///
    /// Stale entries (occupied since they were queued) are discarded.
    /// Returns `None` when no free position remains.
    pub fn take_free_position(&self) -> Option<Position> {
        while let Some(index) = self.free.poll() {
            if self.cells[index].lock().is_none() {
                return Some(self.position_at(index));
            }
        }
        None
    }

    /// Number of entries waiting in the free pool, stale ones included.
    #[must_use]
    pub fn pooled_count(&self) -> usize {
        self.free.len()
    }

    /// Copy of the entity at a position.
    #[must_use]
    pub fn entity_at(&self, position: Position) -> Option<Entity> {
        *self.cells[self.index_of(position)].lock()
    }

    /// Whether a position holds an entity.
    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.cells[self.index_of(position)].lock().is_some()
    }

    /// Current position of an entity, if placed.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.positions.get(&id).map(|entry| *entry)
    }

    /// Whether an entity is placed on the grid.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Copy of a placed agent.
    #[must_use]
    pub fn agent(&self, id: EntityId) -> Option<Agent> {
        let (_, cell) = self.lock_entity(id)?;
        cell.as_ref().and_then(Entity::as_agent).copied()
    }

    /// Apply `f` to a placed agent under its cell lock.
    pub fn update_agent<T>(&self, id: EntityId, f: impl FnOnce(&mut Agent) -> T) -> Option<T> {
        let (_, mut cell) = self.lock_entity(id)?;
        cell.as_mut().and_then(Entity::as_agent_mut).map(f)
    }

    /// Apply `f` to placed food under its cell lock.
    pub fn update_food<T>(&self, id: EntityId, f: impl FnOnce(&mut Food) -> T) -> Option<T> {
        let (_, mut cell) = self.lock_entity(id)?;
        cell.as_mut().and_then(Entity::as_food_mut).map(f)
    }

    /// Move `amount` energy from one placed agent to another.
    ///
    /// Fails without mutation unless both are placed agents and the donor
    /// holds strictly more than `amount`.
    pub fn transfer_energy(&self, from: EntityId, to: EntityId, amount: f64) -> bool {
        loop {
            let (Some(a), Some(b)) = (self.position_of(from), self.position_of(to)) else {
                return false;
            };
            let (a, b) = (self.index_of(a), self.index_of(b));
            if a == b {
                return false;
            }

            let (mut donor_cell, mut recipient_cell) = self.lock_two(a, b);
            let settled = donor_cell.as_ref().is_some_and(|e| e.id() == from)
                && recipient_cell.as_ref().is_some_and(|e| e.id() == to);
            if !settled {
                continue;
            }

            let (Some(Entity::Agent(donor)), Some(Entity::Agent(recipient))) =
                (donor_cell.as_mut(), recipient_cell.as_mut())
            else {
                return false;
            };
            if donor.energy <= amount {
                return false;
            }
            donor.energy -= amount;
            recipient.energy += amount;
            return true;
        }
    }

    /// Arbitrate a food item between the agents around it.
    ///
    /// Locks the food cell and its radius-1 neighbourhood in ascending
    /// index order, then picks the neighbouring agent with the most energy
    /// (lowest identifier on ties). Only if that agent is `contender` is the
    /// food removed and its reward credited. Returns the consumed food.
    pub fn try_consume_food(&self, position: Position, contender: EntityId) -> Option<Food> {
        let centre = self.index_of(position);
        let mut indices: Vec<usize> = self
            .neighbour_positions(position, 1)
            .into_iter()
            .map(|p| self.index_of(p))
            .chain(std::iter::once(centre))
            .collect();
        indices.sort_unstable();
        indices.dedup();

        let mut guards: Vec<(usize, MutexGuard<'_, Slot>)> =
            indices.iter().map(|&i| (i, self.cells[i].lock())).collect();

        let centre_slot = guards.iter().position(|(i, _)| *i == centre)?;
        let Some(Entity::Food(food)) = *guards[centre_slot].1 else {
            return None;
        };

        let strongest = guards
            .iter()
            .filter(|(i, _)| *i != centre)
            .filter_map(|(_, cell)| cell.as_ref().and_then(Entity::as_agent))
            .max_by(|a, b| a.energy.total_cmp(&b.energy).then_with(|| b.id.cmp(&a.id)))
            .map(|agent| agent.id);
        if strongest != Some(contender) {
            return None;
        }

        *guards[centre_slot].1 = None;
        self.positions.remove(&food.id);
        self.free.offer(centre);

        let winner = guards.iter_mut().find_map(|(_, cell)| {
            cell.as_mut()
                .and_then(Entity::as_agent_mut)
                .filter(|agent| agent.id == contender)
        });
        if let Some(agent) = winner {
            agent.energy += food.reward;
        }

        debug!(agent = %contender, food = %food.id, at = %self.position_at(centre), "contested food claimed");
        Some(food)
    }

    /// Wrapped positions within Chebyshev `radius` of `centre`, centre excluded.
    ///
    /// Scan order is dx outer, dy inner, each from `-radius` to `radius`.
    /// On grids narrower than the window each axis stops after `size`
    /// offsets, so every cell appears once at its first offset.
    #[must_use]
    pub fn neighbour_positions(&self, centre: Position, radius: u16) -> Vec<Position> {
        let centre = self.wrap(centre);
        let r = i32::from(radius);
        let span = (2 * usize::from(radius) + 1).min(usize::from(self.size));
        let mut result = Vec::with_capacity(span * span - 1);

        let end = -r + span as i32;
        for dx in -r..end {
            for dy in -r..end {
                let p = centre.offset(dx, dy, self.size);
                if p != centre {
                    result.push(p);
                }
            }
        }

        result
    }

    /// Unoccupied neighbour positions.
    #[must_use]
    pub fn empty_neighbours(&self, centre: Position, radius: u16) -> Vec<Position> {
        self.neighbour_positions(centre, radius)
            .into_iter()
            .filter(|&p| !self.is_occupied(p))
            .collect()
    }

    /// Occupied neighbour positions with a copy of their entity.
    #[must_use]
    pub fn occupied_neighbours(&self, centre: Position, radius: u16) -> Vec<(Position, Entity)> {
        self.neighbour_positions(centre, radius)
            .into_iter()
            .filter_map(|p| self.entity_at(p).map(|e| (p, e)))
            .collect()
    }

    /// Neighbour positions holding an entity of `kind`.
    #[must_use]
    pub fn neighbours_of_kind(&self, centre: Position, radius: u16, kind: EntityKind) -> Vec<Position> {
        self.neighbour_positions(centre, radius)
            .into_iter()
            .filter(|&p| self.entity_at(p).is_some_and(|e| e.kind() == kind))
            .collect()
    }

    /// Candidate with the smallest squared toroidal distance from `from`.
    ///
    /// Ties keep the earliest candidate.
    #[must_use]
    pub fn find_nearest(&self, from: Position, candidates: &[Position]) -> Option<Position> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&p| from.distance_sq(p, self.size))
    }

    /// One greedy step from `from` toward `to` along the shortest wrap.
    #[must_use]
    pub fn step_toward(&self, from: Position, to: Position) -> Position {
        let (dx, dy) = from.toroidal_delta(to, self.size);
        from.offset(dx.signum(), dy.signum(), self.size)
    }

    /// Chebyshev distance between two positions on this grid.
    #[must_use]
    pub fn chebyshev(&self, a: Position, b: Position) -> i32 {
        a.chebyshev(b, self.size)
    }

    /// Copy of every occupied cell in row-major order.
    #[must_use]
    pub fn occupied_cells(&self) -> Vec<(Position, Entity)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| (*cell.lock()).map(|e| (self.position_at(index), e)))
            .collect()
    }

    /// Copy of the reverse index.
    #[must_use]
    pub fn index_entries(&self) -> Vec<(EntityId, Position)> {
        self.positions.iter().map(|entry| (*entry.key(), *entry.value())).collect()
    }
}
