//! Entities that occupy grid cells: agents and food.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an entity.
///
/// Agents and food share one identifier space so the grid's reverse index
/// never confuses the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of fresh entity identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Start a sequence whose first identifier is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Allocate the next identifier.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Heritable behavioral strategy of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Spends energy assisting low-energy neighbours.
    Helper,
    /// Only pursues food for itself.
    Selfish,
}

impl Strategy {
    /// All strategies, in reporting order.
    pub const ALL: [Strategy; 2] = [Strategy::Helper, Strategy::Selfish];

    /// Upper-case label used in exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Strategy::Helper => "HELPER",
            Strategy::Selfish => "SELFISH",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of entity occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// A living agent.
    Agent,
    /// A food item.
    Food,
}

impl EntityKind {
    /// Upper-case label used in exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Agent => "AGENT",
            EntityKind::Food => "FOOD",
        }
    }
}

/// An agent and its lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    /// Unique identifier.
    pub id: EntityId,
    /// Current energy. May dip to or below zero before the death sweep.
    pub energy: f64,
    /// Behavioral strategy, inherited unchanged by offspring.
    pub strategy: Strategy,
    /// Tick at which this agent last reproduced (0 if never).
    pub last_reproduced_tick: u64,
}

impl Agent {
    /// Create a new agent that has never reproduced.
    #[must_use]
    pub const fn new(id: EntityId, strategy: Strategy, energy: f64) -> Self {
        Self {
            id,
            energy,
            strategy,
            last_reproduced_tick: 0,
        }
    }

    /// Whether this agent still has positive energy.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }
}

/// A passive food item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    /// Unique identifier.
    pub id: EntityId,
    /// Energy granted to the agent that consumes it.
    pub reward: f64,
    /// Ticks since creation.
    pub age: u32,
}

impl Food {
    /// Create fresh food with zero age.
    #[must_use]
    pub const fn new(id: EntityId, reward: f64) -> Self {
        Self { id, reward, age: 0 }
    }

    /// Advance the age by one tick.
    pub fn age_one_tick(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Food expires once its age exceeds the lifespan.
    #[must_use]
    pub const fn is_expired(&self, lifespan: u32) -> bool {
        self.age > lifespan
    }
}

/// Anything that can occupy a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity {
    /// An agent.
    Agent(Agent),
    /// A food item.
    Food(Food),
}

impl Entity {
    /// Identifier of the wrapped entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        match self {
            Entity::Agent(agent) => agent.id,
            Entity::Food(food) => food.id,
        }
    }

    /// Kind tag of the wrapped entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Entity::Agent(_) => EntityKind::Agent,
            Entity::Food(_) => EntityKind::Food,
        }
    }

    /// The agent, if this is one.
    #[must_use]
    pub const fn as_agent(&self) -> Option<&Agent> {
        match self {
            Entity::Agent(agent) => Some(agent),
            Entity::Food(_) => None,
        }
    }

    /// Mutable access to the agent, if this is one.
    pub fn as_agent_mut(&mut self) -> Option<&mut Agent> {
        match self {
            Entity::Agent(agent) => Some(agent),
            Entity::Food(_) => None,
        }
    }

    /// The food, if this is food.
    #[must_use]
    pub const fn as_food(&self) -> Option<&Food> {
        match self {
            Entity::Food(food) => Some(food),
            Entity::Agent(_) => None,
        }
    }

    /// Mutable access to the food, if this is food.
    pub fn as_food_mut(&mut self) -> Option<&mut Food> {
        match self {
            Entity::Food(food) => Some(food),
            Entity::Agent(_) => None,
        }
    }
}

impl From<Agent> for Entity {
    fn from(agent: Agent) -> Self {
        Entity::Agent(agent)
    }
}

impl From<Food> for Entity {
    fn from(food: Food) -> Self {
        Entity::Food(food)
    }
}
