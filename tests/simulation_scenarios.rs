//! Scripted scenarios for the tick engine.
//!
//! Each test builds a small world by hand, steps it, and checks one
//! behaviour end to end.
//!
//! Run with: cargo test simulation_scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use forage::sim::SimRng;
use forage::{Agent, EntityId, Food, Position, SimConfig, Simulation, SpatialGrid, Strategy};
use rand::SeedableRng;

fn quiet(size: u16) -> SimConfig {
    SimConfig {
        grid_size: size,
        initial_agents: 0,
        food_spawn_probability: 0.0,
        ..SimConfig::default()
    }
}

fn grid(size: u16) -> SpatialGrid {
    SpatialGrid::new(size, &mut SimRng::seed_from_u64(5)).unwrap()
}

fn place(grid: &SpatialGrid, id: u64, strategy: Strategy, energy: f64, x: i32, y: i32) -> EntityId {
    let id = EntityId(id);
    assert!(grid.place_entity(Agent::new(id, strategy, energy).into(), Position::new(x, y)));
    id
}

fn energy(sim: &Simulation, id: EntityId) -> f64 {
    sim.grid().agent(id).unwrap().energy
}

#[test]
fn test_adjacent_food_consumed() {
    let g = grid(5);
    let agent = place(&g, 1, Strategy::Selfish, 100.0, 2, 2);
    g.place_entity(Food::new(EntityId(2), 25.0).into(), Position::new(2, 3));
    let mut sim = Simulation::with_world(quiet(5), g, vec![agent], vec![EntityId(2)]).unwrap();

    let report = sim.step();

    assert!(sim.active_food().is_empty());
    assert_eq!(report.metrics.food_count, 0);
    assert_eq!(sim.grid().position_of(agent), Some(Position::new(2, 3)));
    assert!((energy(&sim, agent) - 123.9).abs() < 1e-9);
}

#[test]
fn test_helper_assists_weak_neighbour() {
    let config = SimConfig {
        assist_cost: 5.0,
        ..quiet(3)
    };
    let g = grid(3);
    let helper = place(&g, 1, Strategy::Helper, 100.0, 0, 0);
    let weak = place(&g, 2, Strategy::Selfish, 4.0, 1, 1);
    let mut sim = Simulation::with_world(config, g, vec![helper, weak], Vec::new()).unwrap();

    sim.step();

    assert!((energy(&sim, weak) - 7.9).abs() < 1e-9);
    assert!(energy(&sim, weak) > config.low_energy_threshold);
    assert!(energy(&sim, helper) < 100.0);
}

#[test]
fn test_lone_agent_moves() {
    let g = grid(5);
    let agent = place(&g, 1, Strategy::Helper, 100.0, 2, 2);
    let mut sim = Simulation::with_world(quiet(5), g, vec![agent], Vec::new()).unwrap();

    sim.step();

    assert_ne!(sim.grid().position_of(agent), Some(Position::new(2, 2)));
    assert!((energy(&sim, agent) - 98.9).abs() < 1e-9);
}

#[test]
fn test_blocked_agent_stays_put() {
    let config = SimConfig {
        reproduction_threshold: 1_000.0,
        ..quiet(3)
    };
    let g = grid(3);
    let mut ids = Vec::new();
    let mut next = 0;
    for y in 0..3 {
        for x in 0..3 {
            next += 1;
            ids.push(place(&g, next, Strategy::Selfish, 100.0, x, y));
        }
    }
    let centre = g.entity_at(Position::new(1, 1)).unwrap().id();
    let mut sim = Simulation::with_world(config, g, ids, Vec::new()).unwrap();

    sim.step();

    assert_eq!(sim.grid().position_of(centre), Some(Position::new(1, 1)));
    assert!((energy(&sim, centre) - 99.6).abs() < 1e-9);
    assert_eq!(sim.population(), 9);
}

#[test]
fn test_reproduction_cooldown() {
    let g = grid(5);
    let agent = place(&g, 1, Strategy::Selfish, 100.0, 2, 2);
    let mut sim = Simulation::with_world(quiet(5), g, vec![agent], Vec::new()).unwrap();

    for _ in 0..39 {
        sim.step();
    }
    assert_eq!(sim.population(), 1);
    assert!((energy(&sim, agent) - 57.1).abs() < 1e-6);

    let report = sim.step();
    assert_eq!(sim.population(), 2);
    assert_eq!(report.metrics.selfish_births, 1);
    assert_eq!(sim.grid().agent(agent).unwrap().last_reproduced_tick, 40);
}

#[test]
fn test_extinction() {
    let g = grid(5);
    let agent = place(&g, 1, Strategy::Selfish, 0.0, 2, 2);
    let mut sim = Simulation::with_world(quiet(5), g, vec![agent], Vec::new()).unwrap();

    let report = sim.step();

    assert!(sim.is_extinct());
    assert!(!sim.grid().contains(agent));
    assert_eq!(sim.grid().occupied_count(), 0);
    assert_eq!(report.metrics.total_deaths, 1);
    assert!(report.metrics.avg_energy.abs() < f64::EPSILON);
}

#[test]
fn test_stronger_agent_wins_contested_food() {
    let config = SimConfig {
        vision_radius: 1,
        ..quiet(7)
    };
    let g = grid(7);
    let weak = place(&g, 1, Strategy::Selfish, 10.0, 2, 3);
    let strong = place(&g, 2, Strategy::Selfish, 60.0, 4, 3);
    g.place_entity(Food::new(EntityId(3), 25.0).into(), Position::new(3, 3));
    let mut sim = Simulation::with_world(config, g, vec![weak, strong], vec![EntityId(3)]).unwrap();

    sim.step();

    assert!(sim.active_food().is_empty());
    assert_eq!(sim.grid().position_of(strong), Some(Position::new(3, 3)));
    assert!((energy(&sim, strong) - 83.9).abs() < 1e-9);
}

#[test]
fn test_snapshot_matches_grid() {
    let config = SimConfig {
        grid_size: 12,
        initial_agents: 30,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config).unwrap();
    for _ in 0..5 {
        let report = sim.step();
        assert_eq!(report.snapshot.agent_count(), sim.population());
        assert_eq!(report.snapshot.food_count(), sim.active_food().len());
        assert_eq!(report.metrics.population(), sim.population());
        assert_eq!(report.metrics.energy_snapshot.len(), sim.population());
    }
}
