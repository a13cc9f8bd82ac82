#![no_main]

use arbitrary::Arbitrary;
use forage::world::check_population;
use forage::{SimConfig, Simulation};
use libfuzzer_sys::fuzz_target;

/// Structured input for whole-tick fuzzing.
#[derive(Arbitrary, Debug)]
struct TickInput {
    /// Grid side length (capped to keep runs fast).
    grid_size: u8,
    /// Initial population (capped).
    agents: u8,
    /// Food cap.
    max_food: u8,
    /// Spawn probability in percent.
    spawn_percent: u8,
    /// Initial energy.
    initial_energy: u8,
    /// Reproduction cooldown.
    cooldown: u8,
    /// Vision radius.
    vision: u8,
    /// Food lifespan.
    lifespan: u8,
    /// Number of ticks to run (capped).
    ticks: u8,
    /// RNG seed.
    seed: u64,
}

fuzz_target!(|input: TickInput| {
    let config = SimConfig {
        grid_size: u16::from(input.grid_size % 24),
        initial_agents: usize::from(input.agents),
        max_food: usize::from(input.max_food),
        food_spawn_probability: f64::from(input.spawn_percent.min(100)) / 100.0,
        initial_energy: f64::from(input.initial_energy),
        reproduction_cooldown: u64::from(input.cooldown),
        vision_radius: u16::from(input.vision % 8),
        food_lifespan: u32::from(input.lifespan),
        seed: input.seed,
        ..SimConfig::default()
    };

    let Ok(mut sim) = Simulation::new(config) else {
        return;
    };

    for _ in 0..input.ticks.min(64) {
        let report = sim.step();
        assert_eq!(report.metrics.population(), sim.population());
        let violations = check_population(sim.grid(), sim.living_agents(), sim.active_food());
        assert!(violations.is_empty(), "invariant violations: {violations:?}");
        if sim.is_extinct() {
            break;
        }
    }
});
