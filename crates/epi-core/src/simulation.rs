//! Headless Simulation Driver
//!
//! Owns a world, its seeded random source and the run bookkeeping, and
//! advances everything one tick at a time. Renderers and writers attach
//! through the observer passed to [`Simulation::run`].

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::{SimulationError, WorldError};
use crate::output::{SimulationStats, StatsCollector, TickStats};
use crate::world::World;

/// Seeded random number generator
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub ticks_run: u64,
    /// First tick after which no infected agents remained
    pub extinct_at: Option<u64>,
}

/// A world plus everything needed to drive it
#[derive(Debug, Clone)]
pub struct Simulation {
    world: World,
    rng: SimRng,
    seed: u64,
    tick: u64,
    movement: i32,
    stop_when_extinct: bool,
    extinct_at: Option<u64>,
    stats: StatsCollector,
}

impl Simulation {
    /// Build a simulation from validated configuration.
    ///
    /// Without a configured seed a random one is drawn and kept, so the run
    /// can still be reproduced from its stats file.
    pub fn new(config: &Config) -> Result<Self, SimulationError> {
        config.validate()?;
        let seed = config.simulation.seed.unwrap_or_else(rand::random);
        let mut rng = SimRng::from_seed(seed);
        let world = World::new(config.world_params(), &mut rng.0)?;

        let mut sim = Self::assemble(world, rng, seed, config.simulation.movement);
        sim.stop_when_extinct = config.simulation.stop_when_extinct;
        Ok(sim)
    }

    /// Drive an existing world with a fresh random source.
    pub fn with_world(world: World, seed: u64, movement: i32) -> Result<Self, WorldError> {
        if movement < 0 {
            return Err(WorldError::InvalidParameter {
                name: "movement",
                reason: format!("must not be negative, got {}", movement),
            });
        }
        Ok(Self::assemble(world, SimRng::from_seed(seed), seed, movement))
    }

    fn assemble(world: World, rng: SimRng, seed: u64, movement: i32) -> Self {
        let mut stats = StatsCollector::new();
        stats.record(TickStats::from_transitions(0, world.counts(), &[]));
        let extinct_at = world.is_extinct().then_some(0);
        Self {
            world,
            rng,
            seed,
            tick: 0,
            movement,
            stop_when_extinct: true,
            extinct_at,
            stats,
        }
    }

    /// Whether `run` stops early once the infection dies out.
    pub fn set_stop_when_extinct(&mut self, stop: bool) {
        self.stop_when_extinct = stop;
    }

    /// Advance exactly one tick: `update` then `move_agents`.
    pub fn step(&mut self) -> Result<TickStats, WorldError> {
        self.world.update(&mut self.rng.0);
        self.world.move_agents(self.movement, &mut self.rng.0)?;
        self.tick += 1;

        let stats =
            TickStats::from_transitions(self.tick, self.world.counts(), self.world.last_transitions());
        self.stats.record(stats);

        if self.extinct_at.is_none() && self.world.is_extinct() {
            self.extinct_at = Some(self.tick);
            tracing::info!(tick = self.tick, "No infected agents remain");
        }
        tracing::debug!(tick = self.tick, counts = %stats.counts, "tick complete");
        Ok(stats)
    }

    /// Step until `max_ticks` have run in total, or the infection dies out
    /// when stopping on extinction. `observer` sees the simulation after every
    /// tick; an observer error aborts the run.
    pub fn run<F>(&mut self, max_ticks: u64, mut observer: F) -> Result<RunOutcome, SimulationError>
    where
        F: FnMut(&Simulation) -> Result<(), SimulationError>,
    {
        let start = self.tick;
        while self.tick < max_ticks {
            if self.stop_when_extinct && self.world.is_extinct() {
                break;
            }
            self.step()?;
            observer(&*self)?;
        }
        Ok(RunOutcome {
            ticks_run: self.tick - start,
            extinct_at: self.extinct_at,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn movement(&self) -> i32 {
        self.movement
    }

    pub fn extinct_at(&self) -> Option<u64> {
        self.extinct_at
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    /// Summary of the run so far
    pub fn summary(&self) -> SimulationStats {
        self.stats.generate_stats(self.seed, self.extinct_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Agent;
    use crate::world::WorldParams;
    use epi_events::HealthState;

    fn seeded_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.simulation.seed = Some(seed);
        config.simulation.max_ticks = 50;
        config
    }

    #[test]
    fn test_new_records_initial_tick() {
        let sim = Simulation::new(&seeded_config(1)).unwrap();
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.seed(), 1);
        assert_eq!(sim.stats().history().len(), 1);
        assert_eq!(sim.stats().history()[0].counts.infected, 5);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = seeded_config(1);
        config.disease.initial_infected = 1000;
        assert!(matches!(
            Simulation::new(&config),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn test_step_advances_one_tick() {
        let mut sim = Simulation::new(&seeded_config(2)).unwrap();
        let stats = sim.step().unwrap();
        assert_eq!(stats.tick, 1);
        assert_eq!(sim.tick(), 1);
        assert_eq!(stats.counts.total(), 100);
        assert_eq!(sim.stats().history().len(), 2);
    }

    #[test]
    fn test_run_stops_on_extinction() {
        // A lone infected agent that always recovers.
        let world = World::from_agents(
            WorldParams {
                recover_prob: 1.0,
                ..WorldParams::default()
            },
            vec![Agent::new(0, 0, HealthState::Infected, 1.0)],
        )
        .unwrap();
        let mut sim = Simulation::with_world(world, 9, 1).unwrap();

        let mut observed = 0;
        let outcome = sim
            .run(100, |_| {
                observed += 1;
                Ok(())
            })
            .unwrap();

        assert_eq!(outcome, RunOutcome { ticks_run: 1, extinct_at: Some(1) });
        assert_eq!(observed, 1);
        assert_eq!(sim.world().count(HealthState::Recovered), 1);
    }

    #[test]
    fn test_run_continues_past_extinction_when_asked() {
        let world = World::from_agents(
            WorldParams::default(),
            vec![Agent::new(3, 3, HealthState::Susceptible, 1.0)],
        )
        .unwrap();
        let mut sim = Simulation::with_world(world, 9, 2).unwrap();
        assert_eq!(sim.extinct_at(), Some(0));

        sim.set_stop_when_extinct(false);
        let outcome = sim.run(5, |_| Ok(())).unwrap();

        assert_eq!(outcome.ticks_run, 5);
        assert_eq!(outcome.extinct_at, Some(0));
    }

    #[test]
    fn test_with_world_rejects_negative_movement() {
        let mut rng = SimRng::from_seed(0);
        let world = World::new(WorldParams::default(), &mut rng.0).unwrap();
        let err = Simulation::with_world(world, 0, -1).unwrap_err();
        assert_eq!(err.parameter(), "movement");
    }

    #[test]
    fn test_summary_reflects_run() {
        let mut sim = Simulation::new(&seeded_config(3)).unwrap();
        sim.set_stop_when_extinct(false);
        sim.run(20, |_| Ok(())).unwrap();

        let summary = sim.summary();
        assert_eq!(summary.seed, 3);
        assert_eq!(summary.total_ticks, 20);
        assert_eq!(summary.tick_history.len(), 21);
        assert_eq!(summary.population, 100);
        assert_eq!(summary.final_counts, sim.world().counts());
    }
}
