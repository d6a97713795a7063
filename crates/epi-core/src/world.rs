//! Simulation World
//!
//! Owns the fixed-size population and its state index, and runs the two
//! per-tick passes. A tick is `update` followed by `move_agents`.

use epi_events::{HealthState, StateCounts};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Agent, StateIndex};
use crate::error::WorldError;
use crate::setup::spawn_population;
use crate::systems::{self, Transition, TransmissionRates};

/// Parameters fixed at world construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldParams {
    pub population: usize,
    pub width: i32,
    pub height: i32,
    pub initial_infected: usize,
    pub contact_radius: f64,
    pub infection_prob: f64,
    pub recover_prob: f64,
    pub death_prob: f64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            population: 100,
            width: 100,
            height: 100,
            initial_infected: 5,
            contact_radius: 15.0,
            infection_prob: 0.8,
            recover_prob: 0.7,
            death_prob: 0.4,
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), WorldError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WorldError::invalid(
            name,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}

fn check_radius(value: f64) -> Result<(), WorldError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WorldError::invalid(
            "contact_radius",
            format!("must be a finite non-negative distance, got {}", value),
        ))
    }
}

impl WorldParams {
    /// Checks every construction constraint, failing on the first violation.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.population == 0 {
            return Err(WorldError::invalid("population", "must be positive"));
        }
        if self.width <= 0 {
            return Err(WorldError::invalid(
                "width",
                format!("must be positive, got {}", self.width),
            ));
        }
        if self.height <= 0 {
            return Err(WorldError::invalid(
                "height",
                format!("must be positive, got {}", self.height),
            ));
        }
        if self.initial_infected > self.population {
            return Err(WorldError::invalid(
                "initial_infected",
                format!(
                    "{} exceeds population of {}",
                    self.initial_infected, self.population
                ),
            ));
        }
        check_radius(self.contact_radius)?;
        check_probability("infection_prob", self.infection_prob)?;
        check_probability("recover_prob", self.recover_prob)?;
        check_probability("death_prob", self.death_prob)?;
        Ok(())
    }

    pub fn rates(&self) -> TransmissionRates {
        TransmissionRates {
            infection_prob: self.infection_prob,
            recover_prob: self.recover_prob,
            death_prob: self.death_prob,
        }
    }
}

/// The population and everything needed to advance it.
#[derive(Debug, Clone)]
pub struct World {
    params: WorldParams,
    agents: Vec<Agent>,
    index: StateIndex,
    last_transitions: Vec<Transition>,
}

impl World {
    /// Build a world with a freshly spawned population.
    pub fn new<R: Rng>(params: WorldParams, rng: &mut R) -> Result<Self, WorldError> {
        params.validate()?;
        let agents = spawn_population(&params, rng);
        Ok(Self::assemble(params, agents))
    }

    /// Build a world from an explicit population.
    ///
    /// `population` and `initial_infected` are taken from `agents`; the rest
    /// of `params` is validated as in [`World::new`]. Every agent must sit on
    /// the plane and carry a finite non-negative radius.
    pub fn from_agents(mut params: WorldParams, agents: Vec<Agent>) -> Result<Self, WorldError> {
        params.population = agents.len();
        params.initial_infected = agents
            .iter()
            .filter(|a| a.state() == HealthState::Infected)
            .count();
        params.validate()?;

        for (i, agent) in agents.iter().enumerate() {
            let p = agent.position();
            if !p.is_within(params.width, params.height) {
                return Err(WorldError::invalid(
                    "agents",
                    format!(
                        "agent {} at ({}, {}) is outside {}x{}",
                        i, p.x, p.y, params.width, params.height
                    ),
                ));
            }
            check_radius(agent.contact_radius())?;
        }

        Ok(Self::assemble(params, agents))
    }

    fn assemble(params: WorldParams, agents: Vec<Agent>) -> Self {
        let index = StateIndex::build(&agents);
        tracing::debug!(
            population = agents.len(),
            width = params.width,
            height = params.height,
            counts = %index.counts(),
            "world created"
        );
        Self {
            params,
            agents,
            index,
            last_transitions: Vec::new(),
        }
    }

    /// Resolve contacts and state transitions for one tick.
    ///
    /// All decisions are taken from the state at the start of the call and
    /// committed afterwards.
    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        let transitions = systems::resolve_contacts(
            &self.agents,
            self.index.members(HealthState::Infected),
            &self.params.rates(),
            rng,
        );
        self.commit(transitions);
    }

    fn commit(&mut self, transitions: Vec<Transition>) {
        for t in &transitions {
            debug_assert!(t.from.can_transition_to(t.to));
            let Some(agent) = self.agents.get_mut(t.agent) else {
                continue;
            };
            if agent.state() != t.from {
                continue;
            }
            agent.set_state(t.to);
            self.index.reclassify(t.agent, t.from, t.to);
            tracing::trace!(agent = t.agent, from = %t.from, to = %t.to, "transition");
        }
        self.last_transitions = transitions;
    }

    /// Move every living agent one bounded random step.
    pub fn move_agents<R: Rng>(&mut self, step_size: i32, rng: &mut R) -> Result<(), WorldError> {
        if step_size < 0 {
            return Err(WorldError::invalid(
                "step_size",
                format!("must not be negative, got {}", step_size),
            ));
        }
        systems::random_walk(
            &mut self.agents,
            step_size,
            self.params.width,
            self.params.height,
            rng,
        );
        Ok(())
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn width(&self) -> i32 {
        self.params.width
    }

    pub fn height(&self) -> i32 {
        self.params.height
    }

    /// The full population, in index order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents currently in `state`, in the order they joined that state.
    pub fn agents_in(&self, state: HealthState) -> impl Iterator<Item = &Agent> + '_ {
        self.index
            .members(state)
            .iter()
            .filter_map(|&i| self.agents.get(i))
    }

    /// Indices of the agents currently in `state`.
    pub fn members(&self, state: HealthState) -> &[usize] {
        self.index.members(state)
    }

    pub fn count(&self, state: HealthState) -> usize {
        self.index.count(state)
    }

    pub fn counts(&self) -> StateCounts {
        self.index.counts()
    }

    /// True once no infected agents remain; nothing can change state after that.
    pub fn is_extinct(&self) -> bool {
        self.index.count(HealthState::Infected) == 0
    }

    /// Indices of every other agent within contact range of `agent`.
    pub fn neighbors_of(&self, agent: usize) -> Vec<usize> {
        systems::contact_neighbors(&self.agents, agent).collect()
    }

    /// Transitions committed by the most recent `update`.
    pub fn last_transitions(&self) -> &[Transition] {
        &self.last_transitions
    }

    /// Checks that the state index still partitions the population.
    pub fn index_is_consistent(&self) -> bool {
        self.index.is_consistent_with(&self.agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn rejected(params: WorldParams) -> &'static str {
        World::new(params, &mut rng())
            .map(|_| ())
            .expect_err("parameters should be rejected")
            .parameter()
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(WorldParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        let base = WorldParams::default();
        assert_eq!(rejected(WorldParams { infection_prob: 1.01, ..base }), "infection_prob");
        assert_eq!(rejected(WorldParams { recover_prob: -0.1, ..base }), "recover_prob");
        assert_eq!(rejected(WorldParams { death_prob: f64::NAN, ..base }), "death_prob");
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let base = WorldParams::default();
        assert_eq!(rejected(WorldParams { population: 0, initial_infected: 0, ..base }), "population");
        assert_eq!(rejected(WorldParams { width: 0, ..base }), "width");
        assert_eq!(rejected(WorldParams { height: -5, ..base }), "height");
        assert_eq!(rejected(WorldParams { contact_radius: -1.0, ..base }), "contact_radius");
        assert_eq!(
            rejected(WorldParams { contact_radius: f64::INFINITY, ..base }),
            "contact_radius"
        );
    }

    #[test]
    fn test_rejects_too_many_initial_infected() {
        let params = WorldParams {
            population: 10,
            initial_infected: 11,
            ..WorldParams::default()
        };
        assert_eq!(rejected(params), "initial_infected");
    }

    #[test]
    fn test_accepts_boundary_values() {
        let params = WorldParams {
            population: 3,
            initial_infected: 3,
            contact_radius: 0.0,
            infection_prob: 0.0,
            recover_prob: 1.0,
            death_prob: 1.0,
            ..WorldParams::default()
        };
        assert!(World::new(params, &mut rng()).is_ok());
    }

    #[test]
    fn test_new_world_counts() {
        let world = World::new(WorldParams::default(), &mut rng()).unwrap();
        assert_eq!(world.len(), 100);
        assert_eq!(world.count(HealthState::Infected), 5);
        assert_eq!(world.count(HealthState::Susceptible), 95);
        assert!(world.index_is_consistent());
        assert!(world.last_transitions().is_empty());
    }

    #[test]
    fn test_from_agents_derives_population() {
        let agents = vec![
            Agent::new(0, 0, HealthState::Infected, 1.0),
            Agent::new(1, 1, HealthState::Susceptible, 1.0),
        ];
        let world = World::from_agents(WorldParams::default(), agents).unwrap();
        assert_eq!(world.params().population, 2);
        assert_eq!(world.params().initial_infected, 1);
    }

    #[test]
    fn test_from_agents_rejects_off_plane_agent() {
        let agents = vec![Agent::new(101, 0, HealthState::Susceptible, 1.0)];
        let err = World::from_agents(WorldParams::default(), agents).unwrap_err();
        assert_eq!(err.parameter(), "agents");
    }

    #[test]
    fn test_from_agents_rejects_empty_population() {
        let err = World::from_agents(WorldParams::default(), Vec::new()).unwrap_err();
        assert_eq!(err.parameter(), "population");
    }

    #[test]
    fn test_move_rejects_negative_step() {
        let mut world = World::new(WorldParams::default(), &mut rng()).unwrap();
        let err = world.move_agents(-1, &mut rng()).unwrap_err();
        assert_eq!(err.parameter(), "step_size");
    }

    #[test]
    fn test_update_records_transitions() {
        let agents = vec![
            Agent::new(5, 5, HealthState::Infected, 1.0),
            Agent::new(5, 5, HealthState::Susceptible, 1.0),
        ];
        let params = WorldParams {
            infection_prob: 1.0,
            recover_prob: 1.0,
            ..WorldParams::default()
        };
        let mut world = World::from_agents(params, agents).unwrap();
        world.update(&mut rng());

        assert_eq!(world.last_transitions().len(), 2);
        assert_eq!(world.agent(0).unwrap().state(), HealthState::Recovered);
        assert_eq!(world.agent(1).unwrap().state(), HealthState::Infected);
        assert!(world.index_is_consistent());
    }

    #[test]
    fn test_agents_in_follows_join_order() {
        let agents = vec![
            Agent::new(0, 0, HealthState::Susceptible, 0.0),
            Agent::new(50, 50, HealthState::Infected, 0.0),
            Agent::new(0, 0, HealthState::Infected, 0.0),
        ];
        let world = World::from_agents(WorldParams::default(), agents).unwrap();
        let infected: Vec<_> = world
            .agents_in(HealthState::Infected)
            .map(|a| a.position().x)
            .collect();
        assert_eq!(infected, vec![50, 0]);
        assert_eq!(world.neighbors_of(2), vec![0]);
    }
}
