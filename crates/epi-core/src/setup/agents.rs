//! Agent Spawning
//!
//! Places the initial population at random integer positions and seeds the
//! first agents as infected.

use epi_events::HealthState;
use rand::Rng;

use crate::components::Agent;
use crate::world::WorldParams;

/// Initial state for the agent at `index`.
///
/// The first `initial_infected` agents by index are infected, not a random
/// sample of the population.
fn initial_state(index: usize, initial_infected: usize) -> HealthState {
    if index < initial_infected {
        HealthState::Infected
    } else {
        HealthState::Susceptible
    }
}

/// Spawn the whole population.
///
/// Positions are uniform in `[0, width) x [0, height)`, x drawn before y,
/// agents in index order. `params` must already be validated.
pub fn spawn_population<R: Rng>(params: &WorldParams, rng: &mut R) -> Vec<Agent> {
    (0..params.population)
        .map(|i| {
            let x = rng.gen_range(0..params.width);
            let y = rng.gen_range(0..params.height);
            Agent::new(
                x,
                y,
                initial_state(i, params.initial_infected),
                params.contact_radius,
            )
        })
        .collect()
}
