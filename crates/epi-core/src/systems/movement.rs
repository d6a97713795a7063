//! Movement System
//!
//! Bounded random walk: every living agent steps independently on each axis,
//! then is clamped back onto the plane.

use epi_events::HealthState;
use rand::Rng;

use crate::components::Agent;

/// Adds `delta` to `coord` and saturates the result into `[0, max]`.
pub fn clamp_axis(coord: i32, delta: i32, max: i32) -> i32 {
    coord.saturating_add(delta).clamp(0, max)
}

/// Moves every non-dead agent by one random step.
///
/// Each axis gets its own uniform integer offset in `[-step_size, step_size)`,
/// x drawn before y. Dead agents are skipped and consume no randomness.
/// A `step_size` of zero moves nobody and draws nothing.
pub fn random_walk<R: Rng>(
    agents: &mut [Agent],
    step_size: i32,
    width: i32,
    height: i32,
    rng: &mut R,
) {
    if step_size <= 0 {
        return;
    }

    for agent in agents.iter_mut().filter(|a| a.state() != HealthState::Dead) {
        let position = agent.position();
        let x = clamp_axis(position.x, rng.gen_range(-step_size..step_size), width);
        let y = clamp_axis(position.y, rng.gen_range(-step_size..step_size), height);
        agent.move_to(x, y);
    }
}
