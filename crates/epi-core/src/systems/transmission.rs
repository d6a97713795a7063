//! Transmission System
//!
//! Contact detection plus infection, recovery and death resolution for one tick.
//!
//! Decisions are made against the population as it stood at the start of the
//! tick and returned as a list; nothing is written until the caller commits
//! that list. An agent infected this tick therefore cannot infect anyone until
//! the next tick. A susceptible agent next to several infected agents is tried
//! by each of them in turn until one infects it; later ones skip it.

use epi_events::{HealthState, TransitionEvent, TransitionKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::Agent;

/// Per-tick transition probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRates {
    /// Chance a single infected-susceptible contact transmits
    pub infection_prob: f64,
    /// Chance an infected agent recovers
    pub recover_prob: f64,
    /// Chance an infected agent that did not recover dies instead
    pub death_prob: f64,
}

/// A single decided state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Index of the agent in the population
    pub agent: usize,
    pub from: HealthState,
    pub to: HealthState,
}

impl Transition {
    pub fn new(agent: usize, from: HealthState, to: HealthState) -> Self {
        Self { agent, from, to }
    }

    pub fn kind(&self) -> Option<TransitionKind> {
        TransitionKind::classify(self.from, self.to)
    }

    /// Converts into a loggable event, or `None` for an illegal transition.
    pub fn to_event(&self, event_id: impl Into<String>, tick: u64) -> Option<TransitionEvent> {
        let kind = self.kind()?;
        Some(TransitionEvent::new(
            event_id,
            tick,
            epi_events::generate_agent_id(self.agent),
            kind,
            self.from,
        ))
    }
}

/// Indices of every other agent within `source`'s contact radius, in index order.
///
/// Brute force over the whole population; dead and recovered agents are
/// neighbours too, they just cannot be infected.
pub fn contact_neighbors(agents: &[Agent], source: usize) -> impl Iterator<Item = usize> + '_ {
    let origin = agents.get(source);
    agents
        .iter()
        .enumerate()
        .filter(move |&(i, other)| {
            i != source && origin.map_or(false, |agent| agent.is_in_contact(other))
        })
        .map(|(i, _)| i)
}

/// Decide every transition for one tick.
///
/// For each agent in `infected`, in order:
/// 1. one uniform draw per neighbour that is still susceptible (not yet
///    infected earlier in this pass), infecting it when below `infection_prob`;
/// 2. one draw against `recover_prob`;
/// 3. only if recovery failed, one draw against `death_prob`.
///
/// The returned list holds infections in the order they were decided,
/// followed by recoveries and deaths in processing order.
pub fn resolve_contacts<R: Rng>(
    agents: &[Agent],
    infected: &[usize],
    rates: &TransmissionRates,
    rng: &mut R,
) -> Vec<Transition> {
    let mut newly_infected = vec![false; agents.len()];
    let mut infections = Vec::new();
    let mut outcomes = Vec::new();

    for &source in infected {
        for target in contact_neighbors(agents, source) {
            // Already infected this tick counts as no longer susceptible.
            if agents[target].state() != HealthState::Susceptible || newly_infected[target] {
                continue;
            }
            if rng.gen::<f64>() < rates.infection_prob {
                newly_infected[target] = true;
                infections.push(Transition::new(
                    target,
                    HealthState::Susceptible,
                    HealthState::Infected,
                ));
            }
        }

        if rng.gen::<f64>() < rates.recover_prob {
            outcomes.push(Transition::new(source, HealthState::Infected, HealthState::Recovered));
        } else if rng.gen::<f64>() < rates.death_prob {
            outcomes.push(Transition::new(source, HealthState::Infected, HealthState::Dead));
        }
    }

    infections.extend(outcomes);
    infections
}
