//! Population Index
//!
//! Membership of the population grouped by health state, kept as a cache of
//! each agent's own state so that "all infected agents" never needs a full scan.

use epi_events::{HealthState, StateCounts};

use super::agent::Agent;

/// Agent indices grouped by health state.
///
/// Within a group, indices keep the order in which agents joined it: spawn
/// order for the initial population, commit order for later transitions.
/// The infected group's order is the order infected agents are processed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateIndex {
    groups: [Vec<usize>; HealthState::COUNT],
}

impl StateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from scratch by scanning every agent.
    pub fn build(agents: &[Agent]) -> Self {
        let mut index = Self::new();
        for (i, agent) in agents.iter().enumerate() {
            index.insert(agent.state(), i);
        }
        index
    }

    /// Agent indices currently in `state`.
    pub fn members(&self, state: HealthState) -> &[usize] {
        &self.groups[state.index()]
    }

    /// Number of agents currently in `state`.
    pub fn count(&self, state: HealthState) -> usize {
        self.groups[state.index()].len()
    }

    /// Tallies for all four states.
    pub fn counts(&self) -> StateCounts {
        StateCounts {
            susceptible: self.count(HealthState::Susceptible),
            infected: self.count(HealthState::Infected),
            recovered: self.count(HealthState::Recovered),
            dead: self.count(HealthState::Dead),
        }
    }

    /// Total number of indexed agents.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    /// Add an agent to a group.
    pub fn insert(&mut self, state: HealthState, agent: usize) {
        self.groups[state.index()].push(agent);
    }

    /// Move an agent from one group to another.
    ///
    /// One removal and one insertion, so the groups never drift apart.
    /// Returns false (and changes nothing) if the agent was not in `from`.
    pub fn reclassify(&mut self, agent: usize, from: HealthState, to: HealthState) -> bool {
        let group = &mut self.groups[from.index()];
        match group.iter().position(|&i| i == agent) {
            Some(pos) => {
                group.remove(pos);
                self.groups[to.index()].push(agent);
                true
            }
            None => false,
        }
    }

    /// Checks the partition invariant against the agents it was built from.
    ///
    /// Every agent must appear exactly once, in the group matching its state.
    pub fn is_consistent_with(&self, agents: &[Agent]) -> bool {
        if self.len() != agents.len() {
            return false;
        }
        let mut seen = vec![false; agents.len()];
        for &state in HealthState::all() {
            for &i in self.members(state) {
                match agents.get(i) {
                    Some(agent) if agent.state() == state && !seen[i] => seen[i] = true,
                    _ => return false,
                }
            }
        }
        seen.into_iter().all(|s| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population() -> Vec<Agent> {
        vec![
            Agent::new(0, 0, HealthState::Infected, 1.0),
            Agent::new(1, 1, HealthState::Susceptible, 1.0),
            Agent::new(2, 2, HealthState::Susceptible, 1.0),
            Agent::new(3, 3, HealthState::Dead, 1.0),
        ]
    }

    #[test]
    fn test_build_groups_in_spawn_order() {
        let agents = population();
        let index = StateIndex::build(&agents);

        assert_eq!(index.members(HealthState::Susceptible), &[1, 2]);
        assert_eq!(index.members(HealthState::Infected), &[0]);
        assert_eq!(index.members(HealthState::Dead), &[3]);
        assert_eq!(index.count(HealthState::Recovered), 0);
        assert_eq!(index.len(), 4);
        assert!(index.is_consistent_with(&agents));
    }

    #[test]
    fn test_reclassify_moves_exactly_one_entry() {
        let mut agents = population();
        let mut index = StateIndex::build(&agents);

        assert!(index.reclassify(2, HealthState::Susceptible, HealthState::Infected));
        agents[2].set_state(HealthState::Infected);

        assert_eq!(index.members(HealthState::Susceptible), &[1]);
        assert_eq!(index.members(HealthState::Infected), &[0, 2]);
        assert!(index.is_consistent_with(&agents));
    }

    #[test]
    fn test_reclassify_missing_agent_is_noop() {
        let agents = population();
        let mut index = StateIndex::build(&agents);

        assert!(!index.reclassify(1, HealthState::Infected, HealthState::Recovered));
        assert_eq!(index, StateIndex::build(&agents));
    }

    #[test]
    fn test_detects_desync() {
        let mut agents = population();
        let index = StateIndex::build(&agents);

        // State written without touching the index.
        agents[1].set_state(HealthState::Infected);
        assert!(!index.is_consistent_with(&agents));
    }

    #[test]
    fn test_counts() {
        let index = StateIndex::build(&population());
        let counts = index.counts();
        assert_eq!(counts.susceptible, 2);
        assert_eq!(counts.infected, 1);
        assert_eq!(counts.dead, 1);
        assert_eq!(counts.total(), 4);
    }
}
