//! Health State Types
//!
//! The four health states an agent moves through and per-state tallies.
//!
//! # Example
//!
//! ```
//! use epi_events::{HealthState, StateCounts};
//!
//! let state: HealthState = "infected".parse().unwrap();
//! assert!(state.can_transition_to(HealthState::Dead));
//!
//! let counts = StateCounts::from_states([HealthState::Susceptible, state]);
//! assert_eq!(counts.total(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health state of a single agent.
///
/// States only move forward: Susceptible -> Infected -> {Recovered, Dead}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

impl HealthState {
    /// Number of distinct states.
    pub const COUNT: usize = 4;

    /// Returns all states in transition order.
    pub fn all() -> &'static [HealthState; HealthState::COUNT] {
        &[
            HealthState::Susceptible,
            HealthState::Infected,
            HealthState::Recovered,
            HealthState::Dead,
        ]
    }

    /// Dense index of this state, usable for fixed-size per-state tables.
    pub fn index(self) -> usize {
        match self {
            HealthState::Susceptible => 0,
            HealthState::Infected => 1,
            HealthState::Recovered => 2,
            HealthState::Dead => 3,
        }
    }

    /// Returns true for absorbing states (no outgoing transitions).
    pub fn is_terminal(self) -> bool {
        matches!(self, HealthState::Recovered | HealthState::Dead)
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: HealthState) -> bool {
        matches!(
            (self, next),
            (HealthState::Susceptible, HealthState::Infected)
                | (HealthState::Infected, HealthState::Recovered)
                | (HealthState::Infected, HealthState::Dead)
        )
    }

    /// Single-letter code used by compact dumps (S, I, R, D).
    pub fn code(self) -> char {
        match self {
            HealthState::Susceptible => 'S',
            HealthState::Infected => 'I',
            HealthState::Recovered => 'R',
            HealthState::Dead => 'D',
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        HealthState::Susceptible
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthState::Susceptible => write!(f, "susceptible"),
            HealthState::Infected => write!(f, "infected"),
            HealthState::Recovered => write!(f, "recovered"),
            HealthState::Dead => write!(f, "dead"),
        }
    }
}

impl FromStr for HealthState {
    type Err = ParseStateError;

    /// Accepts either the full name or the single-letter code, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "susceptible" | "s" => Ok(HealthState::Susceptible),
            "infected" | "i" => Ok(HealthState::Infected),
            "recovered" | "r" => Ok(HealthState::Recovered),
            "dead" | "d" => Ok(HealthState::Dead),
            _ => Err(ParseStateError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown health state name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStateError(pub String);

impl fmt::Display for ParseStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid health state: '{}'", self.0)
    }
}

impl std::error::Error for ParseStateError {}

/// Number of agents in each health state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    pub dead: usize,
}

impl StateCounts {
    /// Tallies an iterator of states.
    pub fn from_states(states: impl IntoIterator<Item = HealthState>) -> Self {
        let mut counts = Self::default();
        for state in states {
            counts.record(state);
        }
        counts
    }

    /// Count for a single state.
    pub fn get(&self, state: HealthState) -> usize {
        match state {
            HealthState::Susceptible => self.susceptible,
            HealthState::Infected => self.infected,
            HealthState::Recovered => self.recovered,
            HealthState::Dead => self.dead,
        }
    }

    /// Adds one agent in `state` to the tally.
    pub fn record(&mut self, state: HealthState) {
        match state {
            HealthState::Susceptible => self.susceptible += 1,
            HealthState::Infected => self.infected += 1,
            HealthState::Recovered => self.recovered += 1,
            HealthState::Dead => self.dead += 1,
        }
    }

    /// Total population covered by these counts.
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered + self.dead
    }

    /// Agents that have ever been infected (currently infected, recovered or dead).
    pub fn ever_infected(&self) -> usize {
        self.infected + self.recovered + self.dead
    }
}

impl fmt::Display for StateCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S={} I={} R={} D={}",
            self.susceptible, self.infected, self.recovered, self.dead
        )
    }
}
