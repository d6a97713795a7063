//! Event Types
//!
//! Health-state transition events written to the simulation event log.

use serde::{Deserialize, Serialize};

use crate::HealthState;

/// Kind of transition an agent went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Susceptible -> Infected
    Infection,
    /// Infected -> Recovered
    Recovery,
    /// Infected -> Dead
    Death,
}

impl TransitionKind {
    /// Classifies a state change, or `None` if it is not a legal transition.
    pub fn classify(from: HealthState, to: HealthState) -> Option<Self> {
        match (from, to) {
            (HealthState::Susceptible, HealthState::Infected) => Some(TransitionKind::Infection),
            (HealthState::Infected, HealthState::Recovered) => Some(TransitionKind::Recovery),
            (HealthState::Infected, HealthState::Dead) => Some(TransitionKind::Death),
            _ => None,
        }
    }

    /// The state an agent is in after this transition.
    pub fn target(self) -> HealthState {
        match self {
            TransitionKind::Infection => HealthState::Infected,
            TransitionKind::Recovery => HealthState::Recovered,
            TransitionKind::Death => HealthState::Dead,
        }
    }
}

/// A single committed health-state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Unique identifier (e.g., "evt_00000042")
    pub event_id: String,
    /// Tick during which the transition was committed
    pub tick: u64,
    /// Agent identifier (e.g., "agent_00017")
    pub agent_id: String,
    pub kind: TransitionKind,
    pub from: HealthState,
    pub to: HealthState,
}

impl TransitionEvent {
    /// Create a new transition event.
    pub fn new(
        event_id: impl Into<String>,
        tick: u64,
        agent_id: impl Into<String>,
        kind: TransitionKind,
        from: HealthState,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            tick,
            agent_id: agent_id.into(),
            kind,
            from,
            to: kind.target(),
        }
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// Generates the stable identifier for the agent at `index` in the population.
pub fn generate_agent_id(index: usize) -> String {
    format!("agent_{:05}", index)
}
