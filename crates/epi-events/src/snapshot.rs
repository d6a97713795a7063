//! Snapshot Types
//!
//! Serialization structs for world snapshots and state output.
//!
//! A snapshot is everything a renderer needs to draw one frame: the plane
//! size, every agent's position and state, and the per-state tallies.

use serde::{Deserialize, Serialize};

use crate::{HealthState, StateCounts};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// A single agent as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub x: i32,
    pub y: i32,
    pub state: HealthState,
}

/// Complete world state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    /// What caused this snapshot ("simulation_start", "periodic", "simulation_end")
    pub triggered_by: String,
    pub width: i32,
    pub height: i32,
    pub counts: StateCounts,
    #[serde(default)]
    pub agents: Vec<AgentSnapshot>,
}

impl WorldSnapshot {
    /// Create an empty snapshot; agents are pushed by the caller.
    pub fn new(
        snapshot_id: impl Into<String>,
        tick: u64,
        triggered_by: impl Into<String>,
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            tick,
            triggered_by: triggered_by.into(),
            width,
            height,
            counts: StateCounts::default(),
            agents: Vec::new(),
        }
    }

    /// Adds an agent and keeps the counts in step.
    pub fn push_agent(&mut self, agent: AgentSnapshot) {
        self.counts.record(agent.state);
        self.agents.push(agent);
    }

    /// Agents currently in the given state.
    pub fn agents_in(&self, state: HealthState) -> impl Iterator<Item = &AgentSnapshot> {
        self.agents.iter().filter(move |a| a.state == state)
    }

    /// Serializes the snapshot to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, x: i32, y: i32, state: HealthState) -> AgentSnapshot {
        AgentSnapshot {
            agent_id: id.to_string(),
            x,
            y,
            state,
        }
    }

    #[test]
    fn test_snapshot_id() {
        assert_eq!(generate_snapshot_id(1), "snap_000001");
        assert_eq!(generate_snapshot_id(123456), "snap_123456");
    }

    #[test]
    fn test_push_agent_updates_counts() {
        let mut snapshot = WorldSnapshot::new("snap_000001", 0, "simulation_start", 100, 100);
        snapshot.push_agent(agent("agent_00000", 1, 2, HealthState::Infected));
        snapshot.push_agent(agent("agent_00001", 3, 4, HealthState::Susceptible));
        snapshot.push_agent(agent("agent_00002", 5, 6, HealthState::Susceptible));

        assert_eq!(snapshot.counts.infected, 1);
        assert_eq!(snapshot.counts.susceptible, 2);
        assert_eq!(snapshot.agents_in(HealthState::Susceptible).count(), 2);
    }

    #[test]
    fn test_snapshot_parses_from_json() {
        let json = r#"{
            "snapshot_id": "snap_000002",
            "tick": 10,
            "triggered_by": "periodic",
            "width": 800,
            "height": 600,
            "counts": {"susceptible": 0, "infected": 0, "recovered": 1, "dead": 0},
            "agents": [{"agent_id": "agent_00000", "x": 12, "y": 40, "state": "recovered"}]
        }"#;
        let snapshot: WorldSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.tick, 10);
        assert_eq!(snapshot.agents[0].state, HealthState::Recovered);
    }
}
