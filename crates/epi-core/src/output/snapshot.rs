//! Snapshot Generation
//!
//! Renderer-facing dumps of every agent's position and state.

use std::fs;
use std::path::{Path, PathBuf};

use epi_events::{generate_agent_id, generate_snapshot_id, AgentSnapshot, WorldSnapshot};

use super::OutputError;
use crate::world::World;

/// Subdirectory holding numbered snapshots
pub const SNAPSHOTS_DIR: &str = "snapshots";
/// File always holding the most recent snapshot
pub const CURRENT_STATE_FILE: &str = "current_state.json";

/// Tracks snapshot numbering and cadence
#[derive(Debug, Clone)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u64,
    last_snapshot_tick: Option<u64>,
}

impl SnapshotGenerator {
    /// `snapshot_interval` of 0 disables periodic snapshots.
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
            last_snapshot_tick: None,
        }
    }

    pub fn should_snapshot(&self, current_tick: u64) -> bool {
        current_tick == 0
            || (self.snapshot_interval > 0 && current_tick % self.snapshot_interval == 0)
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn mark_snapshot(&mut self, tick: u64) {
        self.last_snapshot_tick = Some(tick);
    }

    pub fn last_snapshot_tick(&self) -> Option<u64> {
        self.last_snapshot_tick
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Capture the world at `tick`
pub fn generate_snapshot(
    world: &World,
    snapshot_id: impl Into<String>,
    tick: u64,
    triggered_by: &str,
) -> WorldSnapshot {
    let mut snapshot =
        WorldSnapshot::new(snapshot_id, tick, triggered_by, world.width(), world.height());
    for (i, agent) in world.agents().iter().enumerate() {
        let position = agent.position();
        snapshot.push_agent(AgentSnapshot {
            agent_id: generate_agent_id(i),
            x: position.x,
            y: position.y,
            state: agent.state(),
        });
    }
    snapshot
}

/// Write a snapshot to `<dir>/snapshots/<snapshot_id>.json`
pub fn write_snapshot_to_dir(snapshot: &WorldSnapshot, dir: &Path) -> Result<PathBuf, OutputError> {
    let snapshots_dir = dir.join(SNAPSHOTS_DIR);
    fs::create_dir_all(&snapshots_dir)?;
    let path = snapshots_dir.join(format!("{}.json", snapshot.snapshot_id));
    fs::write(&path, snapshot.to_json_pretty()?)?;
    Ok(path)
}

/// Overwrite `<dir>/current_state.json` with this snapshot
pub fn write_current_state(snapshot: &WorldSnapshot, dir: &Path) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(CURRENT_STATE_FILE);
    fs::write(&path, snapshot.to_json_pretty()?)?;
    Ok(path)
}
