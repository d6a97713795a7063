//! Run Recorder
//!
//! Writes everything a run produces into one output directory:
//!
//! ```text
//! <dir>/events.jsonl               transition events, one per line
//! <dir>/current_state.json         latest snapshot
//! <dir>/snapshots/snap_NNNNNN.json numbered snapshots
//! <dir>/stats.json                 run summary
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::snapshot::{
    generate_snapshot, write_current_state, write_snapshot_to_dir, SnapshotGenerator,
};
use super::stats::{write_stats, SimulationStats};
use super::OutputError;
use crate::config::OutputConfig;
use crate::events::EventLogger;
use crate::simulation::Simulation;

/// Event log file name
pub const EVENTS_FILE_NAME: &str = "events.jsonl";

pub struct RunRecorder {
    /// `None` when output is disabled
    dir: Option<PathBuf>,
    snapshots: SnapshotGenerator,
    logger: EventLogger,
    write_stats: bool,
}

impl RunRecorder {
    /// Prepare the output directory according to `config`.
    pub fn new(config: &OutputConfig) -> Result<Self, OutputError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        fs::create_dir_all(&config.dir)?;
        let logger = if config.write_events {
            EventLogger::new(config.dir.join(EVENTS_FILE_NAME))?
        } else {
            EventLogger::null()
        };

        Ok(Self {
            dir: Some(config.dir.clone()),
            snapshots: SnapshotGenerator::new(config.snapshot_interval),
            logger,
            write_stats: config.write_stats,
        })
    }

    /// A recorder that writes nothing.
    pub fn disabled() -> Self {
        Self {
            dir: None,
            snapshots: SnapshotGenerator::new(0),
            logger: EventLogger::null(),
            write_stats: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshots.snapshot_count()
    }

    pub fn event_count(&self) -> u64 {
        self.logger.event_count()
    }

    fn snapshot(&mut self, sim: &Simulation, triggered_by: &str) -> Result<(), OutputError> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        let id = self.snapshots.next_id();
        let snapshot = generate_snapshot(sim.world(), id, sim.tick(), triggered_by);
        let path = write_snapshot_to_dir(&snapshot, dir)?;
        write_current_state(&snapshot, dir)?;
        self.snapshots.mark_snapshot(sim.tick());
        tracing::debug!("Wrote snapshot {} (tick {})", path.display(), sim.tick());
        Ok(())
    }

    /// Write the initial snapshot.
    pub fn record_start(&mut self, sim: &Simulation) -> Result<(), OutputError> {
        self.snapshot(sim, "simulation_start")
    }

    /// Log the tick's transitions and take a periodic snapshot when due.
    pub fn record_tick(&mut self, sim: &Simulation) -> Result<(), OutputError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.logger
            .log_transitions(sim.tick(), sim.world().last_transitions())?;
        if self.snapshots.should_snapshot(sim.tick()) {
            self.snapshot(sim, "periodic")?;
        }
        Ok(())
    }

    /// Final snapshot, flush, and the stats file. Returns the run summary.
    pub fn finish(&mut self, sim: &Simulation) -> Result<SimulationStats, OutputError> {
        let stats = sim.summary();
        let Some(dir) = self.dir.clone() else {
            return Ok(stats);
        };

        if self.snapshots.last_snapshot_tick() != Some(sim.tick()) {
            self.snapshot(sim, "simulation_end")?;
        }
        self.logger.flush()?;
        if self.write_stats {
            let path = write_stats(&stats, &dir)?;
            tracing::info!("Wrote {}", path.display());
        }
        Ok(stats)
    }
}
