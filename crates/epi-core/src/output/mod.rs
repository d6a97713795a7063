//! Output System
//!
//! Run statistics, renderer-facing snapshots, and the recorder that writes
//! both (plus the event log) to an output directory.

pub mod recorder;
pub mod snapshot;
pub mod stats;

pub use recorder::RunRecorder;
pub use snapshot::{
    generate_snapshot, write_current_state, write_snapshot_to_dir, SnapshotGenerator,
    CURRENT_STATE_FILE, SNAPSHOTS_DIR,
};
pub use stats::{write_stats, SimulationStats, StatsCollector, TickStats, STATS_FILE_NAME};

/// Errors that can occur while writing output files.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
