//! Shared data types for the epidemic simulation.
//!
//! This crate contains pure data structures with no simulation logic:
//! health states, transition events and world snapshots. Anything that
//! consumes simulation output (a renderer, an analysis script) depends on
//! this crate rather than on the kernel.

pub mod event;
pub mod snapshot;
pub mod state;

// Re-export state types
pub use state::{HealthState, ParseStateError, StateCounts};

// Re-export event types
pub use event::{generate_agent_id, generate_event_id, TransitionEvent, TransitionKind};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, AgentSnapshot, WorldSnapshot};
