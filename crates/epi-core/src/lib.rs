//! Epidemic Simulation Kernel
//!
//! A population of agents on a bounded integer plane. Each tick infected
//! agents may pass the disease to susceptible neighbours within their contact
//! radius, then recover or die; afterwards every living agent takes a bounded
//! random step. Agents move through
//! `Susceptible -> Infected -> Recovered | Dead` and never back.
//!
//! [`World`] is the kernel; [`Simulation`] drives it with a seeded random
//! source and keeps run statistics; [`RunRecorder`] writes them to disk.

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;
pub mod world;

pub use components::{Agent, Position, StateIndex};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use error::{SimulationError, WorldError};
pub use events::EventLogger;
pub use output::{OutputError, RunRecorder, SimulationStats, TickStats};
pub use simulation::{RunOutcome, SimRng, Simulation};
pub use systems::{Transition, TransmissionRates};
pub use world::{World, WorldParams};

pub use epi_events::{HealthState, StateCounts, TransitionEvent, TransitionKind};
