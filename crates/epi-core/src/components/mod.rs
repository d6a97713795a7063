//! Kernel Components
//!
//! The agent value type and the state-indexed membership of the population.

pub mod agent;
pub mod population;

pub use agent::*;
pub use population::*;
