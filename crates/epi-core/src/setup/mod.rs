//! World Setup
//!
//! Initial population spawning.

pub mod agents;

pub use agents::spawn_population;
