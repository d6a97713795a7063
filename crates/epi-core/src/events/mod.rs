//! Event System
//!
//! Append-only log of committed health-state transitions.

pub mod logger;

pub use logger::EventLogger;
