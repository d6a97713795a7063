//! Kernel Systems
//!
//! The two per-tick passes: transmission (contact, infection, recovery, death)
//! and movement (bounded random walk).

pub mod movement;
pub mod transmission;

pub use movement::{clamp_axis, random_walk};
pub use transmission::{contact_neighbors, resolve_contacts, Transition, TransmissionRates};
