//! Agent Components
//!
//! A single mobile agent: integer position, health state and contact radius.

use epi_events::HealthState;
use serde::{Deserialize, Serialize};

/// Position on the integer plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two positions.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns true if this position lies within `[0, width] x [0, height]`.
    pub fn is_within(&self, width: i32, height: i32) -> bool {
        (0..=width).contains(&self.x) && (0..=height).contains(&self.y)
    }
}

/// A single agent in the population.
///
/// Agent performs no transition checks of its own; the world decides which
/// state changes are legal and when they happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    position: Position,
    state: HealthState,
    /// Distance within which this agent can transmit to or catch from another
    contact_radius: f64,
}

impl Agent {
    pub fn new(x: i32, y: i32, state: HealthState, contact_radius: f64) -> Self {
        Self {
            position: Position::new(x, y),
            state,
            contact_radius,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    pub fn contact_radius(&self) -> f64 {
        self.contact_radius
    }

    pub fn is_alive(&self) -> bool {
        self.state != HealthState::Dead
    }

    /// Euclidean distance to another agent.
    pub fn distance_to(&self, other: &Agent) -> f64 {
        self.position.distance_to(&other.position)
    }

    /// Returns true if `other` is within this agent's contact radius.
    ///
    /// The radius of `self` is the one that counts, so the relation is only
    /// symmetric when both agents share a radius.
    pub fn is_in_contact(&self, other: &Agent) -> bool {
        self.distance_to(other) <= self.contact_radius
    }

    /// Replaces the position. Bounds are the caller's concern.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.position = Position::new(x, y);
    }

    /// Overwrites the health state unconditionally.
    pub fn set_state(&mut self, state: HealthState) {
        self.state = state;
    }
}
