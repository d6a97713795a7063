//! Error Types
//!
//! Construction-time validation errors for the kernel and the aggregate error
//! returned by the headless driver.

use crate::config::ConfigError;
use crate::output::OutputError;

/// Errors raised while validating world parameters.
///
/// Every variant is detected eagerly; a `World` is never partially built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A parameter is out of its legal range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },
}

impl WorldError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        WorldError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Name of the parameter that failed validation.
    pub fn parameter(&self) -> &'static str {
        match self {
            WorldError::InvalidParameter { name, .. } => name,
        }
    }
}

/// Errors that can stop a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = WorldError::invalid("infection_prob", "must be within [0, 1], got 1.5");
        assert_eq!(err.parameter(), "infection_prob");
        assert_eq!(
            err.to_string(),
            "invalid parameter `infection_prob`: must be within [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_simulation_error_is_transparent() {
        let err: SimulationError = WorldError::invalid("movement", "must not be negative").into();
        assert_eq!(err.to_string(), "invalid parameter `movement`: must not be negative");
    }
}
