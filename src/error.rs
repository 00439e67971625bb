//! Error types
//!
//! Out-of-bounds moves and overlaps are simulation events, not errors; only
//! malformed input from the caller ends up here.

use thiserror::Error;

/// Errors raised by the simulation API.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Acceleration delta outside `[-1, 1]` (or NaN).
    #[error("invalid action: acceleration {0} is outside [-1, 1]")]
    InvalidAcceleration(f64),
    /// Steering angle that is NaN or infinite.
    #[error("invalid action: steering angle {0} is not finite")]
    InvalidAngle(f64),
    /// Discrete action index with no mapping.
    #[error("invalid action: unknown discrete action index {0}")]
    UnknownAction(usize),
    /// Actor oscillation axis that is neither `updown` nor `leftright`.
    #[error("invalid actor direction {0:?} (expected \"updown\" or \"leftright\")")]
    InvalidDirection(String),
}

impl SimError {
    /// True for the errors caused by a bad action passed to `step`.
    pub fn is_invalid_action(&self) -> bool {
        matches!(
            self,
            SimError::InvalidAcceleration(_) | SimError::InvalidAngle(_) | SimError::UnknownAction(_)
        )
    }
}

/// Errors from reading or writing JSON files (configs, leaderboards).
#[derive(Debug, Error)]
pub enum FileError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
