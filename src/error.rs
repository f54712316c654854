//! Error types shared across the crate.
//!
//! Game-over is a state, not an error, so nothing in here covers crashes or
//! out-of-bounds flight.

use thiserror::Error;

use crate::session::Phase;

/// Failures of the key-value storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode leaderboard: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Leaderboard submission failures
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The name was empty (or only whitespace); the caller should re-prompt
    #[error("player name must not be empty")]
    InvalidName,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Session operations attempted in the wrong phase
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("`{operation}` is not valid while {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("this run's score was already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
}

/// Problems loading or validating gameplay tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
