//! Error types for the junction simulation.
//!
//! Engine operations fail with [`SimError`]; building an engine from
//! junction definitions fails with [`ConfigError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by engine queries and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("Junction {id} not found")]
    NotFound { id: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl SimError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result alias for engine operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while loading or validating junction definitions.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("At least one junction must be configured")]
    NoJunctions,

    #[error("Junction id cannot be empty")]
    EmptyId,

    #[error("Junction id {id} is declared more than once")]
    DuplicateId { id: String },

    #[error("Junction {id} needs at least 2 approaches, found {count}")]
    TooFewApproaches { id: String, count: usize },

    #[error("Junction {id} declares approach '{approach}' more than once")]
    DuplicateApproach { id: String, approach: String },

    #[error("Junction {id} has {actual} readings for {expected} approaches")]
    ReadingMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Junction {id} reading for '{approach}' is outside the sensor range")]
    ReadingOutOfRange { id: String, approach: String },

    #[error("Failed to read junction file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid junction file: {0}")]
    Parse(#[from] toml::de::Error),
}
