//! Error taxonomy for engine operations.

use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Kind of entity a lookup failed for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntityKind {
    Tournament,
    Participant,
    Match,
    Rule,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Tournament => write!(f, "Tournament"),
            EntityKind::Participant => write!(f, "Participant"),
            EntityKind::Match => write!(f, "Match"),
            EntityKind::Rule => write!(f, "Rule"),
        }
    }
}

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Malformed input, or a transition the current data does not allow
    /// (e.g. finalizing a round with pending matches).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Operation attempted out of sequence.
    #[error("Invalid state: {0}")]
    State(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Uuid },

    /// Duplicate assignment, duplicate name, or a write based on a stale version.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure from the store, passed through unchanged.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TournamentError {
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        TournamentError::NotFound { kind, id }
    }

    /// Message safe to show to a caller: storage internals are not exposed.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Storage(_) => "Internal server error".to_string(),
            TournamentError::NotFound { kind, .. } => format!("{kind} not found"),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations.
pub type TournamentResult<T> = Result<T, TournamentError>;
