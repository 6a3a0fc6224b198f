//! Unified error type surfaced by distribution operations.
//!
//! Wraps store and oracle failures so every operation can report a
//! `(status, message, code)` triple without leaking lower-layer detail.
use roster_core::{EntityId, OwnerId, StatusCode};
use thiserror::Error;

use crate::oracle::OracleError;
use crate::repository::StoreError;

pub type Result<T> = std::result::Result<T, DistributionError>;

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("player {0} not found")]
    OwnerNotFound(OwnerId),

    #[error("player {0} already exists")]
    OwnerExists(OwnerId),

    #[error("pokemon {0} not found")]
    EntityNotFound(EntityId),

    #[error("player {owner} already owns pokemon {entity}")]
    AlreadyLinked { owner: OwnerId, entity: EntityId },

    #[error("player {owner} does not own pokemon {entity}")]
    NotLinked { owner: OwnerId, entity: EntityId },

    #[error("player {owner} already holds the maximum of {capacity} pokemon")]
    CapacityExceeded { owner: OwnerId, capacity: usize },

    #[error("trade rejected: player {owner} already owns pokemon {entity}")]
    Conflict { owner: OwnerId, entity: EntityId },

    #[error("pokemon catalog unavailable after {attempts} failed draws")]
    OracleUnavailable { attempts: u32 },

    #[error("pokemon catalog connection failed: {0}")]
    Connection(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DistributionError {
    /// Result code reported for this failure.
    pub fn code(&self) -> StatusCode {
        match self {
            Self::OwnerNotFound(_) | Self::EntityNotFound(_) | Self::NotLinked { .. } => {
                StatusCode::NotFound
            }
            Self::OwnerExists(_)
            | Self::AlreadyLinked { .. }
            | Self::CapacityExceeded { .. }
            | Self::Conflict { .. } => StatusCode::BadRequest,
            Self::OracleUnavailable { .. } | Self::Connection(_) => StatusCode::Unavailable,
            Self::Internal(_) => StatusCode::Internal,
        }
    }

    /// True for failures that indicate a broken store rather than a
    /// rejected request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

impl From<StoreError> for DistributionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::OwnerExists(owner) => Self::OwnerExists(owner),
            StoreError::OwnerNotFound(owner) => Self::OwnerNotFound(owner),
            StoreError::EntityNotFound(entity) => Self::EntityNotFound(entity),
            StoreError::AlreadyLinked { owner, entity } => Self::AlreadyLinked { owner, entity },
            StoreError::NotLinked { owner, entity } => Self::NotLinked { owner, entity },
            StoreError::CapacityExceeded { owner, capacity } => {
                Self::CapacityExceeded { owner, capacity }
            }
            StoreError::TradeConflict { owner, entity } => Self::Conflict { owner, entity },
            fault @ (StoreError::LockPoisoned
            | StoreError::Io(_)
            | StoreError::Serialization(_)
            | StoreError::CorruptedData(_)) => Self::Internal(fault.to_string()),
        }
    }
}

impl From<OracleError> for DistributionError {
    fn from(error: OracleError) -> Self {
        match error {
            OracleError::NotFound(entity) => Self::EntityNotFound(entity),
            OracleError::Connection(reason) => Self::Connection(reason),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
