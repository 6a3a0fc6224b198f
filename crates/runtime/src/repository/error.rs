//! Error types raised by roster store implementations.

use roster_core::{EntityId, OwnerId};
use thiserror::Error;

/// Errors surfaced by roster store implementations.
///
/// The first group are expected outcomes of a transaction (constraint
/// violations); the rest are storage faults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("owner {0} already exists")]
    OwnerExists(OwnerId),

    #[error("owner {0} not found")]
    OwnerNotFound(OwnerId),

    #[error("entity {0} not found in catalog")]
    EntityNotFound(EntityId),

    #[error("owner {owner} already holds entity {entity}")]
    AlreadyLinked { owner: OwnerId, entity: EntityId },

    #[error("owner {owner} does not hold entity {entity}")]
    NotLinked { owner: OwnerId, entity: EntityId },

    #[error("owner {owner} already holds {capacity} entities")]
    CapacityExceeded { owner: OwnerId, capacity: usize },

    #[error("trade conflict: owner {owner} already holds entity {entity}")]
    TradeConflict { owner: OwnerId, entity: EntityId },

    #[error("roster store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl StoreError {
    /// True for storage faults as opposed to constraint outcomes.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::LockPoisoned | Self::Io(_) | Self::Serialization(_) | Self::CorruptedData(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
