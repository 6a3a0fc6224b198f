//! Access to the upstream entity catalog.
//!
//! The oracle is the only authority on which entity ids exist and what they
//! are called. It is read-only and unreliable: lookups may miss or fail, and
//! callers are expected to redraw rather than abort. Rarity is not an oracle
//! concept; the caller's flag is attached to whatever the oracle returns.
mod catalog;
mod pokeapi;

use async_trait::async_trait;
use roster_core::{Entity, EntityId};
use thiserror::Error;

pub use catalog::StaticOracle;
pub use pokeapi::{FALLBACK_UPPER_BOUND, OracleConfig, PokeApiOracle};

/// Failure modes of an entity lookup.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("entity {0} not found by oracle")]
    NotFound(EntityId),

    #[error("oracle connection failed: {0}")]
    Connection(String),
}

/// Read-only source of entity metadata.
#[async_trait]
pub trait EntityOracle: Send + Sync {
    /// Resolve an entity id, attaching the caller-supplied rarity flag.
    async fn fetch_entity(&self, id: EntityId, is_rare: bool) -> Result<Entity, OracleError>;

    /// Highest valid entity id. Never fails; implementations fall back to a
    /// fixed bound when the upstream cannot be reached.
    async fn fetch_upper_bound(&self) -> u32;

    /// Cheap connectivity check.
    async fn probe(&self) -> bool {
        true
    }
}
