//! Shared fixtures for the runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use roster_core::{DrawSource, Entity, EntityId, OwnerId, RosterConfig};
use roster_runtime::{
    AllocationEngine, EntityOracle, InMemoryRoster, OracleError, RosterStore, StaticOracle,
};

pub fn owner(raw: &str) -> OwnerId {
    OwnerId::new(raw).expect("valid owner id")
}

pub fn ids(entities: &[Entity]) -> Vec<u32> {
    entities.iter().map(|e| e.id.get()).collect()
}

/// Engine over a fresh in-memory store and the starter catalog.
pub fn engine(draws: impl DrawSource + 'static, config: RosterConfig) -> AllocationEngine {
    engine_with(
        Arc::new(InMemoryRoster::new()),
        Arc::new(StaticOracle::starter_catalog()),
        draws,
        config,
    )
}

pub fn engine_with(
    store: Arc<dyn RosterStore>,
    oracle: Arc<dyn EntityOracle>,
    draws: impl DrawSource + 'static,
    config: RosterConfig,
) -> AllocationEngine {
    AllocationEngine::new(store, oracle, config).with_draws(draws)
}

/// Oracle whose upstream is permanently unreachable.
pub struct DownOracle;

#[async_trait]
impl EntityOracle for DownOracle {
    async fn fetch_entity(&self, _id: EntityId, _is_rare: bool) -> Result<Entity, OracleError> {
        Err(OracleError::Connection("connection refused".into()))
    }

    async fn fetch_upper_bound(&self) -> u32 {
        roster_runtime::FALLBACK_UPPER_BOUND
    }

    async fn probe(&self) -> bool {
        false
    }
}

/// Fails the first `failures` lookups, then answers from the starter catalog.
pub struct FlakyOracle {
    inner: StaticOracle,
    failures_left: AtomicU32,
}

impl FlakyOracle {
    pub fn new(failures: u32) -> Self {
        Self {
            inner: StaticOracle::starter_catalog(),
            failures_left: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl EntityOracle for FlakyOracle {
    async fn fetch_entity(&self, id: EntityId, is_rare: bool) -> Result<Entity, OracleError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(OracleError::Connection("request timed out".into()));
        }
        self.inner.fetch_entity(id, is_rare).await
    }

    async fn fetch_upper_bound(&self) -> u32 {
        self.inner.fetch_upper_bound().await
    }
}
