//! Initial roster distribution.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use roster_core::{DrawSource, Entity, EntityId, Owner, OwnerId, RandomDraws, RosterConfig};

use crate::api::{DistributionError, Result};
use crate::oracle::EntityOracle;
use crate::repository::{
    CatalogRepository, OwnerRepository, OwnershipRepository, RosterStore, StoreError,
};

/// Entities linked by one initial-distribution call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub owner: OwnerId,
    pub entities: Vec<Entity>,
    /// Draws discarded along the way (duplicates, oracle misses, races).
    pub failed_draws: u32,
}

impl Allocation {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Distributes random catalog entities to owners.
///
/// Every check that guards a write is repeated inside the store
/// transaction, so concurrent callers sharing one engine (or one store)
/// can never push an owner past `config.capacity`.
pub struct AllocationEngine {
    pub(super) store: Arc<dyn RosterStore>,
    pub(super) oracle: Arc<dyn EntityOracle>,
    draws: Mutex<Box<dyn DrawSource>>,
    pub(super) config: RosterConfig,
}

impl AllocationEngine {
    /// Create an engine drawing from OS entropy.
    pub fn new(
        store: Arc<dyn RosterStore>,
        oracle: Arc<dyn EntityOracle>,
        config: RosterConfig,
    ) -> Self {
        Self {
            store,
            oracle,
            draws: Mutex::new(Box::new(RandomDraws::from_entropy())),
            config,
        }
    }

    /// Replace the draw source, e.g. with scripted draws in tests.
    #[must_use]
    pub fn with_draws(mut self, draws: impl DrawSource + 'static) -> Self {
        self.draws = Mutex::new(Box::new(draws));
        self
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RosterStore> {
        &self.store
    }

    pub fn oracle(&self) -> &Arc<dyn EntityOracle> {
        &self.oracle
    }

    /// Fill `owner`'s roster up to capacity with random entities.
    ///
    /// Unknown owners are registered first. Entities linked before a
    /// failure stay linked; a later call only fills the remainder. An id
    /// only counts as drawn once it is linked, so an id whose lookup failed
    /// may be drawn again and succeed.
    ///
    /// # Errors
    ///
    /// - [`DistributionError::CapacityExceeded`] if the roster is already
    ///   full, or was filled by a concurrent caller before anything was
    ///   linked here.
    /// - [`DistributionError::OracleUnavailable`] once more than
    ///   `max_draw_failures` draws have been discarded.
    /// - [`DistributionError::Internal`] on store faults.
    pub async fn allocate_initial(&self, owner: &OwnerId) -> Result<Allocation> {
        self.ensure_owner(owner)?;

        let capacity = self.config.capacity;
        let held = self.store.count_by_owner(owner)?;
        if held >= capacity {
            return Err(DistributionError::CapacityExceeded {
                owner: owner.clone(),
                capacity,
            });
        }

        let upper = self.oracle.fetch_upper_bound().await;
        let wanted = capacity - held;
        let mut drawn: HashSet<EntityId> = HashSet::with_capacity(wanted);
        let mut allocation = Allocation {
            owner: owner.clone(),
            entities: Vec::with_capacity(wanted),
            failed_draws: 0,
        };

        tracing::debug!(
            "Allocating {} entities to {} from [1, {}]",
            wanted,
            owner,
            upper
        );

        while allocation.entities.len() < wanted {
            if allocation.failed_draws > self.config.max_draw_failures {
                tracing::warn!(
                    "Giving up on {} after {} failed draws ({} linked)",
                    owner,
                    allocation.failed_draws,
                    allocation.entities.len()
                );
                return Err(DistributionError::OracleUnavailable {
                    attempts: allocation.failed_draws,
                });
            }

            let (raw, is_rare) = self.draw(upper)?;
            let Ok(id) = EntityId::new(raw) else {
                allocation.failed_draws += 1;
                continue;
            };

            if drawn.contains(&id) || self.store.is_linked(owner, id)? {
                tracing::debug!("Redrawing: {} already drawn for {}", id, owner);
                allocation.failed_draws += 1;
                continue;
            }

            let entity = match self.oracle.fetch_entity(id, is_rare).await {
                Ok(entity) => entity,
                Err(e) => {
                    tracing::warn!("Oracle lookup of {} failed: {}", id, e);
                    allocation.failed_draws += 1;
                    continue;
                }
            };

            self.store.upsert(&entity)?;

            match self.store.link(owner, id, is_rare, capacity) {
                Ok(()) => {
                    tracing::debug!("Linked {} ({}) to {}", id, entity.name, owner);
                    drawn.insert(id);
                    allocation.entities.push(entity.with_rarity(is_rare));
                }
                Err(StoreError::AlreadyLinked { .. }) => {
                    allocation.failed_draws += 1;
                }
                Err(StoreError::CapacityExceeded { .. }) => {
                    tracing::debug!("Roster of {} filled concurrently", owner);
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if allocation.is_empty() {
            return Err(DistributionError::CapacityExceeded {
                owner: owner.clone(),
                capacity,
            });
        }

        tracing::info!(
            "Distributed {} entities to {} ({} failed draws)",
            allocation.len(),
            owner,
            allocation.failed_draws
        );
        Ok(allocation)
    }

    /// Register `owner` unless it already exists.
    fn ensure_owner(&self, owner: &OwnerId) -> Result<()> {
        if self.store.owner_exists(owner)? {
            return Ok(());
        }
        match self.store.create_owner(&Owner::new(owner.clone())) {
            Ok(()) => {
                tracing::info!("Registered owner {}", owner);
                Ok(())
            }
            // Lost a registration race; the owner exists either way.
            Err(StoreError::OwnerExists(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Draw one candidate id and its rarity roll.
    fn draw(&self, upper: u32) -> Result<(u32, bool)> {
        let mut draws = self
            .draws
            .lock()
            .map_err(|_| DistributionError::Internal("draw source lock poisoned".into()))?;
        let id = draws.draw_id(upper);
        let is_rare = draws.roll_rare(self.config.rarity_odds);
        Ok((id, is_rare))
    }
}

// ============================================================================
// Tests
// ============================================================================
