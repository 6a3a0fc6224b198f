//! Single-entity edits, trades and owner management.

use roster_core::{Entity, EntityId, Owner, OwnerId};

use super::engine::AllocationEngine;
use crate::api::{DistributionError, Result};
use crate::repository::{CatalogRepository, OwnerRepository, OwnershipRepository};

impl AllocationEngine {
    /// Give `owner` one specific entity.
    ///
    /// Capacity and uniqueness are checked before the oracle is consulted
    /// and again inside the link transaction.
    pub async fn add_entity(&self, owner: &OwnerId, id: EntityId, is_rare: bool) -> Result<Entity> {
        let capacity = self.config.capacity;
        if self.store.count_by_owner(owner)? >= capacity {
            return Err(DistributionError::CapacityExceeded {
                owner: owner.clone(),
                capacity,
            });
        }
        if self.store.is_linked(owner, id)? {
            return Err(DistributionError::AlreadyLinked {
                owner: owner.clone(),
                entity: id,
            });
        }

        let entity = self.fetch(id, is_rare).await?;
        self.store.upsert(&entity)?;
        self.store.link(owner, id, is_rare, capacity)?;

        tracing::info!("Added {} ({}) to {}", id, entity.name, owner);
        Ok(entity)
    }

    /// Take one entity away from `owner`.
    pub fn remove_entity(&self, owner: &OwnerId, id: EntityId) -> Result<()> {
        self.store.unlink(owner, id)?;
        tracing::info!("Removed {} from {}", id, owner);
        Ok(())
    }

    /// Replace `old` with `new` in `owner`'s roster.
    ///
    /// Nothing changes unless every step succeeds.
    pub async fn swap_entity(
        &self,
        owner: &OwnerId,
        old: EntityId,
        new: EntityId,
        is_rare: bool,
    ) -> Result<Entity> {
        self.store.read_owner(owner)?;
        if !self.store.is_linked(owner, old)? {
            return Err(DistributionError::NotLinked {
                owner: owner.clone(),
                entity: old,
            });
        }
        if self.store.is_linked(owner, new)? {
            return Err(DistributionError::AlreadyLinked {
                owner: owner.clone(),
                entity: new,
            });
        }

        let entity = self.fetch(new, is_rare).await?;
        self.store.upsert(&entity)?;
        self.store.swap(owner, old, new, is_rare)?;

        tracing::info!("Swapped {} for {} ({}) on {}", old, new, entity.name, owner);
        Ok(entity)
    }

    /// Exchange `sender_entity` for `receiver_entity` between two owners.
    ///
    /// Each copy keeps its rarity. Any failed precondition leaves both
    /// rosters untouched.
    pub fn trade(
        &self,
        sender: &OwnerId,
        sender_entity: EntityId,
        receiver: &OwnerId,
        receiver_entity: EntityId,
    ) -> Result<()> {
        self.store
            .trade(sender, sender_entity, receiver, receiver_entity)?;

        tracing::info!(
            "Traded {} ({}) for {} ({})",
            sender_entity,
            sender,
            receiver_entity,
            receiver
        );
        Ok(())
    }

    /// Register an owner without distributing anything.
    pub fn register_owner(&self, owner: &OwnerId) -> Result<Owner> {
        let record = Owner::new(owner.clone());
        self.store.create_owner(&record)?;
        tracing::info!("Registered owner {}", owner);
        Ok(record)
    }

    /// Delete an owner and its whole roster. Returns how many entities it held.
    pub fn remove_owner(&self, owner: &OwnerId) -> Result<usize> {
        let released = self.store.delete_owner(owner)?;
        tracing::info!("Removed owner {} ({} entities released)", owner, released);
        Ok(released)
    }

    pub fn list_entities(&self, owner: &OwnerId) -> Result<Vec<Entity>> {
        Ok(self.store.list_by_owner(owner)?)
    }

    pub fn list_owners(&self) -> Result<Vec<Owner>> {
        Ok(self.store.list_owners()?)
    }

    /// Every entity catalogued so far.
    pub fn catalog(&self) -> Result<Vec<Entity>> {
        Ok(self.store.list_all()?)
    }

    async fn fetch(&self, id: EntityId, is_rare: bool) -> Result<Entity> {
        self.oracle.fetch_entity(id, is_rare).await.map_err(|e| {
            tracing::warn!("Oracle lookup of {} failed: {}", id, e);
            DistributionError::from(e)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
