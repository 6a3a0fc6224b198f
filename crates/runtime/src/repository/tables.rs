//! In-process relational tables behind every roster store.
//!
//! [`RosterTables`] holds the three relations (catalog, owners, ownership)
//! and implements their constraints. Every mutating method validates all of
//! its preconditions before touching a row, so a failed call leaves the
//! tables exactly as they were.

use std::collections::{BTreeMap, BTreeSet};

use roster_core::{Entity, EntityId, Owner, OwnerId, Ownership};
use serde::{Deserialize, Serialize};

use super::error::{Result, StoreError};

/// Entities held by one owner, keyed by catalog id, valued by rarity.
type Holdings = BTreeMap<EntityId, bool>;

/// Catalog, owner and ownership relations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterTables {
    entities: BTreeMap<EntityId, Entity>,
    owners: BTreeMap<OwnerId, Holdings>,
}

impl RosterTables {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Insert `entity` unless its id is already catalogued; returns the
    /// stored row either way.
    pub fn upsert_entity(&mut self, entity: &Entity) -> Entity {
        self.entities
            .entry(entity.id)
            .or_insert_with(|| entity.clone())
            .clone()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    // ------------------------------------------------------------------
    // Owners
    // ------------------------------------------------------------------

    pub fn create_owner(&mut self, id: &OwnerId) -> Result<()> {
        if self.owners.contains_key(id) {
            return Err(StoreError::OwnerExists(id.clone()));
        }
        self.owners.insert(id.clone(), Holdings::new());
        Ok(())
    }

    pub fn has_owner(&self, id: &OwnerId) -> bool {
        self.owners.contains_key(id)
    }

    pub fn owners(&self) -> impl Iterator<Item = &OwnerId> {
        self.owners.keys()
    }

    /// Remove an owner and every ownership row it holds.
    ///
    /// Returns the number of ownership rows removed with it.
    pub fn delete_owner(&mut self, id: &OwnerId) -> Result<usize> {
        self.owners
            .remove(id)
            .map(|holdings| holdings.len())
            .ok_or_else(|| StoreError::OwnerNotFound(id.clone()))
    }

    // ------------------------------------------------------------------
    // Ownership
    // ------------------------------------------------------------------

    fn holdings(&self, owner: &OwnerId) -> Result<&Holdings> {
        self.owners
            .get(owner)
            .ok_or_else(|| StoreError::OwnerNotFound(owner.clone()))
    }

    /// Link `entity` to `owner`, enforcing referential integrity, the
    /// per-owner capacity and pair uniqueness.
    pub fn link(
        &mut self,
        owner: &OwnerId,
        entity: EntityId,
        is_rare: bool,
        capacity: usize,
    ) -> Result<()> {
        let held = self
            .owners
            .get_mut(owner)
            .ok_or_else(|| StoreError::OwnerNotFound(owner.clone()))?;

        if !self.entities.contains_key(&entity) {
            return Err(StoreError::EntityNotFound(entity));
        }
        if held.len() >= capacity {
            return Err(StoreError::CapacityExceeded {
                owner: owner.clone(),
                capacity,
            });
        }
        if held.contains_key(&entity) {
            return Err(StoreError::AlreadyLinked {
                owner: owner.clone(),
                entity,
            });
        }

        held.insert(entity, is_rare);
        Ok(())
    }

    pub fn unlink(&mut self, owner: &OwnerId, entity: EntityId) -> Result<()> {
        let held = self
            .owners
            .get_mut(owner)
            .ok_or_else(|| StoreError::OwnerNotFound(owner.clone()))?;

        held.remove(&entity)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotLinked {
                owner: owner.clone(),
                entity,
            })
    }

    pub fn is_linked(&self, owner: &OwnerId, entity: EntityId) -> bool {
        self.owners
            .get(owner)
            .is_some_and(|held| held.contains_key(&entity))
    }

    pub fn count(&self, owner: &OwnerId) -> Result<usize> {
        self.holdings(owner).map(BTreeMap::len)
    }

    /// Join an owner's holdings against the catalog.
    ///
    /// Each returned entity carries the rarity of the owner's copy.
    pub fn roster(&self, owner: &OwnerId) -> Result<Vec<Entity>> {
        self.holdings(owner)?
            .iter()
            .map(|(id, is_rare)| {
                self.entities
                    .get(id)
                    .map(|entity| entity.clone().with_rarity(*is_rare))
                    .ok_or_else(|| {
                        StoreError::CorruptedData(format!(
                            "owner {owner} holds uncatalogued entity {id}"
                        ))
                    })
            })
            .collect()
    }

    /// Replace `old` with `new` in one owner's holdings.
    pub fn swap(
        &mut self,
        owner: &OwnerId,
        old: EntityId,
        new: EntityId,
        is_rare: bool,
    ) -> Result<()> {
        let held = self
            .owners
            .get_mut(owner)
            .ok_or_else(|| StoreError::OwnerNotFound(owner.clone()))?;

        if !held.contains_key(&old) {
            return Err(StoreError::NotLinked {
                owner: owner.clone(),
                entity: old,
            });
        }
        if held.contains_key(&new) {
            return Err(StoreError::AlreadyLinked {
                owner: owner.clone(),
                entity: new,
            });
        }
        if !self.entities.contains_key(&new) {
            return Err(StoreError::EntityNotFound(new));
        }

        held.remove(&old);
        held.insert(new, is_rare);
        Ok(())
    }

    /// Exchange one entity between two owners. Each copy keeps its rarity.
    pub fn trade(
        &mut self,
        sender: &OwnerId,
        sender_entity: EntityId,
        receiver: &OwnerId,
        receiver_entity: EntityId,
    ) -> Result<()> {
        let sender_held = self.holdings(sender)?;
        let receiver_held = self.holdings(receiver)?;

        let sender_rare = *sender_held
            .get(&sender_entity)
            .ok_or_else(|| StoreError::NotLinked {
                owner: sender.clone(),
                entity: sender_entity,
            })?;
        let receiver_rare = *receiver_held
            .get(&receiver_entity)
            .ok_or_else(|| StoreError::NotLinked {
                owner: receiver.clone(),
                entity: receiver_entity,
            })?;

        if sender_held.contains_key(&receiver_entity) {
            return Err(StoreError::TradeConflict {
                owner: sender.clone(),
                entity: receiver_entity,
            });
        }
        if receiver_held.contains_key(&sender_entity) {
            return Err(StoreError::TradeConflict {
                owner: receiver.clone(),
                entity: sender_entity,
            });
        }

        if let Some(held) = self.owners.get_mut(sender) {
            held.remove(&sender_entity);
            held.insert(receiver_entity, receiver_rare);
        }
        if let Some(held) = self.owners.get_mut(receiver) {
            held.remove(&receiver_entity);
            held.insert(sender_entity, sender_rare);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            entities: self.entities.values().cloned().collect(),
            owners: self.owners.keys().cloned().map(Owner::new).collect(),
            ownerships: self
                .owners
                .iter()
                .flat_map(|(owner, held)| {
                    held.iter().map(move |(entity, is_rare)| Ownership {
                        owner: owner.clone(),
                        entity: *entity,
                        is_rare: *is_rare,
                    })
                })
                .collect(),
        }
    }

    /// Rebuild tables from a snapshot, rejecting rows that break integrity.
    pub fn from_snapshot(snapshot: RosterSnapshot) -> Result<Self> {
        let mut tables = Self::new();

        for entity in snapshot.entities {
            if tables.entities.insert(entity.id, entity).is_some() {
                return Err(StoreError::CorruptedData(
                    "duplicate catalog entry".to_string(),
                ));
            }
        }
        for owner in snapshot.owners {
            tables
                .create_owner(&owner.id)
                .map_err(|e| StoreError::CorruptedData(e.to_string()))?;
        }
        for row in snapshot.ownerships {
            tables
                .link(&row.owner, row.entity, row.is_rare, usize::MAX)
                .map_err(|e| StoreError::CorruptedData(e.to_string()))?;
        }

        Ok(tables)
    }
}

/// Flat, relational form of [`RosterTables`] used for persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub entities: Vec<Entity>,
    pub owners: Vec<Owner>,
    pub ownerships: Vec<Ownership>,
}

// ============================================================================
// Tests
// ============================================================================
