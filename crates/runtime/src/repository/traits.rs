//! Store contracts for the catalog, owner and ownership relations.
//!
//! Every concrete store only has to implement [`TransactionalTables`]; the
//! three relation-level traits are provided for it by blanket impls, so all
//! of them share one transactional boundary.

use roster_core::{Entity, EntityId, Owner, OwnerId};

use super::error::{Result, StoreError};
use super::tables::RosterTables;

/// Lock-scoped access to the roster tables.
///
/// `transact` runs its closure under exclusive access. If the closure fails,
/// or the store cannot make the result durable, no change is visible to any
/// other caller.
pub trait TransactionalTables: Send + Sync {
    /// Run a read-only query against a consistent view of the tables.
    fn read<T>(&self, query: impl FnOnce(&RosterTables) -> Result<T>) -> Result<T>;

    /// Run a mutation as a single transaction.
    fn transact<T>(&self, mutation: impl FnOnce(&mut RosterTables) -> Result<T>) -> Result<T>;
}

/// Durable mapping from entity id to canonical metadata.
pub trait CatalogRepository: Send + Sync {
    /// Insert the entity if its id is unknown; otherwise return the stored
    /// row unchanged.
    fn upsert(&self, entity: &Entity) -> Result<Entity>;

    /// Load a catalog row.
    fn get(&self, id: EntityId) -> Result<Entity>;

    /// Check if a catalog row exists
    fn entity_exists(&self, id: EntityId) -> Result<bool>;

    /// All catalog rows ordered by id.
    fn list_all(&self) -> Result<Vec<Entity>>;
}

/// Durable set of registered owners.
pub trait OwnerRepository: Send + Sync {
    /// Register an owner. Never upserts: an existing id is rejected.
    fn create_owner(&self, owner: &Owner) -> Result<()>;

    fn read_owner(&self, id: &OwnerId) -> Result<Owner>;

    /// Delete an owner together with all of its ownership rows.
    ///
    /// Returns the number of ownership rows removed.
    fn delete_owner(&self, id: &OwnerId) -> Result<usize>;

    fn owner_exists(&self, id: &OwnerId) -> Result<bool>;

    fn list_owners(&self) -> Result<Vec<Owner>>;
}

/// Many-to-many relation between owners and catalog entities.
///
/// Existence, uniqueness and capacity checks happen inside the same
/// transaction as the write they guard.
pub trait OwnershipRepository: Send + Sync {
    /// Link an entity to an owner.
    fn link(&self, owner: &OwnerId, entity: EntityId, is_rare: bool, capacity: usize)
    -> Result<()>;

    /// Remove one ownership row.
    fn unlink(&self, owner: &OwnerId, entity: EntityId) -> Result<()>;

    /// Catalog rows held by the owner, carrying the owner's rarity flags.
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Entity>>;

    fn is_linked(&self, owner: &OwnerId, entity: EntityId) -> Result<bool>;

    fn count_by_owner(&self, owner: &OwnerId) -> Result<usize>;

    /// Atomically replace `old` with `new` in one owner's holdings.
    fn swap(&self, owner: &OwnerId, old: EntityId, new: EntityId, is_rare: bool) -> Result<()>;

    /// Atomically exchange one entity between two owners.
    fn trade(
        &self,
        sender: &OwnerId,
        sender_entity: EntityId,
        receiver: &OwnerId,
        receiver_entity: EntityId,
    ) -> Result<()>;
}

/// Everything the allocation engine needs from storage.
pub trait RosterStore: CatalogRepository + OwnerRepository + OwnershipRepository {}

impl<T: CatalogRepository + OwnerRepository + OwnershipRepository> RosterStore for T {}

impl<T: TransactionalTables> CatalogRepository for T {
    fn upsert(&self, entity: &Entity) -> Result<Entity> {
        self.transact(|tables| Ok(tables.upsert_entity(entity)))
    }

    fn get(&self, id: EntityId) -> Result<Entity> {
        self.read(|tables| {
            tables
                .entity(id)
                .cloned()
                .ok_or(StoreError::EntityNotFound(id))
        })
    }

    fn entity_exists(&self, id: EntityId) -> Result<bool> {
        self.read(|tables| Ok(tables.entity(id).is_some()))
    }

    fn list_all(&self) -> Result<Vec<Entity>> {
        self.read(|tables| Ok(tables.entities().cloned().collect()))
    }
}

impl<T: TransactionalTables> OwnerRepository for T {
    fn create_owner(&self, owner: &Owner) -> Result<()> {
        self.transact(|tables| tables.create_owner(&owner.id))
    }

    fn read_owner(&self, id: &OwnerId) -> Result<Owner> {
        self.read(|tables| {
            if tables.has_owner(id) {
                Ok(Owner::new(id.clone()))
            } else {
                Err(StoreError::OwnerNotFound(id.clone()))
            }
        })
    }

    fn delete_owner(&self, id: &OwnerId) -> Result<usize> {
        self.transact(|tables| tables.delete_owner(id))
    }

    fn owner_exists(&self, id: &OwnerId) -> Result<bool> {
        self.read(|tables| Ok(tables.has_owner(id)))
    }

    fn list_owners(&self) -> Result<Vec<Owner>> {
        self.read(|tables| Ok(tables.owners().cloned().map(Owner::new).collect()))
    }
}

impl<T: TransactionalTables> OwnershipRepository for T {
    fn link(
        &self,
        owner: &OwnerId,
        entity: EntityId,
        is_rare: bool,
        capacity: usize,
    ) -> Result<()> {
        self.transact(|tables| tables.link(owner, entity, is_rare, capacity))
    }

    fn unlink(&self, owner: &OwnerId, entity: EntityId) -> Result<()> {
        self.transact(|tables| tables.unlink(owner, entity))
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Entity>> {
        self.read(|tables| tables.roster(owner))
    }

    fn is_linked(&self, owner: &OwnerId, entity: EntityId) -> Result<bool> {
        self.read(|tables| Ok(tables.is_linked(owner, entity)))
    }

    fn count_by_owner(&self, owner: &OwnerId) -> Result<usize> {
        self.read(|tables| tables.count(owner))
    }

    fn swap(&self, owner: &OwnerId, old: EntityId, new: EntityId, is_rare: bool) -> Result<()> {
        self.transact(|tables| tables.swap(owner, old, new, is_rare))
    }

    fn trade(
        &self,
        sender: &OwnerId,
        sender_entity: EntityId,
        receiver: &OwnerId,
        receiver_entity: EntityId,
    ) -> Result<()> {
        self.transact(|tables| tables.trade(sender, sender_entity, receiver, receiver_entity))
    }
}

// ============================================================================
// Tests
// ============================================================================
