//! In-memory [`TransactionalTables`] implementation.

use std::sync::RwLock;

use crate::repository::{Result, RosterTables, StoreError, TransactionalTables};

/// In-memory roster store.
///
/// Thread-safe but not persistent across process restarts. Mutations run in
/// place under the write lock; [`RosterTables`] validates before it writes,
/// so a failed mutation never leaves partial state behind.
pub struct InMemoryRoster {
    tables: RwLock<RosterTables>,
}

impl InMemoryRoster {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_tables(RosterTables::new())
    }

    /// Create a store pre-populated with the given tables.
    pub fn with_tables(tables: RosterTables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for InMemoryRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionalTables for InMemoryRoster {
    fn read<T>(&self, query: impl FnOnce(&RosterTables) -> Result<T>) -> Result<T> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        query(&tables)
    }

    fn transact<T>(&self, mutation: impl FnOnce(&mut RosterTables) -> Result<T>) -> Result<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        mutation(&mut tables)
    }
}
