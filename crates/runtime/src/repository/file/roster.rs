//! JSON-file [`TransactionalTables`] implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::repository::{
    Result, RosterSnapshot, RosterTables, StoreError, TransactionalTables,
};

/// File-backed roster store.
///
/// The whole roster lives in memory and is written out as one JSON
/// [`RosterSnapshot`] after every committed transaction.
///
/// # Transactions
///
/// A mutation runs against a scratch copy of the tables. The copy replaces
/// the live tables only after the snapshot has been written to a temporary
/// file and atomically renamed over the previous one, so a failed write
/// rolls the transaction back.
pub struct FileRoster {
    path: PathBuf,
    tables: RwLock<RosterTables>,
}

impl FileRoster {
    /// Open the store at `path`, loading an existing snapshot if present.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::Io)?;
        }

        let tables = if path.exists() {
            let bytes = fs::read(&path).map_err(StoreError::Io)?;
            let snapshot: RosterSnapshot = serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            let tables = RosterTables::from_snapshot(snapshot)?;
            tracing::debug!("Loaded roster snapshot from {}", path.display());
            tables
        } else {
            RosterTables::new()
        };

        Ok(Self {
            path,
            tables: RwLock::new(tables),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, tables: &RosterTables) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(&tables.snapshot())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Write to temp file
        fs::write(&temp_path, bytes).map_err(StoreError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(StoreError::Io)?;

        tracing::debug!("Saved roster snapshot to {}", self.path.display());
        Ok(())
    }
}

impl TransactionalTables for FileRoster {
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

        let mut scratch = tables.clone();
        let output = mutation(&mut scratch)?;

        if scratch != *tables {
            self.persist(&scratch)?;
            *tables = scratch;
        }

        Ok(output)
    }
}

// ============================================================================
// Tests
// ============================================================================
