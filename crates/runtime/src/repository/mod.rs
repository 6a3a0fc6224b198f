//! Repository layer for roster data.
//!
//! Three relations are persisted:
//! - Catalog: oracle-assigned entity id → name and first-seen rarity
//! - Owners: externally assigned player ids
//! - Ownership: (owner, entity) pairs with per-copy rarity
//!
//! All of them live in one [`RosterTables`] value so that every check a
//! mutation depends on runs inside the same transaction as the write.

mod error;
mod file;
mod memory;
mod tables;
mod traits;

pub use error::{Result, StoreError};
pub use file::FileRoster;
pub use memory::InMemoryRoster;
pub use tables::{RosterSnapshot, RosterTables};
pub use traits::{
    CatalogRepository, OwnerRepository, OwnershipRepository, RosterStore, TransactionalTables,
};
