//! Runtime for distributing oracle-drawn entities to registered owners.
//!
//! This crate wires together the entity oracle, the roster stores and the
//! allocation engine into a transport-agnostic service. Consumers build a
//! [`DistributionService`] (usually through `roster-bootstrap`) and map its
//! replies onto their own transport.
//!
//! Modules are organized by responsibility:
//! - [`oracle`] talks to the upstream entity catalog (PokéAPI)
//! - [`repository`] holds the catalog, owner and ownership stores
//! - [`distribution`] hosts the allocation engine and ownership mutations
//! - [`api`] exposes the error taxonomy and the service façade
pub mod api;
pub mod distribution;
pub mod oracle;
pub mod repository;

pub use api::{DistributionError, DistributionService, HealthReport, Result};
pub use distribution::{Allocation, AllocationEngine};
pub use oracle::{
    EntityOracle, OracleConfig, OracleError, PokeApiOracle, StaticOracle, FALLBACK_UPPER_BOUND,
};
pub use repository::{
    CatalogRepository, FileRoster, InMemoryRoster, OwnerRepository, OwnershipRepository,
    RosterSnapshot, RosterStore, RosterTables, StoreError, TransactionalTables,
};
