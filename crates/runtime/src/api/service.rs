//! Status-reporting façade over the allocation engine.
//!
//! [`DistributionService`] never returns `Err`. Each call reports a
//! [`DistributionStatus`] triple plus a payload, which front ends can print
//! or map onto their transport unchanged.
use std::sync::Arc;

use roster_core::{DistributionStatus, Entity, EntityId, Owner, OwnerId, ServiceReply, StatusCode};
use serde::Serialize;

use super::errors::{DistributionError, Result};
use crate::distribution::AllocationEngine;

/// Payload of [`DistributionService::health`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub oracle_reachable: bool,
    pub store_readable: bool,
    pub owners: usize,
    pub catalogued: usize,
}

/// Cloneable entry point for every distribution operation.
#[derive(Clone)]
pub struct DistributionService {
    engine: Arc<AllocationEngine>,
}

impl DistributionService {
    pub fn new(engine: Arc<AllocationEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<AllocationEngine> {
        &self.engine
    }

    /// Fill an owner's roster, registering the owner if needed.
    ///
    /// A success can be partial: if a concurrent caller fills the roster
    /// mid-call, the reply is still `Created` and carries only the entities
    /// this call linked.
    pub async fn distribute_initial(&self, owner: &OwnerId) -> ServiceReply<Vec<Entity>> {
        let result = self
            .engine
            .allocate_initial(owner)
            .await
            .map(|allocation| allocation.entities);
        reply("distribute", result, StatusCode::Created, |entities| {
            format!("{} pokemon distributed to player {owner}", entities.len())
        })
    }

    pub fn list_entities(&self, owner: &OwnerId) -> ServiceReply<Vec<Entity>> {
        let result = self.engine.list_entities(owner);
        reply("list", result, StatusCode::Ok, |entities| {
            format!("player {owner} holds {} pokemon", entities.len())
        })
    }

    pub async fn add_entity(
        &self,
        owner: &OwnerId,
        id: EntityId,
        is_rare: bool,
    ) -> ServiceReply<Option<Entity>> {
        let result = self.engine.add_entity(owner, id, is_rare).await.map(Some);
        reply("add", result, StatusCode::Created, |_| {
            format!("pokemon {id} added to player {owner}")
        })
    }

    pub fn remove_entity(&self, owner: &OwnerId, id: EntityId) -> ServiceReply<()> {
        let result = self.engine.remove_entity(owner, id);
        reply("remove", result, StatusCode::Ok, |_| {
            format!("pokemon {id} removed from player {owner}")
        })
    }

    pub async fn swap_entity(
        &self,
        owner: &OwnerId,
        old: EntityId,
        new: EntityId,
        is_rare: bool,
    ) -> ServiceReply<Option<Entity>> {
        let result = self
            .engine
            .swap_entity(owner, old, new, is_rare)
            .await
            .map(Some);
        reply("swap", result, StatusCode::Ok, |_| {
            format!("pokemon {old} swapped for {new} on player {owner}")
        })
    }

    pub fn trade(
        &self,
        sender: &OwnerId,
        sender_entity: EntityId,
        receiver: &OwnerId,
        receiver_entity: EntityId,
    ) -> ServiceReply<()> {
        let result = self
            .engine
            .trade(sender, sender_entity, receiver, receiver_entity);
        reply("trade", result, StatusCode::Ok, |_| {
            format!(
                "player {sender} traded pokemon {sender_entity} for pokemon {receiver_entity} of player {receiver}"
            )
        })
    }

    pub fn register_owner(&self, owner: &OwnerId) -> ServiceReply<Option<Owner>> {
        let result = self.engine.register_owner(owner).map(Some);
        reply("register", result, StatusCode::Created, |_| {
            format!("player {owner} registered")
        })
    }

    /// Payload is the number of entities released with the owner.
    pub fn remove_owner(&self, owner: &OwnerId) -> ServiceReply<usize> {
        let result = self.engine.remove_owner(owner);
        reply("remove-player", result, StatusCode::Ok, |released| {
            format!("player {owner} removed with {released} pokemon")
        })
    }

    pub fn catalog(&self) -> ServiceReply<Vec<Entity>> {
        let result = self.engine.catalog();
        reply("catalog", result, StatusCode::Ok, |entities| {
            format!("{} pokemon catalogued", entities.len())
        })
    }

    /// Probe the oracle and the store.
    pub async fn health(&self) -> ServiceReply<HealthReport> {
        let oracle_reachable = self.engine.oracle().probe().await;
        let owners = self.engine.list_owners();
        let catalog = self.engine.catalog();

        let report = HealthReport {
            oracle_reachable,
            store_readable: owners.is_ok() && catalog.is_ok(),
            owners: owners.map(|o| o.len()).unwrap_or_default(),
            catalogued: catalog.map(|c| c.len()).unwrap_or_default(),
        };

        let status = match (report.oracle_reachable, report.store_readable) {
            (true, true) => DistributionStatus::success(StatusCode::Ok, "service healthy"),
            (false, _) => {
                tracing::warn!("Health check: oracle unreachable");
                DistributionStatus::error(StatusCode::Unavailable, "pokemon catalog unreachable")
            }
            (true, false) => {
                tracing::error!("Health check: roster store unreadable");
                DistributionStatus::error(StatusCode::Internal, "roster store unreadable")
            }
        };
        ServiceReply::new(status, report)
    }
}

/// Convert an operation result into a reply, logging failures by severity.
fn reply<T: Default>(
    operation: &str,
    result: Result<T>,
    success: StatusCode,
    message: impl FnOnce(&T) -> String,
) -> ServiceReply<T> {
    match result {
        Ok(payload) => {
            let status = DistributionStatus::success(success, message(&payload));
            ServiceReply::new(status, payload)
        }
        Err(e) => {
            log_failure(operation, &e);
            ServiceReply::new(DistributionStatus::error(e.code(), e.to_string()), T::default())
        }
    }
}

fn log_failure(operation: &str, error: &DistributionError) {
    match error.code() {
        StatusCode::Internal => tracing::error!("{} failed: {}", operation, error),
        StatusCode::Unavailable => tracing::warn!("{} failed: {}", operation, error),
        _ => tracing::debug!("{} rejected: {}", operation, error),
    }
}

// ============================================================================
// Tests
// ============================================================================
