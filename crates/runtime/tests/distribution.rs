//! End-to-end behavior of the allocation engine and ownership mutations
//! against the in-memory store.
mod common;

use std::sync::Arc;

use common::{DownOracle, FlakyOracle, engine, engine_with, ids, owner};
use roster_core::{Entity, EntityId, RosterConfig, ScriptedDraws, StatusCode};
use roster_runtime::{
    CatalogRepository, DistributionError, DistributionService, InMemoryRoster,
    OwnerRepository, OwnershipRepository, StoreError,
};

// ============================================================================
// Initial distribution
// ============================================================================

#[tokio::test]
async fn scripted_draws_fill_the_roster() {
    let engine = engine(ScriptedDraws::new([1, 2, 3, 4, 5]), RosterConfig::default());
    let p1 = owner("p1");

    let allocation = engine.allocate_initial(&p1).await.unwrap();

    assert_eq!(ids(&allocation.entities), vec![1, 2, 3, 4, 5]);
    assert!(allocation.entities.iter().all(|e| !e.is_rare));
    assert_eq!(allocation.failed_draws, 0);
    assert_eq!(engine.store().count_by_owner(&p1).unwrap(), 5);
    for entity in &allocation.entities {
        assert!(engine.store().is_linked(&p1, entity.id).unwrap());
    }
}

#[tokio::test]
async fn allocation_registers_unknown_owner() {
    let engine = engine(ScriptedDraws::new([7, 8]), RosterConfig::new().with_capacity(2));
    let p2 = owner("p2");
    assert!(!engine.store().owner_exists(&p2).unwrap());

    engine.allocate_initial(&p2).await.unwrap();

    assert!(engine.store().owner_exists(&p2).unwrap());
}

#[tokio::test]
async fn partial_roster_is_topped_up() {
    let engine = engine(
        ScriptedDraws::new([10, 11, 12]),
        RosterConfig::new().with_capacity(3),
    );
    let p1 = owner("p1");
    engine.register_owner(&p1).unwrap();
    engine.add_entity(&p1, EntityId(11), false).await.unwrap();

    let allocation = engine.allocate_initial(&p1).await.unwrap();

    // 11 is already held, so that draw is discarded.
    assert_eq!(ids(&allocation.entities), vec![10, 12]);
    assert_eq!(allocation.failed_draws, 1);
    assert_eq!(engine.store().count_by_owner(&p1).unwrap(), 3);
}

#[tokio::test]
async fn oracle_misses_are_redrawn() {
    // The bound reaches past the catalogued ids, so 40 and 41 miss.
    let oracle = roster_runtime::StaticOracle::starter_catalog().with_upper_bound(50);
    let engine = engine_with(
        Arc::new(InMemoryRoster::new()),
        Arc::new(oracle),
        ScriptedDraws::new([40, 1, 41, 2]),
        RosterConfig::new().with_capacity(2),
    );

    let allocation = engine.allocate_initial(&owner("p1")).await.unwrap();

    assert_eq!(ids(&allocation.entities), vec![1, 2]);
    assert_eq!(allocation.failed_draws, 2);
}

#[tokio::test]
async fn transient_oracle_failures_are_retried() {
    let engine = engine_with(
        Arc::new(InMemoryRoster::new()),
        Arc::new(FlakyOracle::new(3)),
        ScriptedDraws::new(1..=30),
        RosterConfig::default(),
    );

    let allocation = engine.allocate_initial(&owner("p1")).await.unwrap();

    assert_eq!(allocation.len(), 5);
    assert_eq!(allocation.failed_draws, 3);
    assert_eq!(ids(&allocation.entities), vec![4, 5, 6, 7, 8]);
}

#[tokio::test]
async fn failed_lookup_does_not_block_a_redraw() {
    // The first lookup of 1 fails; the second draw of 1 must still be tried.
    let engine = engine_with(
        Arc::new(InMemoryRoster::new()),
        Arc::new(FlakyOracle::new(1)),
        ScriptedDraws::new([1, 1, 2]),
        RosterConfig::new().with_capacity(1),
    );

    let allocation = engine.allocate_initial(&owner("p1")).await.unwrap();

    assert_eq!(ids(&allocation.entities), vec![1]);
    assert_eq!(allocation.failed_draws, 1);
}

#[tokio::test]
async fn sustained_oracle_failure_reports_unavailable() {
    let engine = engine_with(
        Arc::new(InMemoryRoster::new()),
        Arc::new(DownOracle),
        ScriptedDraws::new(1..=1000),
        RosterConfig::new().with_max_draw_failures(10),
    );
    let p1 = owner("p1");

    let err = engine.allocate_initial(&p1).await.unwrap_err();

    assert!(matches!(err, DistributionError::OracleUnavailable { attempts: 11 }));
    assert_eq!(err.code(), StatusCode::Unavailable);
    assert_eq!(engine.store().count_by_owner(&p1).unwrap(), 0);
    assert!(engine.catalog().unwrap().is_empty());
}

#[tokio::test]
async fn rare_rolls_are_recorded_per_copy() {
    let engine = engine(
        ScriptedDraws::new([25, 26]).with_rarity([true, false]),
        RosterConfig::new().with_capacity(2),
    );
    let p1 = owner("p1");
    let p2 = owner("p2");
    engine.allocate_initial(&p1).await.unwrap();

    // p2 draws 25 again, this time without the rare roll.
    engine.register_owner(&p2).unwrap();
    engine.add_entity(&p2, EntityId(25), false).await.unwrap();

    let p1_pikachu = &engine.list_entities(&p1).unwrap()[0];
    let p2_pikachu = &engine.list_entities(&p2).unwrap()[0];
    assert!(p1_pikachu.is_rare);
    assert!(!p2_pikachu.is_rare);
    // The catalog keeps the first-seen flag.
    assert!(engine.store().get(EntityId(25)).unwrap().is_rare);
}

// ============================================================================
// Store constraints
// ============================================================================

#[test]
fn upsert_keeps_the_first_row() {
    let store = InMemoryRoster::new();
    let first = store
        .upsert(&Entity::new(EntityId(1), "bulbasaur", false))
        .unwrap();
    let second = store
        .upsert(&Entity::new(EntityId(1), "not-bulbasaur", true))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(store.get(EntityId(1)).unwrap().name, "bulbasaur");
    assert!(!store.get(EntityId(1)).unwrap().is_rare);
}

#[test]
fn duplicate_link_is_rejected() {
    let store = InMemoryRoster::new();
    let p1 = owner("p1");
    store.create_owner(&roster_core::Owner::new(p1.clone())).unwrap();
    store
        .upsert(&Entity::new(EntityId(7), "squirtle", false))
        .unwrap();

    store.link(&p1, EntityId(7), false, 5).unwrap();
    let err = store.link(&p1, EntityId(7), false, 5).unwrap_err();

    assert!(matches!(err, StoreError::AlreadyLinked { .. }));
    assert_eq!(store.count_by_owner(&p1).unwrap(), 1);
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn add_on_full_roster_is_rejected() {
    let engine = engine(ScriptedDraws::new([1, 2, 3, 4, 5]), RosterConfig::default());
    let p1 = owner("p1");
    engine.allocate_initial(&p1).await.unwrap();

    let err = engine.add_entity(&p1, EntityId(6), false).await.unwrap_err();

    assert!(matches!(err, DistributionError::CapacityExceeded { capacity: 5, .. }));
    assert_eq!(engine.store().count_by_owner(&p1).unwrap(), 5);
    assert!(!engine.store().entity_exists(EntityId(6)).unwrap());
}

#[tokio::test]
async fn add_of_held_entity_is_rejected() {
    let engine = engine(ScriptedDraws::new([7]), RosterConfig::default());
    let p1 = owner("p1");
    engine.register_owner(&p1).unwrap();
    engine.add_entity(&p1, EntityId(7), false).await.unwrap();

    let err = engine.add_entity(&p1, EntityId(7), true).await.unwrap_err();

    assert!(matches!(err, DistributionError::AlreadyLinked { .. }));
    assert_eq!(ids(&engine.list_entities(&p1).unwrap()), vec![7]);
}

#[tokio::test]
async fn swap_onto_held_entity_leaves_source_linked() {
    let engine = engine(
        ScriptedDraws::new([1, 2]),
        RosterConfig::new().with_capacity(2),
    );
    let p1 = owner("p1");
    engine.allocate_initial(&p1).await.unwrap();

    let err = engine
        .swap_entity(&p1, EntityId(1), EntityId(2), false)
        .await
        .unwrap_err();

    assert!(matches!(err, DistributionError::AlreadyLinked { .. }));
    assert!(engine.store().is_linked(&p1, EntityId(1)).unwrap());
    assert_eq!(ids(&engine.list_entities(&p1).unwrap()), vec![1, 2]);
}

#[tokio::test]
async fn swap_with_oracle_down_changes_nothing() {
    let store = Arc::new(InMemoryRoster::new());
    let seeded = engine_with(
        store.clone(),
        Arc::new(roster_runtime::StaticOracle::starter_catalog()),
        ScriptedDraws::new([1]),
        RosterConfig::new().with_capacity(1),
    );
    let p1 = owner("p1");
    seeded.allocate_initial(&p1).await.unwrap();

    let offline = engine_with(
        store,
        Arc::new(DownOracle),
        ScriptedDraws::default(),
        RosterConfig::new().with_capacity(1),
    );
    let err = offline
        .swap_entity(&p1, EntityId(1), EntityId(2), false)
        .await
        .unwrap_err();

    assert!(matches!(err, DistributionError::Connection(_)));
    assert_eq!(ids(&offline.list_entities(&p1).unwrap()), vec![1]);
}

#[tokio::test]
async fn trade_moves_copies_with_their_rarity() {
    let engine = engine(
        ScriptedDraws::new([1, 2]).with_rarity([true, false]),
        RosterConfig::new().with_capacity(1),
    );
    let (alice, bob) = (owner("alice"), owner("bob"));
    engine.allocate_initial(&alice).await.unwrap();
    engine.allocate_initial(&bob).await.unwrap();

    engine
        .trade(&alice, EntityId(1), &bob, EntityId(2))
        .unwrap();

    let alice_holds = engine.list_entities(&alice).unwrap();
    let bob_holds = engine.list_entities(&bob).unwrap();
    assert_eq!((alice_holds[0].id, alice_holds[0].is_rare), (EntityId(2), false));
    assert_eq!((bob_holds[0].id, bob_holds[0].is_rare), (EntityId(1), true));
}

#[tokio::test]
async fn trade_of_unheld_entity_is_not_found() {
    let engine = engine(
        ScriptedDraws::new([1, 2]),
        RosterConfig::new().with_capacity(1),
    );
    let (alice, bob) = (owner("alice"), owner("bob"));
    engine.allocate_initial(&alice).await.unwrap();
    engine.allocate_initial(&bob).await.unwrap();

    let err = engine
        .trade(&alice, EntityId(9), &bob, EntityId(2))
        .unwrap_err();

    assert!(matches!(err, DistributionError::NotLinked { .. }));
    assert_eq!(err.code(), StatusCode::NotFound);
    assert_eq!(ids(&engine.list_entities(&alice).unwrap()), vec![1]);
    assert_eq!(ids(&engine.list_entities(&bob).unwrap()), vec![2]);
}

#[tokio::test]
async fn trade_into_a_duplicate_is_a_conflict() {
    let engine = engine(
        ScriptedDraws::new([1, 2, 2, 3]),
        RosterConfig::new().with_capacity(2),
    );
    let (alice, bob) = (owner("alice"), owner("bob"));
    engine.allocate_initial(&alice).await.unwrap();
    engine.allocate_initial(&bob).await.unwrap();

    // alice holds {1, 2}, bob holds {2, 3}: alice would receive a second 2.
    let err = engine
        .trade(&alice, EntityId(1), &bob, EntityId(2))
        .unwrap_err();

    assert!(matches!(err, DistributionError::Conflict { .. }));
    assert_eq!(err.code(), StatusCode::BadRequest);
    assert_eq!(ids(&engine.list_entities(&alice).unwrap()), vec![1, 2]);
    assert_eq!(ids(&engine.list_entities(&bob).unwrap()), vec![2, 3]);
}

// ============================================================================
// Service replies
// ============================================================================

#[tokio::test]
async fn service_serializes_status_triple() {
    let engine = engine(ScriptedDraws::new([1]), RosterConfig::new().with_capacity(1));
    let service = DistributionService::new(Arc::new(engine));

    let reply = service.distribute_initial(&owner("p1")).await;
    let json = serde_json::to_value(&reply).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["code"], 201);
    assert_eq!(json["payload"][0]["name"], "bulbasaur");

    let reply = service.distribute_initial(&owner("p1")).await;
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], 400);
}
