//! Fixed, in-process entity catalog.
//!
//! Used when running offline and as the deterministic oracle in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use roster_core::{Entity, EntityId};

use super::{EntityOracle, OracleError};

const STARTERS: [&str; 30] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
    "wartortle",
    "blastoise",
    "caterpie",
    "metapod",
    "butterfree",
    "weedle",
    "kakuna",
    "beedrill",
    "pidgey",
    "pidgeotto",
    "pidgeot",
    "rattata",
    "raticate",
    "spearow",
    "fearow",
    "ekans",
    "arbok",
    "pikachu",
    "raichu",
    "sandshrew",
    "sandslash",
    "nidoran-f",
    "nidorina",
];

/// Oracle that answers from a name table held in memory.
///
/// Ids missing from the table resolve to [`OracleError::NotFound`]. The
/// reported upper bound may exceed the highest known id, which lets tests
/// exercise the draw loop's miss handling.
#[derive(Clone, Debug, Default)]
pub struct StaticOracle {
    names: HashMap<EntityId, String>,
    upper_bound: u32,
}

impl StaticOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first thirty national-dex entries, bound to 30.
    pub fn starter_catalog() -> Self {
        STARTERS
            .iter()
            .zip(1u32..)
            .fold(Self::new(), |oracle, (name, id)| {
                oracle.with_entity(EntityId(id), name)
            })
    }

    /// Add a known entity. Grows the upper bound to cover its id.
    pub fn with_entity(mut self, id: EntityId, name: &str) -> Self {
        self.upper_bound = self.upper_bound.max(id.get());
        self.names.insert(id, name.to_string());
        self
    }

    /// Override the reported upper bound.
    pub fn with_upper_bound(mut self, upper_bound: u32) -> Self {
        self.upper_bound = upper_bound;
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[async_trait]
impl EntityOracle for StaticOracle {
    async fn fetch_entity(&self, id: EntityId, is_rare: bool) -> Result<Entity, OracleError> {
        self.names
            .get(&id)
            .map(|name| Entity::new(id, name, is_rare))
            .ok_or(OracleError::NotFound(id))
    }

    async fn fetch_upper_bound(&self) -> u32 {
        self.upper_bound
    }
}
