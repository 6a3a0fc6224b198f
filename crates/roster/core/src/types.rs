//! Catalog entities, owners and the ownership relation between them.
use std::fmt;

use thiserror::Error;

/// Errors raised when constructing identifiers from untrusted input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("entity ids start at 1")]
    ZeroEntityId,

    #[error("owner id must not be blank")]
    BlankOwnerId,
}

/// Catalog identifier assigned by the upstream oracle (the Pokédex number).
///
/// Ids are never generated locally: re-drawing the same number always
/// resolves to the same catalog row.
///
/// [`EntityId::new`] (and `TryFrom<u32>`, which deserialization goes
/// through) is the checked constructor. Building the tuple directly skips
/// the zero check and is meant for literals known to be valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Validates a raw oracle id.
    pub const fn new(raw: u32) -> Result<Self, IdentifierError> {
        if raw == 0 {
            return Err(IdentifierError::ZeroEntityId);
        }
        Ok(Self(raw))
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for EntityId {
    type Error = IdentifierError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Externally assigned player identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct OwnerId(String);

impl OwnerId {
    /// Validates and trims a caller-supplied identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::BlankOwnerId);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for OwnerId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// One catalog item as seen by a caller.
///
/// In the catalog table `is_rare` is the flag recorded on first insertion.
/// When an entity is returned as part of an owner's roster, `is_rare`
/// carries the rarity of that owner's copy instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub is_rare: bool,
}

impl Entity {
    /// Longest name the catalog stores.
    pub const MAX_NAME_LEN: usize = 25;

    /// Name recorded when the oracle does not report one.
    pub const UNKNOWN_NAME: &'static str = "unknown";

    /// Builds an entity, normalizing the name to the catalog column rules.
    pub fn new(id: EntityId, name: &str, is_rare: bool) -> Self {
        Self {
            id,
            name: normalize_name(name),
            is_rare,
        }
    }

    /// Same entity with a different rarity flag.
    #[must_use]
    pub fn with_rarity(mut self, is_rare: bool) -> Self {
        self.is_rare = is_rare;
        self
    }
}

fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Entity::UNKNOWN_NAME.to_owned();
    }
    trimmed.chars().take(Entity::MAX_NAME_LEN).collect()
}

/// A registered player.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Owner {
    pub id: OwnerId,
}

impl Owner {
    pub fn new(id: OwnerId) -> Self {
        Self { id }
    }
}

/// One unit of possession: `owner` holds a copy of catalog entity `entity`.
///
/// Rarity lives here so that two owners of the same entity id keep
/// independent flags.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ownership {
    pub owner: OwnerId,
    pub entity: EntityId,
    pub is_rare: bool,
}
