//! Domain types and rules shared by the roster distribution crates.
//!
//! `roster-core` defines the catalog entity, owner and ownership records,
//! the tunable distribution rules ([`RosterConfig`]), the random draw
//! abstraction used by the allocation engine ([`DrawSource`]) and the
//! transport-agnostic reply types ([`DistributionStatus`], [`ServiceReply`]).
//! Nothing in here performs I/O.
pub mod config;
pub mod draw;
pub mod status;
pub mod types;

pub use config::RosterConfig;
pub use draw::{DrawSource, RandomDraws, ScriptedDraws};
pub use status::{DistributionStatus, ServiceReply, Status, StatusCode};
pub use types::{Entity, EntityId, IdentifierError, Owner, OwnerId, Ownership};
