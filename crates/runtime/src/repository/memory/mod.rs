//! In-memory roster store for tests and development.

mod roster;

pub use roster::InMemoryRoster;
