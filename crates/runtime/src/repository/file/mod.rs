//! File-backed roster store.

mod roster;

pub use roster::FileRoster;
