//! Roster allocation and mutation logic.
//!
//! [`AllocationEngine`] owns the store, oracle and draw source. Initial
//! distribution lives in `engine`; single-entity edits, trades and owner
//! management live in `mutations`.

mod engine;
mod mutations;

pub use engine::{Allocation, AllocationEngine};
