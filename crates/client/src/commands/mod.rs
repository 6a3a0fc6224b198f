//! Subcommand implementations for the roster client.
//!
//! Each command parses its own arguments, calls one service operation and
//! prints the reply.

mod catalog;
mod entity;
mod owner;

pub use catalog::{Catalog, Health};
pub use entity::{Add, Remove, Swap, Trade};
pub use owner::{Distribute, List, Register, RemovePlayer};

use std::process::ExitCode;

use anyhow::{Context, Result};
use roster_core::{EntityId, ServiceReply};
use serde::Serialize;

/// Print `reply` as pretty JSON; failed operations exit non-zero.
fn print_reply<T: Serialize>(reply: &ServiceReply<T>) -> Result<ExitCode> {
    let json = serde_json::to_string_pretty(reply).context("failed to encode reply")?;
    println!("{json}");

    Ok(if reply.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse_entity_id(raw: &str) -> Result<EntityId, String> {
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a pokemon id"))?;
    EntityId::new(value).map_err(|e| e.to_string())
}
