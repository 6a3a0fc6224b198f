//! Player-level commands.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use roster_core::OwnerId;
use roster_runtime::DistributionService;

use super::print_reply;

/// Register a player without distributing
#[derive(Parser)]
pub struct Register {
    /// Player id
    #[arg(value_name = "PLAYER")]
    player: OwnerId,
}

impl Register {
    pub fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.register_owner(&self.player))
    }
}

/// Fill a player's roster with random pokemon
#[derive(Parser)]
pub struct Distribute {
    /// Player id (registered on first use)
    #[arg(value_name = "PLAYER")]
    player: OwnerId,
}

impl Distribute {
    pub async fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.distribute_initial(&self.player).await)
    }
}

/// List a player's pokemon
#[derive(Parser)]
pub struct List {
    /// Player id
    #[arg(value_name = "PLAYER")]
    player: OwnerId,
}

impl List {
    pub fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.list_entities(&self.player))
    }
}

/// Delete a player and its roster
#[derive(Parser)]
pub struct RemovePlayer {
    /// Player id
    #[arg(value_name = "PLAYER")]
    player: OwnerId,
}

impl RemovePlayer {
    pub fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.remove_owner(&self.player))
    }
}
