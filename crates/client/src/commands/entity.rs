//! Commands that edit which pokemon a player holds.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use roster_core::{EntityId, OwnerId};
use roster_runtime::DistributionService;

use super::{parse_entity_id, print_reply};

/// Give a player one specific pokemon
#[derive(Parser)]
pub struct Add {
    #[arg(value_name = "PLAYER")]
    player: OwnerId,

    #[arg(value_name = "POKEMON", value_parser = parse_entity_id)]
    pokemon: EntityId,

    /// Mark this copy as shiny
    #[arg(long)]
    shiny: bool,
}

impl Add {
    pub async fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(
            &service
                .add_entity(&self.player, self.pokemon, self.shiny)
                .await,
        )
    }
}

/// Take one pokemon away from a player
#[derive(Parser)]
pub struct Remove {
    #[arg(value_name = "PLAYER")]
    player: OwnerId,

    #[arg(value_name = "POKEMON", value_parser = parse_entity_id)]
    pokemon: EntityId,
}

impl Remove {
    pub fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.remove_entity(&self.player, self.pokemon))
    }
}

/// Replace one of a player's pokemon with another
#[derive(Parser)]
pub struct Swap {
    #[arg(value_name = "PLAYER")]
    player: OwnerId,

    /// Pokemon to give up
    #[arg(value_name = "OLD", value_parser = parse_entity_id)]
    old: EntityId,

    /// Pokemon to receive
    #[arg(value_name = "NEW", value_parser = parse_entity_id)]
    new: EntityId,

    /// Mark the received copy as shiny
    #[arg(long)]
    shiny: bool,
}

impl Swap {
    pub async fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(
            &service
                .swap_entity(&self.player, self.old, self.new, self.shiny)
                .await,
        )
    }
}

/// Exchange one pokemon between two players
#[derive(Parser)]
pub struct Trade {
    /// Player offering SENDER_POKEMON
    #[arg(value_name = "SENDER")]
    sender: OwnerId,

    #[arg(value_name = "SENDER_POKEMON", value_parser = parse_entity_id)]
    sender_pokemon: EntityId,

    /// Player offering RECEIVER_POKEMON
    #[arg(value_name = "RECEIVER")]
    receiver: OwnerId,

    #[arg(value_name = "RECEIVER_POKEMON", value_parser = parse_entity_id)]
    receiver_pokemon: EntityId,
}

impl Trade {
    pub fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.trade(
            &self.sender,
            self.sender_pokemon,
            &self.receiver,
            self.receiver_pokemon,
        ))
    }
}
