//! Read-only service commands.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use roster_runtime::DistributionService;

use super::print_reply;

/// List every catalogued pokemon
#[derive(Parser)]
pub struct Catalog {}

impl Catalog {
    pub fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.catalog())
    }
}

/// Check the upstream catalog and the store
#[derive(Parser)]
pub struct Health {}

impl Health {
    pub async fn execute(self, service: &DistributionService) -> Result<ExitCode> {
        print_reply(&service.health().await)
    }
}
