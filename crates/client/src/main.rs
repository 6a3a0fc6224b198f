//! Roster distribution client binary.
//!
//! Composition root: loads configuration from the environment (and `.env`),
//! builds a [`DistributionService`] through `roster-bootstrap`, runs one
//! subcommand and prints its reply as JSON on stdout. Logs go to stderr.
//!
//! # Examples
//!
//! ```bash
//! # Hand five random pokemon to a new player
//! roster distribute ash
//!
//! # Same, without touching the network or the data file
//! roster --offline --ephemeral distribute ash
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use commands::{Add, Catalog, Distribute, Health, List, Register, Remove, RemovePlayer, Swap, Trade};
use roster_bootstrap::{BootstrapConfig, ServiceBuilder, StorageMode};
use roster_runtime::DistributionService;

/// Distribute and manage pokemon rosters
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Pokemon roster distribution", long_about = None)]
#[command(version)]
struct Cli {
    /// Use the built-in starter catalog instead of PokéAPI
    #[arg(long, global = true)]
    offline: bool,

    /// Keep the roster in memory only
    #[arg(long, global = true, conflicts_with = "data_file")]
    ephemeral: bool,

    /// Snapshot file (overrides ROSTER_DATA_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Register a player without distributing
    Register(Register),

    /// Fill a player's roster with random pokemon
    Distribute(Distribute),

    /// List a player's pokemon
    List(List),

    /// Give a player one specific pokemon
    Add(Add),

    /// Take one pokemon away from a player
    Remove(Remove),

    /// Replace one of a player's pokemon with another
    Swap(Swap),

    /// Exchange one pokemon between two players
    Trade(Trade),

    /// Delete a player and its roster
    RemovePlayer(RemovePlayer),

    /// List every catalogued pokemon
    Catalog(Catalog),

    /// Check the upstream catalog and the store
    Health(Health),
}

impl Cli {
    fn bootstrap_config(&self) -> BootstrapConfig {
        let mut config = BootstrapConfig::from_env();
        if self.offline {
            config.offline = true;
        }
        if let Some(path) = &self.data_file {
            config.storage = StorageMode::File(path.clone());
        }
        if self.ephemeral {
            config.storage = StorageMode::Memory;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.bootstrap_config();
    tracing::debug!("Bootstrap configuration: {:?}", config);

    let service = ServiceBuilder::new(config).build()?;
    run(cli.command, &service).await
}

async fn run(command: Command, service: &DistributionService) -> Result<ExitCode> {
    match command {
        Command::Register(cmd) => cmd.execute(service),
        Command::Distribute(cmd) => cmd.execute(service).await,
        Command::List(cmd) => cmd.execute(service),
        Command::Add(cmd) => cmd.execute(service).await,
        Command::Remove(cmd) => cmd.execute(service),
        Command::Swap(cmd) => cmd.execute(service).await,
        Command::Trade(cmd) => cmd.execute(service),
        Command::RemovePlayer(cmd) => cmd.execute(service),
        Command::Catalog(cmd) => cmd.execute(service),
        Command::Health(cmd) => cmd.execute(service).await,
    }
}
