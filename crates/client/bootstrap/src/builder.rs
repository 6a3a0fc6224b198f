//! Builds the store, oracle and engine behind a distribution service.
use std::sync::Arc;

use anyhow::{Context, Result};
use roster_core::RandomDraws;
use roster_runtime::{
    AllocationEngine, DistributionService, EntityOracle, FileRoster, InMemoryRoster,
    PokeApiOracle, RosterStore, StaticOracle,
};

use crate::config::{BootstrapConfig, StorageMode};

/// Builder that assembles a [`DistributionService`] from configuration.
pub struct ServiceBuilder {
    config: BootstrapConfig,
    oracle: Option<Arc<dyn EntityOracle>>,
}

impl ServiceBuilder {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            oracle: None,
        }
    }

    /// Provide a custom oracle instead of the configured one.
    pub fn oracle(mut self, oracle: impl EntityOracle + 'static) -> Self {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    pub fn build(self) -> Result<DistributionService> {
        let store = self.build_store()?;
        let oracle = match self.oracle {
            Some(oracle) => oracle,
            None => build_oracle(&self.config)?,
        };

        let draws = match self.config.seed {
            Some(seed) => {
                tracing::debug!("Using seeded draws ({})", seed);
                RandomDraws::seeded(seed)
            }
            None => RandomDraws::from_entropy(),
        };

        let engine =
            AllocationEngine::new(store, oracle, self.config.roster.clone()).with_draws(draws);

        Ok(DistributionService::new(Arc::new(engine)))
    }

    fn build_store(&self) -> Result<Arc<dyn RosterStore>> {
        match &self.config.storage {
            StorageMode::Memory => {
                tracing::debug!("Using in-memory roster store");
                Ok(Arc::new(InMemoryRoster::new()))
            }
            StorageMode::File(path) => {
                let store = FileRoster::open(path).with_context(|| {
                    format!("failed to open roster store at {}", path.display())
                })?;
                tracing::debug!("Using roster store at {}", path.display());
                Ok(Arc::new(store))
            }
        }
    }
}

fn build_oracle(config: &BootstrapConfig) -> Result<Arc<dyn EntityOracle>> {
    if config.offline {
        tracing::info!("Offline mode: using built-in starter catalog");
        return Ok(Arc::new(StaticOracle::starter_catalog()));
    }

    let oracle = PokeApiOracle::new(config.oracle.clone())
        .context("failed to initialize PokéAPI client")?;
    tracing::debug!("Using PokéAPI at {}", config.oracle.base_url);
    Ok(Arc::new(oracle))
}
