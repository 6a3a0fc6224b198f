//! Service configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use roster_core::RosterConfig;
use roster_runtime::OracleConfig;

/// Where the roster is kept between invocations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageMode {
    /// Nothing is persisted.
    Memory,
    /// JSON snapshot at the given path.
    File(PathBuf),
}

/// Configuration required to bootstrap a distribution service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub roster: RosterConfig,
    pub oracle: OracleConfig,
    pub storage: StorageMode,
    /// Answer from the built-in starter catalog instead of PokéAPI.
    pub offline: bool,
    /// Fixed RNG seed for reproducible draws.
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            roster: RosterConfig::default(),
            oracle: OracleConfig::default(),
            storage: StorageMode::File(default_data_file()),
            offline: false,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ROSTER_CAPACITY` - Entities per owner (default: 5)
    /// - `ROSTER_SHINY_ODDS` - One rare copy in N draws (default: 8192)
    /// - `ROSTER_MAX_DRAW_FAILURES` - Discarded draws tolerated per allocation (default: 64)
    /// - `POKEAPI_BASE_URL` - Upstream API root (default: `https://pokeapi.co/api/v2/`)
    /// - `POKEAPI_TIMEOUT_SECS` - Per-request timeout (default: 5)
    /// - `ROSTER_DATA_FILE` - Snapshot path (default: platform data directory)
    /// - `ROSTER_EPHEMERAL` - Keep the roster in memory only (default: false)
    /// - `ROSTER_OFFLINE` - Use the built-in starter catalog (default: false)
    /// - `ROSTER_SEED` - Seed for reproducible draws (default: OS entropy)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Roster rules
        if let Some(capacity) = read_var::<usize>(&lookup, "ROSTER_CAPACITY") {
            config.roster.capacity = capacity.max(1);
        }
        if let Some(odds) = read_var::<u32>(&lookup, "ROSTER_SHINY_ODDS") {
            config.roster.rarity_odds = odds;
        }
        if let Some(limit) = read_var::<u32>(&lookup, "ROSTER_MAX_DRAW_FAILURES") {
            config.roster.max_draw_failures = limit;
        }

        // Oracle connection
        if let Some(url) = lookup("POKEAPI_BASE_URL").filter(|url| !url.trim().is_empty()) {
            config.oracle.base_url = url.trim().to_string();
        }
        if let Some(secs) = read_var::<u64>(&lookup, "POKEAPI_TIMEOUT_SECS") {
            config.oracle.timeout = Duration::from_secs(secs.max(1));
        }

        // Storage
        if let Some(path) = lookup("ROSTER_DATA_FILE").filter(|path| !path.trim().is_empty()) {
            config.storage = StorageMode::File(PathBuf::from(path.trim()));
        }
        if read_flag(&lookup, "ROSTER_EPHEMERAL") {
            config.storage = StorageMode::Memory;
        }

        config.offline = read_flag(&lookup, "ROSTER_OFFLINE");
        config.seed = read_var::<u64>(&lookup, "ROSTER_SEED");

        config
    }
}

/// Default snapshot location.
///
/// Follows platform conventions:
/// - macOS: `~/Library/Application Support/roster/roster.json`
/// - Linux: `~/.local/share/roster/roster.json` (or `$XDG_DATA_HOME/roster`)
/// - Windows: `%APPDATA%\roster\data\roster.json`
/// - Fallback: `./roster_data/roster.json`
pub fn default_data_file() -> PathBuf {
    directories::ProjectDirs::from("", "", "roster")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./roster_data"))
        .join("roster.json")
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

/// A flag counts as set when it parses as `true` or is present without a value.
fn read_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => true,
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => false,
    }
}
