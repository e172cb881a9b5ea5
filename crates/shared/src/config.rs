//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Whether dates with no formalized accounting period are treated as open.
    ///
    /// Defaults to true so that posting works from day one; the
    /// reconciliation audit surfaces months that should be formalized.
    #[serde(default = "default_allow_unknown_periods")]
    pub allow_unknown_periods: bool,
}

fn default_allow_unknown_periods() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            allow_unknown_periods: default_allow_unknown_periods(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Layering order: `config/default.toml`, then `config/{RUN_MODE}.toml`,
    /// then `COREBOOK__`-prefixed environment variables. A `.env` file is
    /// honored when present.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COREBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
