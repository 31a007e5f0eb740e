//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `ENROLL_` prefix; nested values use `__` as the separator, e.g.
//! `ENROLL__DATABASE__URL=sqlite://funnel.db?mode=rwc` or
//! `ENROLL__CLUSTER__INSTANCE_ID=bot-a`.

mod catalog;
mod cluster;
mod database;
mod error;
mod funnel;

pub use catalog::CatalogConfig;
pub use cluster::ClusterConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use funnel::FunnelConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite storage
    pub database: DatabaseConfig,

    /// Leader election and bot supervision
    pub cluster: ClusterConfig,

    /// Admins, support contact, reminder thresholds
    pub funnel: FunnelConfig,

    /// Course pricing source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from the environment (and `.env` if present).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ENROLL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("funnel.admin_ids")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation across all sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.cluster.validate()?;
        self.funnel.validate()?;
        Ok(())
    }
}
