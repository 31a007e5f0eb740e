//! Course catalog configuration
//!
//! Pricing is deployment data, not code: each payment method's currency
//! and per-course amounts live in a JSON file the operator maintains.
//! With no file configured the table is empty and every payment choice
//! answers "currently unavailable", which keeps the funnel safe to run
//! before pricing is set up.

use serde::Deserialize;

use super::error::ConfigError;
use crate::domain::registration::PricingTable;

/// Where the price table comes from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Path to a JSON pricing file, keyed by payment method:
    /// `{"paypal": {"currency": "USD", "amounts": {"expert": 200, ...}}}`.
    #[serde(default)]
    pub pricing_file: Option<String>,
}

impl CatalogConfig {
    pub fn load_pricing(&self) -> Result<PricingTable, ConfigError> {
        let Some(path) = &self.pricing_file else {
            return Ok(PricingTable::default());
        };
        let raw =
            std::fs::read_to_string(path).map_err(|source| ConfigError::PricingFileUnreadable {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::PricingFileInvalid {
            path: path.clone(),
            source,
        })
    }
}
