//! # Basket Configuration
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, then passed by value into the manager - mutation logic never
//! reads global state.
//!
//! | Variable               | Default                   | Meaning                         |
//! |------------------------|---------------------------|---------------------------------|
//! | `BASKET_TAX_MODE`      | `flat`                    | flat, per-item, fixed-per-item  |
//! | `BASKET_TAX_RATE`      | `0`                       | percent, used in flat mode      |
//! | `BASKET_SECRET`        | dev placeholder           | signs basket references         |
//! | `BASKET_DATABASE_PATH` | `basket.db`               | SQLite file (demo binary)       |

use std::env;
use std::path::PathBuf;

use basket_core::tax::{TaxConfig, TaxMode, TaxRate};

/// Basket configuration.
#[derive(Debug, Clone)]
pub struct BasketConfig {
    /// Tax calculation settings.
    pub tax: TaxConfig,

    /// Server secret for signed basket references.
    pub secret: String,

    /// Path to the SQLite database file.
    pub database_path: PathBuf,
}

impl BasketConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mode = env::var("BASKET_TAX_MODE")
            .unwrap_or_else(|_| "flat".to_string())
            .parse::<TaxMode>()
            .map_err(|_| ConfigError::InvalidValue("BASKET_TAX_MODE".to_string()))?;

        let rate_percent: f64 = env::var("BASKET_TAX_RATE")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BASKET_TAX_RATE".to_string()))?;

        Ok(BasketConfig {
            tax: TaxConfig {
                mode,
                rate: TaxRate::from_percentage(rate_percent),
            },
            // In production this MUST be set via environment variable
            secret: env::var("BASKET_SECRET")
                .unwrap_or_else(|_| "basket-dev-secret-change-in-production".to_string()),
            database_path: env::var("BASKET_DATABASE_PATH")
                .unwrap_or_else(|_| "basket.db".to_string())
                .into(),
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
