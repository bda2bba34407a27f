use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductsConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_pool_size: u32,
    pub products: ProductsConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let parsed = |key: &'static str, default: &str| -> Result<u64, ConfigError> {
            let value = lookup(key).unwrap_or_else(|| default.to_string());
            value
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        };

        let port = parsed("PORT", "8080")?;
        let db_pool_size = parsed("DB_POOL_SIZE", "10")?;
        let timeout_ms = parsed("PRODUCTS_TIMEOUT_MS", "5000")?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: u16::try_from(port).map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port.to_string(),
            })?,
            db_pool_size: u32::try_from(db_pool_size)
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::Invalid {
                    key: "DB_POOL_SIZE",
                    value: db_pool_size.to_string(),
                })?,
            products: ProductsConfig {
                base_url: required("PRODUCTS_SERVICE_URL")?,
                timeout: Duration::from_millis(timeout_ms),
            },
        })
    }
}
