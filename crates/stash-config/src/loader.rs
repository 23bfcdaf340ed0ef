//! Configuration loader with layered sources.

use crate::{CacheBackend, StashConfig};
use config::{Config, ConfigError, Environment, File};
use stash_core::StashError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use validator::Validate;

/// Prefix of environment variables that override file configuration.
pub const ENV_PREFIX: &str = "STASH";

/// Configuration loader with runtime reload support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<StashConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{dir}/default.toml` - Default values
    /// 2. `{dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{dir}/local.toml` - Local overrides
    /// 4. Environment variables with `STASH_` prefix (`__` separates sections)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, StashError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, StashError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> StashConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// On failure the previously loaded configuration stays in effect.
    pub async fn reload(&self) -> Result<(), StashError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<StashConfig, StashError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("STASH_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_stash_error)?;

        let stash_config: StashConfig = config
            .try_deserialize()
            .map_err(config_error_to_stash_error)?;

        Self::validate_config(&stash_config)?;

        Ok(stash_config)
    }

    /// Validates the configuration.
    pub fn validate_config(config: &StashConfig) -> Result<(), StashError> {
        config
            .validate()
            .map_err(|e| StashError::Configuration(e.to_string()))?;

        match config.cache.backend {
            CacheBackend::Redis => {
                config
                    .redis
                    .validate()
                    .map_err(|e| StashError::Configuration(format!("redis: {}", e)))?;
            }
            CacheBackend::Disabled => {
                if config.app.environment == "production" {
                    warn!("Caching is disabled in production; every read goes to the backing store");
                }
            }
            CacheBackend::Memory => {}
        }

        Ok(())
    }
}

fn config_error_to_stash_error(err: ConfigError) -> StashError {
    StashError::Configuration(err.to_string())
}
