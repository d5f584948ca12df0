//! Configuration management
//!
//! This module handles loading and validation of the remote agent settings.

use crate::core::a2a::auth::MAX_TOKEN_LIFETIME_SECS;
use crate::core::a2a::{A2AConfig, TaskClearPolicy};
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote agent invocation settings
    #[serde(default)]
    pub a2a: A2AConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_yaml::from_str(&content)?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut a2a = A2AConfig::default();

        if let Some(value) = lookup("A2A_MAX_AUTH_RETRIES") {
            a2a.max_auth_retries = value
                .parse()
                .map_err(|e| Error::config(format!("Invalid A2A_MAX_AUTH_RETRIES: {}", e)))?;
        }
        if let Some(value) = lookup("A2A_TASK_CLEAR_POLICY") {
            a2a.task_clear_policy = value
                .parse::<TaskClearPolicy>()
                .map_err(|e| Error::config(format!("Invalid A2A_TASK_CLEAR_POLICY: {}", e)))?;
        }
        if let Some(value) = lookup("A2A_ADC_METADATA_URL") {
            a2a.adc.metadata_url = value;
        }
        if let Some(value) = lookup("A2A_ADC_TOKEN_URL") {
            a2a.adc.token_url = value;
        }

        let config = Self { a2a };
        config.validate()?;
        Ok(config)
    }

    /// Get remote agent settings
    pub fn a2a(&self) -> &A2AConfig {
        &self.a2a
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.a2a
            .validate()
            .map_err(|errors| Error::config(format!("A2A config error: {}", errors.join("; "))))?;

        let margin = self.a2a.adc.expiry_margin_secs;
        if !(0..MAX_TOKEN_LIFETIME_SECS).contains(&margin) {
            return Err(Error::config(format!(
                "adc.expiry_margin_secs must be between 0 and {}, got {}",
                MAX_TOKEN_LIFETIME_SECS - 1,
                margin
            )));
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
