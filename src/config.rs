//! Storefront configuration.
//!
//! Deployment knobs live in a YAML file: the public base URL for checkout
//! redirects, the settlement currency, the default map viewport, and the
//! webhook shared secret. Everything has a default so a test configuration
//! can be built inline.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geo::{self, Point},
    webhook,
};

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file was not valid YAML for a config.
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The webhook section is enabled but its secret is empty.
    #[error("webhook secret must not be empty")]
    EmptyWebhookSecret,
}

/// Webhook verification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret the provider signs deliveries with.
    pub secret: String,

    /// Accepted distance between the signed timestamp and now, in seconds.
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: i64,
}

/// Top-level storefront configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Public base URL, used to build checkout redirect URLs.
    pub base_url: String,

    /// ISO alpha code of the settlement currency.
    pub currency_code: String,

    /// Map centre shown before any position source is active.
    pub default_center: Point,

    /// Initial search radius in kilometres.
    pub default_radius_km: f64,

    /// Webhook verification settings. Absent when the deployment takes no
    /// inbound deliveries.
    pub webhook: Option<WebhookConfig>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            base_url: "http://localhost:3000".to_string(),
            currency_code: "INR".to_string(),
            default_center: geo::DEFAULT_CENTER,
            default_radius_km: 10.0,
            webhook: None,
        }
    }
}

impl StorefrontConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read, parsed, or
    /// fails validation.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let config: StorefrontConfig = serde_norway::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // An absent webhook section is fine; a present one needs a secret.
        if let Some(webhook) = &self.webhook {
            if webhook.secret.is_empty() {
                return Err(ConfigError::EmptyWebhookSecret);
            }
        }

        Ok(())
    }
}

fn default_tolerance_secs() -> i64 {
    webhook::DEFAULT_TOLERANCE_SECS
}
