//! Configuration management for the Latchkey CLI.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

use latchkey::TrackerPolicy;
use latchkey_common::constants::fields;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Credentials record. Kept untyped so that malformed credentials reach
    /// the tracker constructor and fail there.
    #[serde(default)]
    pub credentials: Value,

    /// Lockout thresholds
    #[serde(default)]
    pub policy: TrackerPolicy,
}

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref username) = args.username {
            config.set_credential(fields::USERNAME, username);
        }
        if let Some(ref password) = args.password {
            config.set_credential(fields::PASSWORD, password);
        }

        config.policy.validate()?;

        Ok(config)
    }

    /// Overwrite one credential field. A non-object credentials value is
    /// replaced by a fresh record.
    fn set_credential(&mut self, field: &str, value: &str) {
        if !self.credentials.is_object() {
            self.credentials = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.credentials {
            map.insert(field.to_string(), Value::String(value.to_string()));
        }
    }
}
