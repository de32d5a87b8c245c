//! Storefront configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::ports::{TableName, TableNameValidationError};

const DEFAULT_SCHEMA: &str = "ecommerce";
const DEFAULT_PRODUCTS_TABLE: &str = "products";

/// Errors raised when settings cannot be turned into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A required setting has no value.
    #[error("missing required setting {key}")]
    Missing {
        /// Environment variable naming the setting.
        key: &'static str,
    },
    /// The service URL does not parse.
    #[error("invalid service URL {value}: {message}")]
    InvalidServiceUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// Schema or table name is malformed.
    #[error("invalid products table: {0}")]
    InvalidTable(#[from] TableNameValidationError),
}

/// Configuration values for reaching the hosted table service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct StorefrontSettings {
    /// Base URL of the table service, such as `https://project.example.com`.
    pub service_url: Option<String>,
    /// Anonymous API key sent with every request.
    pub api_key: Option<String>,
    /// Schema holding the storefront tables.
    pub schema: Option<String>,
    /// Products table name.
    pub products_table: Option<String>,
    /// Upper bound for one remote read, in milliseconds.
    #[ortho_config(default = 10_000)]
    pub request_timeout_ms: u64,
}

impl StorefrontSettings {
    /// Return the parsed service URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset and
    /// [`SettingsError::InvalidServiceUrl`] when it does not parse.
    pub fn service_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .service_url
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(SettingsError::Missing {
                key: "STOREFRONT_SERVICE_URL",
            })?;
        Url::parse(raw).map_err(|error| SettingsError::InvalidServiceUrl {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Return the API key.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset or blank.
    pub fn api_key(&self) -> Result<&str, SettingsError> {
        self.api_key
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(SettingsError::Missing {
                key: "STOREFRONT_API_KEY",
            })
    }

    /// Return the configured schema, falling back to the default.
    #[must_use]
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    /// Return the schema-qualified products table.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidTable`] when either segment is
    /// malformed.
    pub fn products_table(&self) -> Result<TableName, SettingsError> {
        let name = self
            .products_table
            .as_deref()
            .unwrap_or(DEFAULT_PRODUCTS_TABLE);
        Ok(TableName::new(Some(self.schema()), name)?)
    }

    /// Return the per-read timeout, never shorter than one millisecond.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}
