//! Configuration
//!
//! Command-line and environment settings for the `pawcart` binary.

use std::path::PathBuf;

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{cart::DEFAULT_CART_KEY, checkout::OrderApiConfig};

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The currency code is not an ISO 4217 code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Checkout needs an order API URL
    #[error("No order API URL configured; set PAWCART_ORDER_API_URL or pass --order-api-url")]
    MissingOrderApiUrl,
}

/// Cart, catalog and checkout settings.
#[derive(Debug, Clone, Args)]
pub struct CartConfig {
    /// Directory holding the stored cart
    #[arg(long, env = "PAWCART_STORAGE_DIR", default_value = ".pawcart")]
    pub storage_dir: PathBuf,

    /// Storage key the cart is kept under
    #[arg(long, env = "PAWCART_CART_KEY", default_value = DEFAULT_CART_KEY)]
    pub cart_key: String,

    /// Catalog YAML file
    #[arg(long, env = "PAWCART_CATALOG", default_value = "fixtures/catalog.yml")]
    pub catalog: PathBuf,

    /// ISO 4217 currency code used to format amounts
    #[arg(long, env = "PAWCART_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Base URL of the order API
    #[arg(long, env = "PAWCART_ORDER_API_URL")]
    pub order_api_url: Option<String>,

    /// Bearer token for the order API
    #[arg(long, env = "PAWCART_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,
}

impl CartConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not recognised.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.trim().to_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Order API settings for checkout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOrderApiUrl`] if no URL is configured.
    pub fn order_api(&self) -> Result<OrderApiConfig, ConfigError> {
        let base_url = self
            .order_api_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingOrderApiUrl)?;

        Ok(OrderApiConfig {
            base_url,
            token: self.api_token.clone(),
        })
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
