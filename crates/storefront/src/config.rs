//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_MEDIA_URL` - Media base URL (default: `{base_url}media/`)
//! - `CATALOG_PATH` - Catalog JSON file (default: crates/storefront/catalog/sample.json)
//! - `STORE_ID` - Store view ID quotes belong to (default: 1)
//! - `CURRENCY_CODE` - Store currency (default: USD)
//! - `CART_SUMMARY_DISPLAY` - `qty` or `count` (default: qty)
//! - `ONEPAGE_CHECKOUT_ENABLED` - One-page checkout offered (default: true)
//! - `MSRP_ENABLED` - MSRP display enabled (default: false)
//! - `MSRP_DISPLAY_ACTUAL_PRICE_TYPE` - `on_gesture`, `in_cart` or
//!   `before_order_confirm` (default: `before_order_confirm`)
//! - `SESSION_SAVE_HANDLER` - `files` or `memory` (default: files)
//! - `SESSION_SAVE_PATH` - Directory for file sessions (default: var/session)
//! - `SESSION_GC_INTERVAL_SECS` - Garbage collection period (default: 600)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use minicart_core::{CurrencyCode, MsrpDisplay, StoreId};

use crate::services::SummaryMode;
use crate::session::{SaveHandler, SaveHandlerKind};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront (always ends with `/`)
    pub base_url: Url,
    /// Base URL product images are served from (always ends with `/`)
    pub media_url: Url,
    /// Catalog JSON file
    pub catalog_path: PathBuf,
    /// Store view quotes are created in
    pub store_id: StoreId,
    /// Store currency
    pub currency_code: CurrencyCode,
    /// Cart section behaviour
    pub cart: CartConfig,
    /// Session persistence
    pub session: SessionConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Settings that shape the cart section.
#[derive(Debug, Clone, Copy)]
pub struct CartConfig {
    pub summary_mode: SummaryMode,
    pub onepage_checkout_enabled: bool,
    pub msrp_enabled: bool,
    pub msrp_display: MsrpDisplay,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            summary_mode: SummaryMode::ItemsQty,
            onepage_checkout_enabled: true,
            msrp_enabled: false,
            msrp_display: MsrpDisplay::BeforeOrderConfirm,
        }
    }
}

/// Session persistence settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub save_handler: SaveHandlerKind,
    pub save_path: PathBuf,
    pub gc_interval: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "3000")?;
        let base_url = parse_base_url("STOREFRONT_BASE_URL", &env.required("STOREFRONT_BASE_URL")?)?;
        let media_url = match env.optional("STOREFRONT_MEDIA_URL") {
            Some(raw) => parse_base_url("STOREFRONT_MEDIA_URL", &raw)?,
            None => base_url
                .join("media/")
                .map_err(|e| invalid("STOREFRONT_MEDIA_URL", &e))?,
        };

        let cart = CartConfig {
            summary_mode: env.parse_or("CART_SUMMARY_DISPLAY", "qty")?,
            onepage_checkout_enabled: env.flag_or("ONEPAGE_CHECKOUT_ENABLED", true)?,
            msrp_enabled: env.flag_or("MSRP_ENABLED", false)?,
            msrp_display: parse_msrp_display(
                &env.or_default("MSRP_DISPLAY_ACTUAL_PRICE_TYPE", "before_order_confirm"),
            )?,
        };

        let session = SessionConfig {
            save_handler: env.parse_or("SESSION_SAVE_HANDLER", SaveHandler::DEFAULT)?,
            save_path: PathBuf::from(env.or_default("SESSION_SAVE_PATH", "var/session")),
            gc_interval: Duration::from_secs(env.parse_or("SESSION_GC_INTERVAL_SECS", "600")?),
        };

        Ok(Self {
            host,
            port,
            base_url,
            media_url,
            catalog_path: PathBuf::from(
                env.or_default("CATALOG_PATH", "crates/storefront/catalog/sample.json"),
            ),
            store_id: StoreId::new(env.parse_or("STORE_ID", "1")?),
            currency_code: env.parse_or("CURRENCY_CODE", "USD")?,
            cart,
            session,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| invalid(key, &e))
    }

    fn flag_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        self.optional(key)
            .map_or(Ok(default), |raw| parse_bool(key, &raw))
    }
}

fn invalid(key: &str, err: &impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, &format!("expected a boolean, got '{other}'"))),
    }
}

/// Parse a URL that relative paths will be joined onto.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(key, &e))?;
    if url.cannot_be_a_base() {
        return Err(invalid(key, &"must be a hierarchical http(s) URL"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_msrp_display(raw: &str) -> Result<MsrpDisplay, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on_gesture" => Ok(MsrpDisplay::OnGesture),
        "in_cart" => Ok(MsrpDisplay::InCart),
        "before_order_confirm" => Ok(MsrpDisplay::BeforeOrderConfirm),
        other => Err(invalid(
            "MSRP_DISPLAY_ACTUAL_PRICE_TYPE",
            &format!("unknown display type '{other}'"),
        )),
    }
}
