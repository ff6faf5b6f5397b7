//! Application configuration.

use pos_cache::keys;
use pos_commerce::Currency;
use pos_router::RouterOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the POS shell. Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name.
    pub name: String,
    /// Directory for durable client state. In-memory when unset.
    pub data_dir: Option<PathBuf>,
    /// Currency used when displaying amounts.
    pub currency: Currency,
    pub storage: StorageKeys,
    pub router: RouterConfig,
    pub orders: OrdersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "pos".to_string(),
            data_dir: None,
            currency: Currency::default(),
            storage: StorageKeys::default(),
            router: RouterConfig::default(),
            orders: OrdersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with the given app name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Keep state under `dir`.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_router(mut self, router: RouterConfig) -> Self {
        self.router = router;
        self
    }
}

/// Storage keys for each persisted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub session: String,
    pub cart: String,
    pub drafts: String,
    pub company_scope: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            session: keys::SESSION.to_string(),
            cart: keys::CART.to_string(),
            drafts: keys::DRAFTS.to_string(),
            company_scope: keys::COMPANY_SCOPE.to_string(),
        }
    }
}

/// Router switches as they appear in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub home_path: String,
    pub scroll_top: bool,
    pub show_loading: bool,
    pub loading_content: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let options = RouterOptions::default();
        Self {
            home_path: options.home_path,
            scroll_top: options.scroll_top,
            show_loading: options.show_loading,
            loading_content: options.loading_content,
        }
    }
}

impl From<&RouterConfig> for RouterOptions {
    fn from(config: &RouterConfig) -> Self {
        RouterOptions {
            home_path: config.home_path.clone(),
            scroll_top: config.scroll_top,
            show_loading: config.show_loading,
            loading_content: config.loading_content.clone(),
        }
    }
}

/// Open-order browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// Maximum orders fetched per query.
    pub open_limit: usize,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self { open_limit: 200 }
    }
}
