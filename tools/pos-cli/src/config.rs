//! CLI configuration.

use anyhow::{Context, Result};
use pos_core::AppConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Application settings shared with the library.
    #[serde(default)]
    pub app: AppConfig,

    /// Payroll defaults.
    #[serde(default)]
    pub payroll: PayrollConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Payroll configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Hourly rate used when `--rate` is not given.
    #[serde(default)]
    pub hourly_rate: f64,
}

/// Generate a starter config file for `name`.
pub fn generate_default_config(name: &str) -> String {
    format!(
        r#"# POS configuration

[app]
name = "{name}"
# Client state lives here, relative to the working directory.
data_dir = ".pos"
currency = "PHP"

[app.router]
home_path = "/dashboard"
scroll_top = true
show_loading = false

[app.orders]
open_limit = 200

[payroll]
hourly_rate = 0.0
"#
    )
}
