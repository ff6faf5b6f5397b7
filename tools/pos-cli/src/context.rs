//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use pos_core::{App, HeadlessApp};

use crate::config::CliConfig;
use crate::output::Output;

/// Directory used for client state when the config names none.
const DEFAULT_DATA_DIR: &str = ".pos";

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Answer yes to every confirmation.
    pub assume_yes: bool,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output, assume_yes: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self {
            config,
            output,
            cwd,
            assume_yes,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["pos.toml", ".pos.toml", "pos.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some(config),
                        Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "skipping config"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory holding the persisted client state.
    pub fn data_dir(&self) -> PathBuf {
        match &self.config.app.data_dir {
            Some(dir) => self.resolve_path(&dir.to_string_lossy()),
            None => self.cwd.join(DEFAULT_DATA_DIR),
        }
    }

    /// Open the app over the file-backed state.
    pub fn open_app(&self) -> Result<HeadlessApp> {
        let data_dir = self.data_dir();
        self.output.debug(&format!("state: {}", data_dir.display()));

        let config = self.config.app.clone().with_data_dir(&data_dir);
        let cache = App::open_cache(&config)
            .with_context(|| format!("Failed to open state in {}", data_dir.display()))?;
        Ok(App::headless(config, cache, "")?)
    }

    /// Ask before a destructive step. `--yes` skips the prompt.
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
