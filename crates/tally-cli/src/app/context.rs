//! Application context for the Tally CLI.
//!
//! Provides a unified context that combines CLI arguments with
//! lazily-loaded configuration.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;
use tracing::debug;

use tally_core::export::ExportBackend;
use tally_core::storage::SqliteStore;
use tally_core::ExpenseStore;

use crate::cli::Cli;
use crate::config::TallyConfig;
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{load_config, missing_store_message, resolve_config_path, resolve_store_path};

/// Application context that bundles CLI args with configuration.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<TallyConfig>>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the config file contents, loading them lazily if needed.
    ///
    /// `None` when no config file exists yet.
    pub fn config(&self) -> anyhow::Result<Option<&TallyConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            debug!(path = %path.display(), "loading config");
            load_config(&path)
        })?;
        Ok(config.as_ref())
    }

    /// Currency prefix for amounts in text output.
    pub fn currency(&self) -> anyhow::Result<Option<&str>> {
        Ok(self
            .config()?
            .and_then(|config| config.ui.currency.as_deref()))
    }

    /// Export backend: explicit `--format`, then config, then the default.
    pub fn export_backend(&self, format_flag: Option<&str>) -> anyhow::Result<ExportBackend> {
        if let Some(format) = format_flag {
            return Ok(format.parse()?);
        }
        Ok(self
            .config()?
            .map(|config| config.export.backend)
            .unwrap_or_default())
    }

    /// Resolve the database path from `--db` or config.
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    /// Open the existing expense database.
    ///
    /// A missing file is reported as not found rather than silently created;
    /// `tally init` is the only command that creates databases.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.store_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_store_message(&path),
                "Hint: Run `tally init` to create it.",
            )
            .into());
        }
        debug!(path = %path.display(), "opening expense store");
        Ok(SqliteStore::open(&path)?)
    }

    /// Create UI context for output formatting.
    pub fn ui_context(&self, json_flag: bool, format_flag: Option<&str>) -> UiContext {
        UiContext::from_env(json_flag, format_flag, self.cli.no_color, self.cli.ascii)
    }
}
