//! Path resolution for config and database files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, TallyConfig};
use crate::errors::CliError;

/// Resolve the config file path, checking TALLY_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("TALLY_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Read the config file if it exists.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<TallyConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    read_config(config_path).map(Some)
}

/// Resolve the database path from CLI args or config.
pub fn resolve_store_path(cli: &Cli, config: Option<&TallyConfig>) -> anyhow::Result<PathBuf> {
    if let Some(ref path) = cli.db {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    match config {
        Some(config) => Ok(PathBuf::from(&config.store.path)),
        None => {
            let config_path = resolve_config_path()?;
            Err(CliError::not_found(
                missing_config_message(&config_path),
                "Hint: Run `tally init` to create a database.",
            )
            .into())
        }
    }
}

/// Error message when the database file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!(
        "No expense database found at {}\n\nRun:\n  tally init\n\nOr specify a database path:\n  TALLY_DB=/path/to/expenses.db tally init",
        path.display()
    )
}

/// Error message when config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "No config found at {} and no --db given",
        config_path.display()
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_db_flag_wins_over_config() {
        let cli = Cli::try_parse_from(["tally", "--db", "/tmp/flag.db", "check"]).unwrap();
        let config = TallyConfig::new(PathBuf::from("/tmp/config.db"));
        let path = resolve_store_path(&cli, Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/flag.db"));
    }

    #[test]
    fn test_config_path_used_without_flag() {
        let mut cli = Cli::try_parse_from(["tally", "check"]).unwrap();
        cli.db = None;
        let config = TallyConfig::new(PathBuf::from("/tmp/config.db"));
        let path = resolve_store_path(&cli, Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/config.db"));
    }

    #[test]
    fn test_missing_everything_is_not_found() {
        let mut cli = Cli::try_parse_from(["tally", "check"]).unwrap();
        cli.db = None;
        let err = resolve_store_path(&cli, None).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli_err, CliError::NotFound { .. }));
    }

    #[test]
    fn test_load_config_missing_file_is_none() {
        let path = std::env::temp_dir().join("tally_no_such_config_dir/config.toml");
        assert!(load_config(&path).unwrap().is_none());
    }
}
