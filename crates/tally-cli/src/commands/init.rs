//! `tally init`: create the database and record its path in config.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use tally_core::samples::seed_samples;
use tally_core::storage::SqliteStore;
use tally_core::ExpenseStore;

use crate::app::{load_config, resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, TallyConfig};
use crate::ui::{blank_line, hint, print, receipt};

/// Make `path` absolute so the config stays valid from any working directory.
fn absolute_path(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let target = match args.path.as_ref().or(ctx.cli().db.as_ref()) {
        Some(path) => PathBuf::from(path),
        None => default_store_path()?,
    };
    let target = absolute_path(&target)?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create database directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }

    let existed = target.exists();
    let mut store = SqliteStore::open(&target)?;
    let seeded = if args.sample {
        seed_samples(&mut store, Local::now().date_naive())?.len()
    } else {
        0
    };
    store.close()?;
    info!(path = %target.display(), existed, seeded, "initialized expense database");

    let config_path = resolve_config_path()?;
    let config = match load_config(&config_path)? {
        Some(mut existing) => {
            existing.store.path = target.to_string_lossy().to_string();
            existing
        }
        None => TallyConfig::new(target.clone()),
    };
    write_config(&config_path, &config)?;
    debug!(path = %config_path.display(), "wrote config");

    if ctx.quiet() {
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    let title = if existed {
        "Using existing expense database"
    } else {
        "Created expense database"
    };
    let db_text = target.display().to_string();
    let config_text = config_path.display().to_string();
    let seeded_text = seeded.to_string();
    let mut items = vec![("Database", db_text.as_str()), ("Config", config_text.as_str())];
    if args.sample {
        items.push(("Samples", seeded_text.as_str()));
    }
    print(&ui_ctx, &receipt(&ui_ctx, title, &items));
    blank_line(&ui_ctx);
    if ui_ctx.mode.is_pretty() {
        print(
            &ui_ctx,
            &hint(&ui_ctx, "tally add --amount 12.50 --category Food"),
        );
    }
    Ok(())
}
