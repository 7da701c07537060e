//! Tally CLI - a local, single-file personal expense tracker
//!
//! Parses arguments, installs logging, dispatches to a command handler and
//! turns failures into an error message and exit code.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use tally_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{categories, expenses, export, init, maintenance, misc, report};
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level.to_string().to_lowercase());

    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false, None);
        let (message, hint) = split_error_hint(&format!("{}", e));
        let hint = hint.or_else(|| contextual_hint(&message));

        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(errors::exit_code(&e));
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--log-level`.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "tally_core={},{}={}",
            level,
            env!("CARGO_CRATE_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Split an explicit "\nHint: ..." suffix off an error message.
fn split_error_hint(error: &str) -> (String, Option<String>) {
    match error.find("\nHint:") {
        Some(idx) => (
            error[..idx].to_string(),
            Some(error[idx + 1..].to_string()),
        ),
        None => (error.to_string(), None),
    }
}

/// Hints for common failures whose messages carry none.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("expense #") && error_lower.contains("not found") {
        return Some("Hint: Run `tally list` to find expense IDs.".to_string());
    }

    if error_lower.contains("validation error") && error_lower.contains("amount") {
        return Some(
            "Hint: Amounts are non-negative with at most two decimals (e.g. 12.50).".to_string(),
        );
    }

    if error_lower.contains("unsupported export format") {
        return Some("Hint: Use --format csv, manual-csv, or jsonl.".to_string());
    }

    if error_lower.contains("storage unavailable") {
        return Some(
            "Hint: Check that the database path is readable and is a Tally database. Run `tally check` for details."
                .to_string(),
        );
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Add(args)) => {
            expenses::handle_add(ctx, args)?;
        }
        Some(Commands::Edit(args)) => {
            expenses::handle_edit(ctx, args)?;
        }
        Some(Commands::Delete(args)) => {
            expenses::handle_delete(ctx, args)?;
        }
        Some(Commands::List(args)) => {
            expenses::handle_list(ctx, args)?;
        }
        Some(Commands::Show(args)) => {
            expenses::handle_show(ctx, args)?;
        }
        Some(Commands::Report(args)) => {
            report::handle_report(ctx, args)?;
        }
        Some(Commands::Export(args)) => {
            export::handle_export(ctx, args)?;
        }
        Some(Commands::Categories(args)) => {
            categories::handle_categories(ctx, args)?;
        }
        Some(Commands::Check) => {
            maintenance::handle_check(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Tally v{}", VERSION);
            println!("\nQuickstart:");
            println!("  tally init --sample");
            println!("  tally add --amount 12.50 --category Food --note \"lunch\"");
            println!("  tally list --month 2024-01");
            println!("  tally report 2024-01");
            println!("  tally export expenses.csv");
            println!("\nRun `tally --help` for full usage.");
        }
    }

    Ok(())
}
