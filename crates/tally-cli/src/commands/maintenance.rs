use tally_core::{ExpenseStore, TallyError};

use crate::app::AppContext;
use crate::errors::CliError;
use crate::ui::{badge, print, Badge, OutputMode};

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let result = store.check_integrity();
    store.close()?;

    match result {
        Ok(()) => {
            if !ctx.quiet() {
                let ui_ctx = ctx.ui_context(false, None);
                match ui_ctx.mode {
                    OutputMode::Pretty => {
                        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Integrity check passed"));
                        println!("  - sqlite integrity: OK");
                        println!("  - expense rows: OK");
                    }
                    OutputMode::Plain | OutputMode::Json => {
                        println!("Integrity check: OK");
                    }
                }
            }
            Ok(())
        }
        Err(TallyError::StorageUnavailable(message)) => Err(CliError::IntegrityFailed(format!(
            "{}\nHint: Export what you can with `tally export` and restore from a backup.",
            message
        ))
        .into()),
        Err(other) => Err(other.into()),
    }
}
