use tally_core::{ExpenseStore, TallyError};

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::helpers::confirm;
use crate::ui::{badge, format_amount, print, Badge, OutputMode};

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let expense = store.get(args.id)?.ok_or(TallyError::NotFound(args.id))?;

    let ui_ctx = ctx.ui_context(false, None);

    if !args.yes {
        let prompt = format!(
            "Delete expense #{} ({} {} {})?",
            expense.id,
            expense.date,
            expense.category,
            format_amount(expense.amount, ctx.currency()?)
        );
        if !confirm(&ui_ctx, &prompt)? {
            if !ctx.quiet() {
                match ui_ctx.mode {
                    OutputMode::Pretty => {
                        print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Cancelled"));
                    }
                    OutputMode::Plain | OutputMode::Json => {
                        println!("status=cancelled");
                    }
                }
            }
            return Ok(());
        }
    }

    store.delete(expense.id)?;
    store.close()?;

    if !ctx.quiet() {
        match ui_ctx.mode {
            OutputMode::Pretty => {
                print(
                    &ui_ctx,
                    &badge(&ui_ctx, Badge::Ok, &format!("Deleted expense #{}", expense.id)),
                );
            }
            OutputMode::Plain | OutputMode::Json => {
                println!("status=ok");
                println!("deleted={}", expense.id);
            }
        }
    }
    Ok(())
}
