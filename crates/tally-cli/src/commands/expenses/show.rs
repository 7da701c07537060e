use tally_core::ExpenseStore;

use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::errors::CliError;
use crate::output::{expense_json, print_expense};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let expense = store.get(args.id)?.ok_or_else(|| {
        CliError::not_found(
            format!("Expense #{} not found", args.id),
            "Hint: Run `tally list` to find expense IDs.",
        )
    })?;
    store.close()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&expense_json(&expense))?);
    } else {
        let ui_ctx = ctx.ui_context(false, None);
        print_expense(&ui_ctx, &expense, ctx.currency()?);
    }
    Ok(())
}
