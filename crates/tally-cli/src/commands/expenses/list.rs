use tally_core::ExpenseStore;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::helpers::build_filter;
use crate::output::{expense_list_json, print_expense_list};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let filter = build_filter(&args.filter)?;
    let store = ctx.open_store()?;
    let expenses = store.query(&filter)?;
    store.close()?;

    let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&expense_list_json(&expenses))?);
        return Ok(());
    }

    print_expense_list(&ui_ctx, &expenses, ctx.currency()?, ctx.quiet());
    Ok(())
}
