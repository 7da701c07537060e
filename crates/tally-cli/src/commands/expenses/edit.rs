use tally_core::storage::ExpenseUpdate;
use tally_core::ExpenseStore;

use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::errors::CliError;
use crate::helpers::{parse_amount, parse_date};
use crate::ui::{format_amount, print, receipt};

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let mut update = ExpenseUpdate::new();
    if let Some(ref date) = args.date {
        update = update.date(parse_date(date)?);
    }
    if let Some(ref amount) = args.amount {
        update = update.amount(parse_amount(amount)?);
    }
    if let Some(ref category) = args.category {
        update = update.category(category.clone());
    }
    if let Some(ref note) = args.note {
        update = update.note(note.clone());
    }
    if update.is_empty() {
        return Err(CliError::invalid_input(
            "Nothing to change.\nHint: Pass at least one of --amount, --category, --date, --note.",
        )
        .into());
    }

    let mut store = ctx.open_store()?;
    let expense = store.update(args.id, &update)?;
    store.close()?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let id = expense.id.to_string();
        let date = expense.date.to_string();
        let amount = format_amount(expense.amount, ctx.currency()?);
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                &format!("Updated expense #{}", expense.id),
                &[
                    ("ID", id.as_str()),
                    ("Date", date.as_str()),
                    ("Category", expense.category.as_str()),
                    ("Amount", amount.as_str()),
                ],
            ),
        );
    }
    Ok(())
}
