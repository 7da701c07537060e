//! Add expense command handler.

use tracing::info;

use tally_core::storage::NewExpense;
use tally_core::ExpenseStore;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::{parse_amount, parse_date_or_today};
use crate::ui::theme::{styled, styles};
use crate::ui::{badge, blank_line, format_amount, hint, print, Badge, OutputMode};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let date = parse_date_or_today(args.date.as_deref())?;
    let amount = parse_amount(&args.amount)?;
    let mut expense = NewExpense::new(date, amount, args.category.clone());
    if let Some(ref note) = args.note {
        expense = expense.with_note(note.clone());
    }

    let mut store = ctx.open_store()?;
    let id = store.add(&expense)?;
    let saved = store.get(id)?;
    store.close()?;
    info!(id, "recorded expense");

    if ctx.quiet() {
        println!("{}", id);
        return Ok(());
    }

    let ui_ctx = ctx.ui_context(false, None);
    let currency = ctx.currency()?;
    let (category, amount) = match saved {
        Some(ref e) => (e.category.as_str(), e.amount),
        None => (expense.category.as_str(), expense.amount),
    };

    match ui_ctx.mode {
        OutputMode::Pretty => {
            print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::Ok, &format!("Added expense #{}", id)),
            );
            let context = format!(
                "{}  \u{00B7}  {}  \u{00B7}  {}",
                date,
                category,
                format_amount(amount, currency)
            );
            println!("{}", styled(&context, styles::dim(), ui_ctx.color));
            blank_line(&ui_ctx);
            print(
                &ui_ctx,
                &hint(
                    &ui_ctx,
                    &format!("tally show {}  \u{00B7}  tally list  \u{00B7}  tally edit {}", id, id),
                ),
            );
        }
        OutputMode::Plain | OutputMode::Json => {
            println!("status=ok");
            println!("id={}", id);
            println!("date={}", date);
            println!("category={}", category);
            println!("amount={}", format_amount(amount, currency));
        }
    }
    Ok(())
}
