use tally_core::{ExpenseStore, SummaryEngine};

use crate::app::AppContext;
use crate::cli::ReportArgs;
use crate::helpers::parse_month_or_current;
use crate::output::{breakdown_json, print_breakdown};
use crate::ui::{blank_line, header, print};

pub fn handle_report(ctx: &AppContext, args: &ReportArgs) -> anyhow::Result<()> {
    let (year, month) = parse_month_or_current(args.month.as_deref())?;

    let store = ctx.open_store()?;
    let breakdown = SummaryEngine::new(&store).monthly_breakdown(year, month)?;
    store.close()?;

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&breakdown_json(&breakdown))?);
        return Ok(());
    }

    if !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "report", Some(&breakdown.label())));
        blank_line(&ui_ctx);
    }
    print_breakdown(&ui_ctx, &breakdown, ctx.currency()?);
    Ok(())
}
