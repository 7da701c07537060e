use tally_core::samples::suggested_categories;
use tally_core::ExpenseStore;

use crate::app::AppContext;
use crate::cli::CategoriesArgs;
use crate::ui::{plain_field, simple_table, Column};

pub fn handle_categories(ctx: &AppContext, args: &CategoriesArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let in_use = store.categories()?;
    store.close()?;

    let suggestions = suggested_categories(&in_use);

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        let value = serde_json::json!({
            "categories": suggestions,
            "in_use": in_use,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = suggestions
        .iter()
        .map(|category| {
            let used = if in_use.contains(category) { "yes" } else { "no" };
            let name = if ui_ctx.mode.is_pretty() {
                category.clone()
            } else {
                plain_field(category)
            };
            vec![name, used.to_string()]
        })
        .collect();
    let columns = [Column::new("Category"), Column::new("In use")];
    println!("{}", simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}
