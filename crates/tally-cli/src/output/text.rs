//! Text and table output formatting.

use tally_core::storage::Expense;
use tally_core::summary::MonthlyBreakdown;
use tally_core::Amount;

use crate::ui::theme::{styled, styles};
use crate::ui::{
    format_amount, format_share, kv, plain_field, simple_table, single_line, table, truncate,
    Column, UiContext,
};

const NOTE_WIDTH: usize = 40;

/// Footer line shown under expense lists.
pub fn list_footer(count: usize, total: Amount, currency: Option<&str>) -> String {
    let noun = if count == 1 { "record" } else { "records" };
    format!("{} {}, total {}", count, noun, format_amount(total, currency))
}

/// Rows for the expense list table.
fn expense_rows(ctx: &UiContext, expenses: &[Expense], currency: Option<&str>) -> Vec<Vec<String>> {
    expenses
        .iter()
        .map(|expense| {
            let amount = format_amount(expense.amount, currency);
            if ctx.mode.is_pretty() {
                vec![
                    expense.id.to_string(),
                    expense.date.to_string(),
                    expense.category.clone(),
                    styled(&amount, styles::amount(), ctx.color),
                    truncate(&single_line(&expense.note), NOTE_WIDTH),
                ]
            } else {
                vec![
                    expense.id.to_string(),
                    expense.date.to_string(),
                    plain_field(&expense.category),
                    amount,
                    plain_field(&expense.note),
                ]
            }
        })
        .collect()
}

/// Print an expense list followed by its count and total.
pub fn print_expense_list(
    ctx: &UiContext,
    expenses: &[Expense],
    currency: Option<&str>,
    quiet: bool,
) {
    let columns = [
        Column::new("ID"),
        Column::new("Date"),
        Column::new("Category"),
        Column::numeric("Amount"),
        Column::new("Note"),
    ];
    if !expenses.is_empty() {
        println!("{}", simple_table(ctx, &columns, &expense_rows(ctx, expenses, currency)));
    }
    if !quiet {
        let total: Amount = expenses.iter().map(|e| e.amount).sum();
        println!("{}", list_footer(expenses.len(), total, currency));
    }
}

/// Print a single expense as key-value lines.
pub fn print_expense(ctx: &UiContext, expense: &Expense, currency: Option<&str>) {
    println!("{}", kv(ctx, "ID", &expense.id.to_string()));
    println!("{}", kv(ctx, "Date", &expense.date.to_string()));
    println!("{}", kv(ctx, "Category", &expense.category));
    println!(
        "{}",
        kv(ctx, "Amount", &format_amount(expense.amount, currency))
    );
    if ctx.mode.is_pretty() {
        if !expense.note.is_empty() {
            println!();
            println!("{}", expense.note);
        }
    } else {
        println!("{}", kv(ctx, "Note", &single_line(&expense.note)));
    }
}

/// Print a monthly breakdown: ranked categories with shares, then the total.
pub fn print_breakdown(ctx: &UiContext, breakdown: &MonthlyBreakdown, currency: Option<&str>) {
    if breakdown.is_empty() {
        println!("No expenses in {}", breakdown.label());
        return;
    }

    let columns = [
        Column::new("Category"),
        Column::numeric("Amount"),
        Column::numeric("Share"),
    ];
    let rows: Vec<Vec<String>> = breakdown
        .ranked()
        .into_iter()
        .map(|(category, amount)| {
            let name = if ctx.mode.is_pretty() {
                category.to_string()
            } else {
                plain_field(category)
            };
            vec![
                name,
                format_amount(amount, currency),
                format_share(breakdown.share(category)),
            ]
        })
        .collect();
    println!("{}", table(ctx, &columns, &rows));

    let total = format_amount(breakdown.total(), currency);
    if ctx.mode.is_pretty() {
        println!("{}", kv(ctx, "Total", &styled(&total, styles::amount(), ctx.color)));
    } else {
        println!("{}", kv(ctx, "Total", &total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_footer() {
        assert_eq!(
            list_footer(3, Amount::from_minor(5975), None),
            "3 records, total 59.75"
        );
        assert_eq!(
            list_footer(1, Amount::from_minor(100), Some("$")),
            "1 record, total $1.00"
        );
        assert_eq!(list_footer(0, Amount::ZERO, None), "0 records, total 0.00");
    }
}
