//! Rendering of expenses and monthly reports as JSON or text.

mod json;
mod text;

// Re-export public API
pub use json::{breakdown_json, expense_json, expense_list_json};
pub use text::{print_breakdown, print_expense, print_expense_list};
