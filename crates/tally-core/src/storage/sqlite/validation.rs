//! Expense field validation and normalization.

use chrono::Datelike;

use crate::error::{Result, TallyError};
use crate::storage::types::NewExpense;

/// Maximum characters in a category label.
pub const MAX_CATEGORY_CHARS: usize = 64;

/// Maximum characters in a note.
pub const MAX_NOTE_CHARS: usize = 1024;

/// Years that format as four-digit `YYYY-MM-DD` text. Dates are compared as
/// strings in SQL, so anything wider would sort out of order.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// A validated expense, ready to bind into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidExpense {
    pub date: String,
    pub amount_minor: i64,
    pub category: String,
    pub note: String,
}

/// Normalize and validate an expense before it is written.
///
/// - Trims whitespace from category and note
/// - Requires a non-empty category
/// - Rejects negative amounts and sub-cent precision
/// - Rejects dates outside years 0000-9999
/// - Enforces length limits
pub fn validate_expense(expense: &NewExpense) -> Result<ValidExpense> {
    if !YEAR_RANGE.contains(&expense.date.year()) {
        return Err(TallyError::Validation(format!(
            "Date {} is outside years 0000-9999",
            expense.date
        )));
    }

    if expense.amount.is_negative() {
        return Err(TallyError::Validation(format!(
            "Amount must not be negative (got {})",
            expense.amount
        )));
    }
    let amount_minor = expense.amount.to_minor()?;

    let category = normalize_category(&expense.category)?;

    let note = expense.note.trim().to_string();
    if note.chars().count() > MAX_NOTE_CHARS {
        return Err(TallyError::Validation(format!(
            "Note too long (max {} characters)",
            MAX_NOTE_CHARS
        )));
    }

    Ok(ValidExpense {
        date: expense.date.format(super::row::DATE_FORMAT).to_string(),
        amount_minor,
        category,
        note,
    })
}

/// Trim a category label and enforce it is present and short.
pub fn normalize_category(category: &str) -> Result<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(TallyError::Validation("Category is required".to_string()));
    }
    if trimmed.chars().count() > MAX_CATEGORY_CHARS {
        return Err(TallyError::Validation(format!(
            "Category too long (max {} characters)",
            MAX_CATEGORY_CHARS
        )));
    }
    Ok(trimmed.to_string())
}
