//! Expense row type for database queries.

use chrono::NaiveDate;

use crate::amount::Amount;
use crate::error::{Result, TallyError};
use crate::storage::types::Expense;

/// Column list shared by every query that builds an `ExpenseRow`.
pub const EXPENSE_COLUMNS: &str = "id, date, amount_minor, category, note";

/// Storage format for the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw row data from the expenses table, before parsing into domain types.
#[derive(Debug)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub amount_minor: i64,
    pub category: String,
    pub note: String,
}

impl ExpenseRow {
    /// Read a row selected with `EXPENSE_COLUMNS`.
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            amount_minor: row.get(2)?,
            category: row.get(3)?,
            note: row.get(4)?,
        })
    }
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = TallyError;

    fn try_from(row: ExpenseRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|e| {
            TallyError::StorageUnavailable(format!(
                "Invalid date \"{}\" on expense #{}: {}",
                row.date, row.id, e
            ))
        })?;
        if row.amount_minor < 0 {
            return Err(TallyError::StorageUnavailable(format!(
                "Negative amount stored on expense #{}",
                row.id
            )));
        }

        Ok(Expense {
            id: row.id,
            date,
            amount: Amount::from_minor(row.amount_minor),
            category: row.category,
            note: row.note,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, amount_minor: i64) -> ExpenseRow {
        ExpenseRow {
            id: 1,
            date: date.to_string(),
            amount_minor,
            category: "Food".to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn test_row_converts() {
        let expense: Expense = row("2024-01-05", 1250).try_into().unwrap();
        assert_eq!(expense.amount.to_string(), "12.50");
        assert_eq!(expense.date.to_string(), "2024-01-05");
    }

    #[test]
    fn test_bad_date_is_storage_error() {
        let result: Result<Expense> = row("05/01/2024", 1250).try_into();
        assert!(matches!(result, Err(TallyError::StorageUnavailable(_))));
    }

    #[test]
    fn test_negative_amount_is_storage_error() {
        let result: Result<Expense> = row("2024-01-05", -1).try_into();
        assert!(matches!(result, Err(TallyError::StorageUnavailable(_))));
    }
}
