//! Core data types for the storage layer.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::{Result, TallyError};

/// Store-assigned expense identifier.
pub type ExpenseId = i64;

/// A persisted expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, assigned on creation and never reused
    pub id: ExpenseId,

    /// Calendar date the expense occurred
    pub date: NaiveDate,

    /// Amount spent (never negative)
    pub amount: Amount,

    /// Free-form category label
    pub category: String,

    /// Optional description (empty when absent)
    pub note: String,
}

/// Builder for creating new expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: Amount,
    pub category: String,
    pub note: String,
}

impl NewExpense {
    pub fn new(date: NaiveDate, amount: Amount, category: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category: category.into(),
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Field changes for an existing expense. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDate>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
    pub note: Option<String>,
}

impl ExpenseUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.amount.is_none() && self.category.is_none() && self.note.is_none()
    }

    /// Overlay these changes on an existing record, producing the full replacement.
    pub fn apply_to(&self, current: &Expense) -> NewExpense {
        NewExpense {
            date: self.date.unwrap_or(current.date),
            amount: self.amount.unwrap_or(current.amount),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| current.category.clone()),
            note: self.note.clone().unwrap_or_else(|| current.note.clone()),
        }
    }
}

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// The full calendar month `year-month`.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::Validation` if `month` is outside 1-12 or the
    /// year is outside the supported calendar range.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(TallyError::Validation(format!(
                "Month must be 1-12, got {}",
                month
            )));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| TallyError::Validation(format!("Year {} is out of range", year)))?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last = next_first
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| TallyError::Validation(format!("Year {} is out of range", year)))?;
        Ok(Self {
            start: Some(first),
            end: Some(last),
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// `YYYY-MM` label when this range is exactly one calendar month.
    pub fn month_label(&self) -> Option<String> {
        let start = self.start?;
        let whole = DateRange::month(start.year(), start.month()).ok()?;
        (whole == *self).then(|| start.format("%Y-%m").to_string())
    }
}

/// Filter for querying expenses. All set predicates must hold.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Exact category match
    pub category_equals: Option<String>,

    /// Case-insensitive substring of the note or the category, matched
    /// as given. An empty string matches everything.
    pub text_contains: Option<String>,

    /// Inclusive date bounds
    pub date_range: DateRange,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category_equals = Some(category.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text_contains = Some(text.into());
        self
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.date_range.start = Some(date);
        self
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.date_range.end = Some(date);
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category_equals.is_none()
            && self.text_contains.is_none()
            && self.date_range.is_unbounded()
            && self.limit.is_none()
    }
}
