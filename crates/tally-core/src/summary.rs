//! Monthly summaries and flat export rows.
//!
//! The summary engine holds no state of its own; every result is a function
//! of the store's current contents and the arguments.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amount::Amount;
use crate::error::Result;
use crate::storage::{DateRange, Expense, ExpenseFilter, ExpenseStore};

/// Per-category spending for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBreakdown {
    pub year: i32,
    pub month: u32,
    /// Category → total. Categories without expenses in the month are absent.
    pub totals: BTreeMap<String, Amount>,
}

impl MonthlyBreakdown {
    /// `YYYY-MM` label for the month.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum over all categories.
    pub fn total(&self) -> Amount {
        self.totals.values().sum()
    }

    /// Categories ordered by descending total, ties broken by name.
    pub fn ranked(&self) -> Vec<(&str, Amount)> {
        let mut ranked: Vec<(&str, Amount)> = self
            .totals
            .iter()
            .map(|(category, amount)| (category.as_str(), *amount))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Percentage of the month total spent in `category`, to one decimal place.
    ///
    /// Returns `None` for unknown categories or when the month total is zero.
    pub fn share(&self, category: &str) -> Option<Decimal> {
        let amount = self.totals.get(category)?;
        let total = self.total();
        if total.is_zero() {
            return None;
        }
        let percent = amount.value() * Decimal::ONE_HUNDRED / total.value();
        Some(percent.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// One flat row of exported data, in export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Amount,
    pub note: String,
}

impl From<Expense> for ExportRow {
    fn from(expense: Expense) -> Self {
        Self {
            date: expense.date,
            category: expense.category,
            amount: expense.amount,
            note: expense.note,
        }
    }
}

/// Aggregations over an expense store.
pub struct SummaryEngine<'a, S: ExpenseStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ExpenseStore + ?Sized> SummaryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Per-category totals for expenses dated within `year-month`.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::Validation` if `month` is outside 1-12, or any
    /// store error unchanged.
    pub fn monthly_breakdown(&self, year: i32, month: u32) -> Result<MonthlyBreakdown> {
        let range = DateRange::month(year, month)?;
        let totals: BTreeMap<String, Amount> = self
            .store
            .category_totals(&range)?
            .into_iter()
            .collect();
        debug!(year, month, categories = totals.len(), "built monthly breakdown");
        Ok(MonthlyBreakdown {
            year,
            month,
            totals,
        })
    }

    /// Flat rows for serialization, in the same order as `query` returns them.
    pub fn export_rows(&self, filter: &ExpenseFilter) -> Result<Vec<ExportRow>> {
        let rows: Vec<ExportRow> = self
            .store
            .query(filter)?
            .into_iter()
            .map(ExportRow::from)
            .collect();
        debug!(count = rows.len(), "projected export rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::storage::{NewExpense, SqliteStore};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn scenario() -> Vec<NewExpense> {
        vec![
            NewExpense::new(date("2024-01-05"), amount("12.50"), "Food"),
            NewExpense::new(date("2024-01-20"), amount("7.25"), "Food").with_note("coffee"),
            NewExpense::new(date("2024-02-01"), amount("40.00"), "Rent"),
        ]
    }

    fn store_with(expenses: &[NewExpense]) -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for expense in expenses {
            store.add(expense).unwrap();
        }
        store
    }

    #[test]
    fn test_scenario_breakdowns() {
        let store = store_with(&scenario());
        let engine = SummaryEngine::new(&store);

        let january = engine.monthly_breakdown(2024, 1).unwrap();
        assert_eq!(
            january.totals,
            BTreeMap::from([("Food".to_string(), amount("19.75"))])
        );

        let february = engine.monthly_breakdown(2024, 2).unwrap();
        assert_eq!(
            february.totals,
            BTreeMap::from([("Rent".to_string(), amount("40.00"))])
        );

        assert!(engine.monthly_breakdown(2024, 3).unwrap().is_empty());
    }

    #[test]
    fn test_breakdown_rejects_bad_month() {
        let store = store_with(&[]);
        let engine = SummaryEngine::new(&store);
        assert!(engine.monthly_breakdown(2024, 0).unwrap_err().is_validation());
        assert!(engine.monthly_breakdown(2024, 13).unwrap_err().is_validation());
    }

    #[test]
    fn test_breakdown_is_insertion_order_independent() {
        let mut records = scenario();
        records.push(NewExpense::new(date("2024-01-31"), amount("0.10"), "Misc"));
        records.push(NewExpense::new(date("2024-01-01"), amount("0.20"), "Misc"));

        let forward = store_with(&records);
        records.reverse();
        let backward = store_with(&records);
        records.rotate_left(2);
        let rotated = store_with(&records);

        let expected = SummaryEngine::new(&forward).monthly_breakdown(2024, 1).unwrap();
        assert_eq!(
            SummaryEngine::new(&backward).monthly_breakdown(2024, 1).unwrap(),
            expected
        );
        assert_eq!(
            SummaryEngine::new(&rotated).monthly_breakdown(2024, 1).unwrap(),
            expected
        );
        assert_eq!(expected.totals["Misc"], amount("0.30"));
    }

    #[test]
    fn test_ranked_total_and_share() {
        let mut records = scenario();
        records.push(NewExpense::new(date("2024-01-10"), amount("30.25"), "Rent"));
        let store = store_with(&records);
        let breakdown = SummaryEngine::new(&store).monthly_breakdown(2024, 1).unwrap();

        assert_eq!(breakdown.total(), amount("50.00"));
        assert_eq!(
            breakdown.ranked(),
            vec![("Rent", amount("30.25")), ("Food", amount("19.75"))]
        );
        assert_eq!(breakdown.share("Rent"), Some(Decimal::new(605, 1)));
        assert_eq!(breakdown.share("Food"), Some(Decimal::new(395, 1)));
        assert_eq!(breakdown.share("Travel"), None);
        assert_eq!(breakdown.label(), "2024-01");
    }

    #[test]
    fn test_share_none_when_total_zero() {
        let store = store_with(&[NewExpense::new(date("2024-01-01"), amount("0"), "Free")]);
        let breakdown = SummaryEngine::new(&store).monthly_breakdown(2024, 1).unwrap();
        assert_eq!(breakdown.share("Free"), None);
    }

    #[test]
    fn test_export_rows_follow_query_order() {
        let store = store_with(&scenario());
        let engine = SummaryEngine::new(&store);
        let rows = engine.export_rows(&ExpenseFilter::new()).unwrap();

        let dates: Vec<String> = rows.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-01-20", "2024-01-05"]);
        assert_eq!(rows[1].note, "coffee");
        assert_eq!(rows[1].amount, amount("7.25"));
    }

    #[test]
    fn test_export_rows_respect_filter() {
        let store = store_with(&scenario());
        let rows = SummaryEngine::new(&store)
            .export_rows(&ExpenseFilter::new().text("coffee"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Food");
    }
}
