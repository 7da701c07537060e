//! Default categories and sample data.

use chrono::NaiveDate;
use tracing::info;

use crate::amount::Amount;
use crate::error::Result;
use crate::storage::{ExpenseFilter, ExpenseId, ExpenseStore, NewExpense};

/// Category suggestions offered before the user has made their own.
pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Food",
    "Transport",
    "Groceries",
    "Bills",
    "Entertainment",
    "Health",
    "Shopping",
    "Rent",
    "Subscriptions",
    "Misc",
];

/// Default suggestions followed by any other categories already in use.
pub fn suggested_categories(in_use: &[String]) -> Vec<String> {
    let mut suggestions: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    let mut extra: Vec<String> = in_use
        .iter()
        .filter(|category| !DEFAULT_CATEGORIES.contains(&category.as_str()))
        .cloned()
        .collect();
    extra.sort();
    extra.dedup();
    suggestions.extend(extra);
    suggestions
}

/// Add a few example expenses dated `today`, but only into an empty store.
///
/// Returns the ids of the inserted samples (empty if the store already had data).
pub fn seed_samples<S: ExpenseStore + ?Sized>(store: &mut S, today: NaiveDate) -> Result<Vec<ExpenseId>> {
    if !store.query(&ExpenseFilter::new().limit(1))?.is_empty() {
        return Ok(Vec::new());
    }

    let samples = [
        NewExpense::new(today, Amount::from_minor(12_000), "Food").with_note("Lunch"),
        NewExpense::new(today, Amount::from_minor(40_000), "Transport").with_note("Monthly pass"),
        NewExpense::new(today, Amount::from_minor(250_000), "Rent")
            .with_note(today.format("%B rent").to_string()),
    ];

    let mut ids = Vec::with_capacity(samples.len());
    for sample in &samples {
        ids.push(store.add(sample)?);
    }
    info!(count = ids.len(), "seeded sample expenses");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    #[test]
    fn test_suggestions_append_custom_categories() {
        let in_use = vec![
            "Travel".to_string(),
            "Food".to_string(),
            "Books".to_string(),
            "Travel".to_string(),
        ];
        let suggestions = suggested_categories(&in_use);
        assert_eq!(suggestions.len(), DEFAULT_CATEGORIES.len() + 2);
        assert_eq!(suggestions[0], "Food");
        assert_eq!(&suggestions[DEFAULT_CATEGORIES.len()..], ["Books", "Travel"]);
    }

    #[test]
    fn test_seed_only_into_empty_store() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();

        let ids = seed_samples(&mut store, today).unwrap();
        assert_eq!(ids.len(), 3);

        let rent = store.query(&ExpenseFilter::new().category("Rent")).unwrap();
        assert_eq!(rent[0].note, "September rent");
        assert_eq!(rent[0].amount.to_string(), "2500.00");

        assert!(seed_samples(&mut store, today).unwrap().is_empty());
        assert_eq!(store.query(&ExpenseFilter::new()).unwrap().len(), 3);
    }
}
