//! SQLite storage backend.
//!
//! One database file, one `expenses` table, one connection held for the
//! life of the store. Amounts are stored as integer minor units so that
//! `SUM()` in SQL stays exact. Case-insensitive text matching uses a
//! Unicode-aware scalar function registered on the connection, because
//! SQLite's built-in `LIKE` only folds ASCII.

mod row;
mod validation;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use tracing::{debug, info, warn};

use crate::amount::Amount;
use crate::error::{Result, TallyError};
use crate::storage::traits::ExpenseStore;
use crate::storage::types::{
    DateRange, Expense, ExpenseFilter, ExpenseId, ExpenseUpdate, NewExpense,
};

use row::{ExpenseRow, DATE_FORMAT, EXPENSE_COLUMNS};
pub use validation::{normalize_category, validate_expense, MAX_CATEGORY_CHARS, MAX_NOTE_CHARS};

/// Schema version recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Name of the registered case-insensitive substring function.
const CONTAINS_FN: &str = "tally_contains";

/// SQLite-backed expense store.
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Connection,
}

impl SqliteStore {
    /// Open a private in-memory store. Nothing is persisted.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, None)
    }

    /// Path of the backing file, if this store is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        // FULL syncs the journal on every commit so a successful call
        // survives a crash immediately afterwards.
        conn.execute_batch("PRAGMA synchronous = FULL;")?;
        register_functions(&conn)?;

        let store = Self { path, conn };
        store.initialize()?;
        Ok(store)
    }

    fn fetch(conn: &Connection, id: ExpenseId) -> Result<Option<Expense>> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?1", EXPENSE_COLUMNS),
                [id],
                ExpenseRow::from_row,
            )
            .optional()?;
        row.map(Expense::try_from).transpose()
    }
}

/// Case-insensitive substring test used by text filters.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        CONTAINS_FN,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<String>(0)?;
            let needle = ctx.get::<String>(1)?;
            Ok(contains_ignore_case(&haystack, &needle))
        },
    )?;
    Ok(())
}

/// Append `date` bound conditions for an inclusive range.
fn push_date_range(
    range: &DateRange,
    conditions: &mut Vec<&'static str>,
    params: &mut Vec<Box<dyn ToSql>>,
) {
    if let Some(start) = range.start {
        conditions.push("date >= ?");
        params.push(Box::new(start.format(DATE_FORMAT).to_string()));
    }
    if let Some(end) = range.end {
        conditions.push("date <= ?");
        params.push(Box::new(end.format(DATE_FORMAT).to_string()));
    }
}

fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

impl ExpenseStore for SqliteStore {
    fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            TallyError::StorageUnavailable(format!("Cannot open {}: {}", path.display(), e))
        })?;
        Self::from_connection(conn, Some(path.to_path_buf())).map_err(|e| match e {
            TallyError::StorageUnavailable(msg) => {
                TallyError::StorageUnavailable(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    fn initialize(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(TallyError::StorageUnavailable(format!(
                "Database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount_minor INTEGER NOT NULL CHECK (amount_minor >= 0),
                category TEXT NOT NULL CHECK (length(category) > 0),
                note TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date, id);
            "#,
        )?;
        if version < SCHEMA_VERSION {
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            info!(schema_version = SCHEMA_VERSION, "created expense schema");
        }
        tx.commit()?;
        Ok(())
    }

    fn add(&mut self, expense: &NewExpense) -> Result<ExpenseId> {
        let valid = validate_expense(expense)?;
        self.conn.execute(
            "INSERT INTO expenses (date, amount_minor, category, note) VALUES (?1, ?2, ?3, ?4)",
            params![valid.date, valid.amount_minor, valid.category, valid.note],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, date = %valid.date, category = %valid.category, "added expense");
        Ok(id)
    }

    fn get(&self, id: ExpenseId) -> Result<Option<Expense>> {
        Self::fetch(&self.conn, id)
    }

    fn update(&mut self, id: ExpenseId, update: &ExpenseUpdate) -> Result<Expense> {
        let tx = self.conn.transaction()?;

        let current = Self::fetch(&tx, id)?.ok_or(TallyError::NotFound(id))?;
        let merged = update.apply_to(&current);
        let valid = validate_expense(&merged)?;

        tx.execute(
            "UPDATE expenses SET date = ?1, amount_minor = ?2, category = ?3, note = ?4 WHERE id = ?5",
            params![valid.date, valid.amount_minor, valid.category, valid.note, id],
        )?;
        tx.commit()?;
        debug!(id, "updated expense");

        Ok(Expense {
            id,
            date: merged.date,
            amount: Amount::from_minor(valid.amount_minor),
            category: valid.category,
            note: valid.note,
        })
    }

    fn delete(&mut self, id: ExpenseId) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(TallyError::NotFound(id));
        }
        debug!(id, "deleted expense");
        Ok(())
    }

    fn query(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut conditions: Vec<&'static str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref category) = filter.category_equals {
            conditions.push("category = ?");
            params.push(Box::new(category.trim().to_string()));
        }

        if let Some(ref needle) = filter.text_contains {
            // An empty needle matches every row, so it adds no predicate.
            if !needle.is_empty() {
                conditions.push("(tally_contains(note, ?) OR tally_contains(category, ?))");
                params.push(Box::new(needle.clone()));
                params.push(Box::new(needle.clone()));
            }
        }

        push_date_range(&filter.date_range, &mut conditions, &mut params);

        let mut query = format!("SELECT {} FROM expenses", EXPENSE_COLUMNS);
        query.push_str(&where_clause(&conditions));
        query.push_str(" ORDER BY date DESC, id DESC");

        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            params.push(Box::new(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            ExpenseRow::from_row,
        )?;

        let mut expenses = Vec::new();
        for row in rows {
            expenses.push(Expense::try_from(row?)?);
        }
        debug!(count = expenses.len(), "queried expenses");

        Ok(expenses)
    }

    fn category_totals(&self, range: &DateRange) -> Result<Vec<(String, Amount)>> {
        let mut conditions: Vec<&'static str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();
        push_date_range(range, &mut conditions, &mut params);

        // Summed as Decimal here; SQLite's integer SUM overflows past i64 cents.
        let mut query = String::from("SELECT category, amount_minor FROM expenses");
        query.push_str(&where_clause(&conditions));

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut totals: BTreeMap<String, Amount> = BTreeMap::new();
        for row in rows {
            let (category, minor) = row?;
            let total = totals.entry(category).or_default();
            *total = *total + Amount::from_minor(minor);
        }
        Ok(totals.into_iter().collect())
    }

    fn categories(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM expenses ORDER BY category")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    fn check_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if result != "ok" {
            warn!(%result, "sqlite integrity check failed");
            return Err(TallyError::StorageUnavailable(format!(
                "Database integrity check failed: {}",
                result
            )));
        }

        let invalid_rows: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM expenses
             WHERE amount_minor < 0
                OR trim(category) = ''
                OR date(date) IS NULL
                OR date(date) IS NOT date",
            [],
            |row| row.get(0),
        )?;
        if invalid_rows > 0 {
            warn!(invalid_rows, "expenses violate record invariants");
            return Err(TallyError::StorageUnavailable(format!(
                "{} expense row(s) have invalid amount, category, or date",
                invalid_rows
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    /// The three-record set used throughout: two January food expenses and February rent.
    fn seeded() -> (SqliteStore, [ExpenseId; 3]) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let a = store
            .add(&NewExpense::new(date("2024-01-05"), amount("12.50"), "Food"))
            .unwrap();
        let b = store
            .add(&NewExpense::new(date("2024-01-20"), amount("7.25"), "Food").with_note("coffee"))
            .unwrap();
        let c = store
            .add(&NewExpense::new(date("2024-02-01"), amount("40.00"), "Rent"))
            .unwrap();
        (store, [a, b, c])
    }

    #[test]
    fn test_contains_ignore_case_unicode() {
        assert!(contains_ignore_case("Café Crème", "CRÈME"));
        assert!(contains_ignore_case("coffee", "OFF"));
        assert!(!contains_ignore_case("coffee", "tea"));
    }

    #[test]
    fn test_add_then_query_all() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let id = store
            .add(&NewExpense::new(date("2024-03-01"), amount("3.10"), "Transport").with_note("bus"))
            .unwrap();

        let all = store.query(&ExpenseFilter::new()).unwrap();
        assert_eq!(
            all,
            vec![Expense {
                id,
                date: date("2024-03-01"),
                amount: amount("3.10"),
                category: "Transport".to_string(),
                note: "bus".to_string(),
            }]
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let (_store, [a, b, c]) = seeded();
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_add_negative_amount_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .add(&NewExpense::new(date("2024-01-01"), amount("-0.01"), "Food"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.query(&ExpenseFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_query_orders_newest_first_with_id_tiebreak() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = store
            .add(&NewExpense::new(date("2024-05-01"), amount("1"), "A"))
            .unwrap();
        let older = store
            .add(&NewExpense::new(date("2024-04-01"), amount("1"), "A"))
            .unwrap();
        let second = store
            .add(&NewExpense::new(date("2024-05-01"), amount("1"), "A"))
            .unwrap();

        let ids: Vec<ExpenseId> = store
            .query(&ExpenseFilter::new())
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![second, first, older]);
    }

    #[test]
    fn test_text_filter_matches_note() {
        let (store, [_, coffee, _]) = seeded();
        let found = store.query(&ExpenseFilter::new().text("coffee")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, coffee);
    }

    #[test]
    fn test_text_filter_matches_category_case_insensitive() {
        let (store, [_, _, rent]) = seeded();
        let found = store.query(&ExpenseFilter::new().text("rEN")).unwrap();
        assert_eq!(found.iter().map(|e| e.id).collect::<Vec<_>>(), vec![rent]);
    }

    #[test]
    fn test_empty_text_filter_matches_everything() {
        let (store, _) = seeded();
        assert_eq!(store.query(&ExpenseFilter::new().text("")).unwrap().len(), 3);
    }

    #[test]
    fn test_text_filter_keeps_surrounding_whitespace() {
        let (mut store, _) = seeded();
        let spaced = store
            .add(&NewExpense::new(date("2024-01-21"), amount("3.00"), "Food").with_note("iced coffee"))
            .unwrap();
        store
            .add(&NewExpense::new(date("2024-01-22"), amount("4.00"), "Food").with_note("coffeehouse"))
            .unwrap();

        let found = store.query(&ExpenseFilter::new().text(" coffee")).unwrap();
        assert_eq!(found.iter().map(|e| e.id).collect::<Vec<_>>(), vec![spaced]);
        assert!(store.query(&ExpenseFilter::new().text("  ")).unwrap().is_empty());
    }

    #[test]
    fn test_filters_are_anded() {
        let (store, [food_early, _, _]) = seeded();
        let filter = ExpenseFilter::new()
            .category("Food")
            .until(date("2024-01-10"));
        let found = store.query(&filter).unwrap();
        assert_eq!(found.iter().map(|e| e.id).collect::<Vec<_>>(), vec![food_early]);

        let none = ExpenseFilter::new().category("Rent").text("coffee");
        assert!(store.query(&none).unwrap().is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let (store, [a, b, _]) = seeded();
        let filter = ExpenseFilter::new()
            .since(date("2024-01-05"))
            .until(date("2024-01-20"));
        let ids: Vec<ExpenseId> = store.query(&filter).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_limit() {
        let (store, [_, _, rent]) = seeded();
        let found = store.query(&ExpenseFilter::new().limit(1)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, rent);
    }

    #[test]
    fn test_update_replaces_fields() {
        let (mut store, [id, _, _]) = seeded();
        let updated = store
            .update(
                id,
                &ExpenseUpdate::new()
                    .amount(amount("13"))
                    .category("Groceries")
                    .note("market"),
            )
            .unwrap();
        assert_eq!(updated.amount, amount("13.00"));
        assert_eq!(store.get(id).unwrap(), Some(updated));
    }

    #[test]
    fn test_update_negative_amount_leaves_row_unchanged() {
        let (mut store, [id, _, _]) = seeded();
        let before = store.get(id).unwrap();

        let err = store
            .update(id, &ExpenseUpdate::new().amount(amount("-1")))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get(id).unwrap(), before);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .update(99, &ExpenseUpdate::new().note("x"))
            .unwrap_err();
        assert!(matches!(err, TallyError::NotFound(99)));
    }

    #[test]
    fn test_delete_twice_is_not_found() {
        let (mut store, [id, _, _]) = seeded();
        store.delete(id).unwrap();
        assert!(store
            .query(&ExpenseFilter::new())
            .unwrap()
            .iter()
            .all(|e| e.id != id));

        let err = store.delete(id).unwrap_err();
        assert!(matches!(err, TallyError::NotFound(missing) if missing == id));
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let (mut store, [_, _, last]) = seeded();
        store.delete(last).unwrap();
        let next = store
            .add(&NewExpense::new(date("2024-03-01"), amount("1"), "Misc"))
            .unwrap();
        assert!(next > last);
    }

    #[test]
    fn test_category_totals_for_month() {
        let (store, _) = seeded();
        let january = DateRange::month(2024, 1).unwrap();
        assert_eq!(
            store.category_totals(&january).unwrap(),
            vec![("Food".to_string(), amount("19.75"))]
        );
        let all = store.category_totals(&DateRange::default()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_category_totals_exceed_i64_cents() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .add(&NewExpense::new(date("2024-01-03"), amount("92233720368547758.07"), "Food"))
            .unwrap();
        store
            .add(&NewExpense::new(date("2024-01-04"), amount("0.01"), "Food"))
            .unwrap();

        let totals = store
            .category_totals(&DateRange::month(2024, 1).unwrap())
            .unwrap();
        assert_eq!(
            totals,
            vec![("Food".to_string(), amount("92233720368547758.08"))]
        );
    }

    #[test]
    fn test_five_digit_year_is_not_stored() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let err = store
            .add(&NewExpense::new(far, amount("1.00"), "Food"))
            .unwrap_err();
        assert!(err.is_validation());

        let id = store
            .add(&NewExpense::new(date("2024-01-01"), amount("1.00"), "Food"))
            .unwrap();
        let err = store
            .update(id, &ExpenseUpdate::new().date(far))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get(id).unwrap().unwrap().date, date("2024-01-01"));
        assert!(store.check_integrity().is_ok());
    }

    #[test]
    fn test_categories_distinct_sorted() {
        let (store, _) = seeded();
        assert_eq!(store.categories().unwrap(), vec!["Food", "Rent"]);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (store, _) = seeded();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.query(&ExpenseFilter::new()).unwrap().len(), 3);
    }

    #[test]
    fn test_check_integrity_ok() {
        let (store, _) = seeded();
        store.check_integrity().unwrap();
    }

    #[test]
    fn test_check_integrity_flags_bad_dates() {
        let (store, _) = seeded();
        store
            .conn
            .execute("UPDATE expenses SET date = '2024-1-5' WHERE category = 'Rent'", [])
            .unwrap();
        let err = store.check_integrity().unwrap_err();
        assert!(matches!(err, TallyError::StorageUnavailable(_)));
    }
}
