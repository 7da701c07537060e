//! Expense store trait definition.
//!
//! The `ExpenseStore` trait is the only way the summary engine and the CLI
//! touch persisted records. It is deliberately narrow: create, read, update,
//! delete, filtered query, and the one aggregation the summaries need.

use std::path::Path;

use super::types::{DateRange, Expense, ExpenseFilter, ExpenseId, ExpenseUpdate, NewExpense};
use crate::amount::Amount;
use crate::error::Result;

/// Expense store interface.
///
/// All implementations must ensure:
/// - Identifiers are assigned by the store and never change
/// - Amounts are never negative
/// - Every mutation is durable before the call returns
/// - A failed mutation leaves the stored row untouched
pub trait ExpenseStore {
    /// Open (creating if needed) the store at `path` and ensure its schema.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::StorageUnavailable` if:
    /// - The file cannot be created or opened
    /// - The file is not a database, or is corrupt
    /// - The schema version is newer than this build understands
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Release the underlying connection.
    fn close(self) -> Result<()>;

    /// Ensure the backing schema exists. Idempotent.
    fn initialize(&self) -> Result<()>;

    // --- Expense operations ---

    /// Insert a new expense.
    ///
    /// # Returns
    ///
    /// Returns the store-assigned id of the created expense.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::Validation` if:
    /// - Amount is negative or has more than two decimal places
    /// - Category is empty or too long
    /// - Note is too long
    fn add(&mut self, expense: &NewExpense) -> Result<ExpenseId>;

    /// Get an expense by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(expense))` if found, `Ok(None)` if not found.
    fn get(&self, id: ExpenseId) -> Result<Option<Expense>>;

    /// Apply field changes to an existing expense as one unit of work.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::NotFound` if `id` does not exist, or
    /// `TallyError::Validation` if the merged record is invalid. In both
    /// cases the stored row is unchanged.
    fn update(&mut self, id: ExpenseId, update: &ExpenseUpdate) -> Result<Expense>;

    /// Hard-delete an expense.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::NotFound` if `id` does not exist.
    fn delete(&mut self, id: ExpenseId) -> Result<()>;

    /// List expenses matching the filter.
    ///
    /// Results are ordered by date, newest first, with ties broken by id
    /// (highest first).
    fn query(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>>;

    // --- Aggregation ---

    /// Sum amounts per category for expenses dated within `range`.
    ///
    /// Categories with no matching expenses are omitted. Results are sorted
    /// by category name.
    fn category_totals(&self, range: &DateRange) -> Result<Vec<(String, Amount)>>;

    /// Distinct categories currently in use, sorted.
    fn categories(&self) -> Result<Vec<String>>;

    // --- Maintenance operations ---

    /// Check store integrity.
    ///
    /// Verifies:
    /// - The database file passes the engine's own integrity check
    /// - No row violates the record invariants
    fn check_integrity(&self) -> Result<()>;
}
