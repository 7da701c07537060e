//! Storage abstractions and the SQLite backend.
//!
//! The `ExpenseStore` trait is the narrow interface the rest of the system
//! talks to; `SqliteStore` is the embedded single-file implementation.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::ExpenseStore;
pub use types::{DateRange, Expense, ExpenseFilter, ExpenseId, ExpenseUpdate, NewExpense};
