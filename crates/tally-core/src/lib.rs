//! # Tally Core
//!
//! Core library for Tally - a local, single-file personal expense tracker.
//!
//! This crate provides the domain types, the SQLite-backed expense store,
//! the monthly summary engine, and export serializers, independent of the
//! CLI interface.
//!
//! ## Architecture
//!
//! - **amount**: Exact decimal money values (never floating point)
//! - **storage**: `ExpenseStore` trait and the SQLite implementation
//! - **summary**: Monthly category breakdowns and flat export rows
//! - **export**: Interchangeable row serializers (CSV, manual CSV, JSONL)
//! - **samples**: Default categories and sample data seeding

pub mod amount;
pub mod error;
pub mod export;
pub mod fs;
pub mod samples;
pub mod storage;
pub mod summary;

pub use amount::Amount;
pub use error::{Result, TallyError};
pub use storage::ExpenseStore;
pub use summary::SummaryEngine;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
