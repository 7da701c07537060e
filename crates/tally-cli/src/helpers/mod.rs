//! Prompts and argument parsing shared by command handlers.
//!
//! This module provides utilities for:
//! - Confirmation prompts (`input`)
//! - Date, month, amount, and filter parsing (`parsing`)

mod input;
mod parsing;

// Re-export public API
pub use input::confirm;
pub use parsing::{
    build_filter, parse_amount, parse_date, parse_date_or_today, parse_month_or_current,
};
