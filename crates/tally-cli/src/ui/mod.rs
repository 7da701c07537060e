//! UI primitives for the Tally CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges and owo-colors styles
//! - **Render**: Tables, headers, receipts, hints
//! - **Format**: String and amount utilities
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{header, simple_table, Column, UiContext};
//!
//! let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
//! if ui_ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ui_ctx, "list", None));
//! println!("{}", simple_table(&ui_ctx, &columns, &rows));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, receipt, simple_table, table, Column,
};

pub use format::{format_amount, format_share, plain_field, single_line, truncate};
