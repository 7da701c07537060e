//! Application-level utilities for the Tally CLI.
//!
//! This module provides:
//! - `AppContext`, which pairs parsed arguments with the lazily read config
//! - Path resolution for config and database files

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::{
    load_config, missing_config_message, missing_store_message, resolve_config_path,
    resolve_store_path,
};
