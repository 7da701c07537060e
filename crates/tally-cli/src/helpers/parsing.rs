//! Parsing helpers for dates, months, amounts, and filters.

use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};

use tally_core::storage::{DateRange, ExpenseFilter};
use tally_core::Amount;

use crate::cli::FilterArgs;
use crate::errors::CliError;

/// Parse a calendar date (YYYY-MM-DD).
pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value)).into()
    })
}

/// Parse an optional date, defaulting to today in local time.
pub fn parse_date_or_today(value: Option<&str>) -> anyhow::Result<NaiveDate> {
    match value {
        Some(v) => parse_date(v),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse a month label (YYYY-MM) into year and month.
pub fn parse_month(value: &str) -> anyhow::Result<(i32, u32)> {
    let invalid = || CliError::invalid_input(format!("Invalid month (expected YYYY-MM): {}", value));
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(invalid().into());
    }
    Ok((year, month))
}

/// Parse an optional month, defaulting to the current one.
pub fn parse_month_or_current(value: Option<&str>) -> anyhow::Result<(i32, u32)> {
    match value {
        Some(v) => parse_month(v),
        None => {
            let today = Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
    }
}

/// Parse a money amount. Sign and precision checks are left to the store.
pub fn parse_amount(value: &str) -> anyhow::Result<Amount> {
    Ok(Amount::from_str(value)?)
}

/// Build a store filter from the shared filter flags.
pub fn build_filter(args: &FilterArgs) -> anyhow::Result<ExpenseFilter> {
    let mut filter = ExpenseFilter::new();
    if let Some(ref category) = args.category {
        filter = filter.category(category.clone());
    }
    if let Some(ref text) = args.search {
        filter = filter.text(text.clone());
    }
    if let Some(ref month) = args.month {
        let (year, month) = parse_month(month)?;
        filter = filter.within(DateRange::month(year, month)?);
    }
    if let Some(ref since) = args.since {
        filter = filter.since(parse_date(since)?);
    }
    if let Some(ref until) = args.until {
        filter = filter.until(parse_date(until)?);
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    }
    Ok(filter)
}
