//! String formatting utilities for UI rendering.

use tally_core::Amount;

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Sanitize a string for single-line output (replace newlines with spaces).
pub fn single_line(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "")
}

/// Amount with an optional currency prefix, always two decimals.
pub fn format_amount(amount: Amount, currency: Option<&str>) -> String {
    match currency {
        Some(prefix) => format!("{}{}", prefix, amount),
        None => amount.to_string(),
    }
}

/// Render a share such as `60.5` as `60.5%`.
pub fn format_share(share: Option<impl std::fmt::Display>) -> String {
    match share {
        Some(percent) => format!("{}%", percent),
        None => "-".to_string(),
    }
}

/// Plain-mode field value: spaces become underscores so columns stay splittable.
pub fn plain_field(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        single_line(s).replace(' ', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("café crème", 7), "café...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("hello\nworld"), "hello world");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Amount::from_minor(1250), None), "12.50");
        assert_eq!(format_amount(Amount::from_minor(5), Some("$")), "$0.05");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(Some("60.5")), "60.5%");
        assert_eq!(format_share(None::<&str>), "-");
    }

    #[test]
    fn test_plain_field() {
        assert_eq!(plain_field(""), "-");
        assert_eq!(plain_field("iced coffee"), "iced_coffee");
    }
}
