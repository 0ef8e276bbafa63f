//! Small text helpers shared by every page: dates, slugs, and "latest N" lists.
//!
//! ## Dates
//!
//! Front matter and content-store records carry dates in several shapes.
//! [`parse_date`] accepts all of the ones we have seen in practice and
//! normalizes them to UTC:
//!
//! ```text
//! 2023-05-01                 → 2023-05-01T00:00:00Z
//! 2023-05-01T14:30:00+02:00  → 2023-05-01T12:30:00Z
//! 2023-05-01 14:30:00        → 2023-05-01T14:30:00Z
//! Jul 08 2022                → 2022-07-08T00:00:00Z
//! May 1, 2023                → 2023-05-01T00:00:00Z
//! ```
//!
//! Display always uses the long US form (`May 1, 2023`), rendered in UTC so
//! the output does not depend on the build machine's timezone.
//!
//! ## Slugs
//!
//! [`slugify`] lowercases and collapses every run of non-alphanumeric
//! characters into a single dash: `"Hello, World!  Foo"` → `"hello-world-foo"`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("Invalid date: {0:?}")]
pub struct DateParseError(pub String);

const DATE_ONLY_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d %Y", "%B %d, %Y", "%b %d, %Y"];
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date in any of the accepted shapes into a UTC timestamp.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }
    for fmt in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }
    Err(DateParseError(input.to_string()))
}

/// Long-form US date: `May 1, 2023`.
pub fn long_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Parse `input` and render it as a long-form US date.
pub fn format_date(input: &str) -> Result<String, DateParseError> {
    parse_date(input).map(|d| long_date(&d))
}

/// Turn arbitrary text into a URL slug.
///
/// - Lowercases everything
/// - Keeps alphanumeric characters (including non-ASCII letters)
/// - Replaces every other run of characters with a single dash
/// - Strips leading and trailing dashes
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Sort `items` by `key`, most recent (largest) first, and keep at most `limit`.
///
/// The sort is stable: items with equal keys keep their input order.
/// Fewer than `limit` items are returned as-is, never padded.
pub fn latest<T, K, F>(mut items: Vec<T>, limit: usize, key: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn format_date_long_us_form() {
        assert_eq!(format_date("2023-05-01").unwrap(), "May 1, 2023");
    }

    #[test]
    fn format_date_two_digit_day() {
        assert_eq!(format_date("2022-12-25").unwrap(), "December 25, 2022");
    }

    #[test]
    fn format_date_rejects_garbage() {
        assert_eq!(
            format_date("not a date"),
            Err(DateParseError("not a date".to_string()))
        );
    }

    #[test]
    fn parse_date_rfc3339_normalizes_to_utc() {
        let d = parse_date("2023-05-01T01:30:00+02:00").unwrap();
        assert_eq!(d.day(), 30);
        assert_eq!(d.month(), 4);
        assert_eq!(d.hour(), 23);
    }

    #[test]
    fn parse_date_space_separated_datetime() {
        let d = parse_date("2023-05-01 14:30:00").unwrap();
        assert_eq!(d.hour(), 14);
        assert_eq!(d.minute(), 30);
    }

    #[test]
    fn parse_date_short_month_form() {
        let d = parse_date("Jul 08 2022").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2022, 7, 8));
    }

    #[test]
    fn parse_date_long_month_form() {
        let d = parse_date("May 1, 2023").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2023, 5, 1));
    }

    #[test]
    fn parse_date_trims_whitespace() {
        assert!(parse_date("  2023-05-01 \n").is_ok());
    }

    #[test]
    fn slugify_collapses_punctuation_and_spaces() {
        assert_eq!(slugify("Hello, World!  Foo"), "hello-world-foo");
    }

    #[test]
    fn slugify_strips_edges() {
        assert_eq!(slugify("  --Rust & WebAssembly--  "), "rust-webassembly");
    }

    #[test]
    fn slugify_keeps_digits_and_unicode_letters() {
        assert_eq!(slugify("Año 2023: Café"), "año-2023-café");
    }

    #[test]
    fn slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn latest_sorts_descending_and_truncates() {
        let out = latest(vec![3, 9, 1, 7, 5, 8], 3, |n| *n);
        assert_eq!(out, vec![9, 8, 7]);
    }

    #[test]
    fn latest_keeps_input_order_on_ties() {
        let items = vec![("a", 1), ("b", 2), ("c", 1), ("d", 2)];
        let out = latest(items, 10, |(_, k)| *k);
        assert_eq!(out, vec![("b", 2), ("d", 2), ("a", 1), ("c", 1)]);
    }

    #[test]
    fn latest_returns_everything_when_short() {
        let out = latest(vec![1, 2], 5, |n| *n);
        assert_eq!(out, vec![2, 1]);
    }
}
