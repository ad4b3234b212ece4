//! Utility functions shared by the D-Day crates

use crate::constants::DATE_FORMAT;
use chrono::NaiveDate;

/// Parse a date string in strict YYYY-MM-DD format
///
/// Only the zero-padded ten-character shape is accepted; chrono alone also
/// takes unpadded fields and a leading sign. Returns `None` for any other
/// shape or for a calendar date that does not exist.
#[must_use]
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    if !has_date_shape(date_str) {
        return None;
    }
    NaiveDate::parse_from_str(date_str, DATE_FORMAT).ok()
}

fn has_date_shape(date_str: &str) -> bool {
    let bytes = date_str.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Number of pages needed to show `total` items, `page_size` at a time
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

/// Parse a loose boolean flag (`true`/`1`, `false`/`0`)
///
/// Anything else is treated as "not given".
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
