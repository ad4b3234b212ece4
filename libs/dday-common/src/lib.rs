//! D-Day Common - Shared constants and helpers for the D-Day backend
//!
//! # Examples
//!
//! ```
//! use dday_common::{parse_date, total_pages, DEFAULT_PAGE_SIZE};
//!
//! assert_eq!(DEFAULT_PAGE_SIZE, 10);
//! assert!(parse_date("2025-06-01").is_some());
//! assert_eq!(total_pages(21, 10), 3);
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_exported_items() {
        assert_eq!(CATEGORY_PERSONAL, "개인");
        assert_eq!(MAX_PAGE_SIZE, 100);
        assert!(parse_date("2024-02-29").is_some());
        assert_eq!(parse_flag("1"), Some(true));
    }
}
