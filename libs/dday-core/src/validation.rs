//! Request validation shared by every HTTP surface
//!
//! Both the API-style and the REST-style handlers turn a raw [`DDayInput`]
//! into a [`ValidatedDDay`] through [`validate_input`], so the two surfaces
//! accept exactly the same payloads.

use crate::error::{DDayError, Result};
use crate::models::{Category, DDayInput};
use chrono::NaiveDate;
use dday_common::parse_date;

/// Input that passed validation and can be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDDay {
    pub title: String,
    pub target_date: NaiveDate,
    pub category: Category,
    pub memo: String,
    pub is_important: bool,
}

/// Validate a create/update payload
///
/// Stops at the first violation. Runs before any store access.
///
/// # Errors
///
/// Returns `DDayError::Validation` if the title is blank, the target date is
/// missing or not `YYYY-MM-DD`, or the category is not a known label
pub fn validate_input(input: &DDayInput) -> Result<ValidatedDDay> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(DDayError::validation("Title is required"));
    }

    if input.target_date.is_empty() {
        return Err(DDayError::validation("Target date is required"));
    }

    let target_date = parse_date(&input.target_date).ok_or_else(|| {
        DDayError::validation("Invalid target date format. Use YYYY-MM-DD")
    })?;

    let category = validate_category(&input.category)?;

    Ok(ValidatedDDay {
        title: title.to_string(),
        target_date,
        category,
        memo: input.memo.trim().to_string(),
        is_important: input.is_important,
    })
}

/// Resolve a category label, defaulting when the label is empty
///
/// # Errors
///
/// Returns `DDayError::Validation` for a non-empty label outside the closed set
pub fn validate_category(label: &str) -> Result<Category> {
    if label.is_empty() {
        return Ok(Category::default());
    }
    Category::from_label(label).ok_or_else(|| DDayError::validation("Invalid category"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, target_date: &str, category: &str) -> DDayInput {
        DDayInput {
            title: title.to_string(),
            target_date: target_date.to_string(),
            category: category.to_string(),
            memo: String::new(),
            is_important: false,
        }
    }

    fn message(err: DDayError) -> String {
        match err {
            DDayError::Validation { message } => message,
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_input_is_trimmed() {
        let mut raw = input("  Finals  ", "2025-06-01", "학업");
        raw.memo = "  bring pencils ".to_string();
        raw.is_important = true;

        let validated = validate_input(&raw).unwrap();

        assert_eq!(validated.title, "Finals");
        assert_eq!(validated.memo, "bring pencils");
        assert_eq!(validated.category, Category::Study);
        assert_eq!(
            validated.target_date,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(validated.is_important);
    }

    #[test]
    fn test_blank_title_rejected() {
        let err = validate_input(&input("   ", "2025-06-01", "")).unwrap_err();
        assert_eq!(message(err), "Title is required");
    }

    #[test]
    fn test_missing_date_rejected() {
        let err = validate_input(&input("Trip", "", "")).unwrap_err();
        assert_eq!(message(err), "Target date is required");
    }

    #[test]
    fn test_malformed_dates_rejected() {
        for bad in [
            "2024/01/01",
            "not-a-date",
            "2024-02-30",
            "01-01-2024",
            "2025-6-1",
            "+2025-06-01",
            "2025-06-1",
        ] {
            let err = validate_input(&input("Trip", bad, "")).unwrap_err();
            assert_eq!(message(err), "Invalid target date format. Use YYYY-MM-DD");
        }
    }

    #[test]
    fn test_empty_category_defaults() {
        let validated = validate_input(&input("Trip", "2025-08-15", "")).unwrap();
        assert_eq!(validated.category, Category::Personal);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = validate_input(&input("Trip", "2025-08-15", "travel")).unwrap_err();
        assert_eq!(message(err), "Invalid category");
    }

    #[test]
    fn test_first_violation_wins() {
        // Blank title and bad category: the title check runs first.
        let err = validate_input(&input("", "nope", "travel")).unwrap_err();
        assert_eq!(message(err), "Title is required");
    }
}
