//! Data models for D-Day records

use crate::validation::ValidatedDDay;
use chrono::{DateTime, NaiveDate, Utc};
use dday_common::{CATEGORY_OTHER, CATEGORY_PERSONAL, CATEGORY_STUDY, CATEGORY_WORK};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Category of a D-Day record
///
/// The label set is closed. Labels travel on the wire and in the table as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "개인")]
    Personal,
    #[serde(rename = "학업")]
    Study,
    #[serde(rename = "업무")]
    Work,
    #[serde(rename = "기타")]
    Other,
}

impl Category {
    /// Every category, default first
    pub const ALL: [Category; 4] = [
        Category::Personal,
        Category::Study,
        Category::Work,
        Category::Other,
    ];

    /// Label stored in the database and sent to clients
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Personal => CATEGORY_PERSONAL,
            Category::Study => CATEGORY_STUDY,
            Category::Work => CATEGORY_WORK,
            Category::Other => CATEGORY_OTHER,
        }
    }

    /// Look up a category by its exact label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted countdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DDayRecord {
    /// Unique identifier, assigned once at creation
    pub id: String,
    /// Trimmed, non-empty title
    pub title: String,
    /// Day being counted down to
    pub target_date: NaiveDate,
    pub category: Category,
    /// Free text, may be empty
    pub memo: String,
    pub is_important: bool,
    /// Set at creation, never changed afterwards
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every mutation
    pub updated_at: DateTime<Utc>,
}

impl DDayRecord {
    /// Build a brand new record from validated input
    ///
    /// Assigns a fresh UUID and stamps both timestamps with the current time.
    #[must_use]
    pub fn from_validated(input: ValidatedDDay) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            target_date: input.target_date,
            category: input.category,
            memo: input.memo,
            is_important: input.is_important,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replacement of the mutable fields, keeping `id` and `created_at`
    #[must_use]
    pub fn replaced_with(&self, input: ValidatedDDay) -> Self {
        Self {
            id: self.id.clone(),
            title: input.title,
            target_date: input.target_date,
            category: input.category,
            memo: input.memo,
            is_important: input.is_important,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Raw create/update payload, before validation
///
/// Every field is optional on the wire, and `null` counts as missing, so that
/// absent values reach the validator and produce a descriptive message instead
/// of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DDayInput {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub target_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub memo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_important: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Pagination metadata returned next to a page of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Compute the metadata for a page of a result set with `total_count` rows
    #[must_use]
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        Self {
            page,
            page_size,
            total_count,
            total_pages: dday_common::total_pages(total_count, page_size),
        }
    }
}
