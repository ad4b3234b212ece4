//! Row mapping utilities for converting database rows to domain models

use crate::{
    error::{DDayError, Result},
    models::{Category, DDayRecord},
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| DDayError::store(format!("Failed to read column {name}: {e}")))
}

/// Map a `ddays_tb` row to a [`DDayRecord`]
///
/// A NULL memo maps to an empty string.
///
/// # Errors
///
/// Returns `DDayError::Store` if a column is missing, has the wrong type, or
/// holds a category label outside the known set
pub fn map_dday_row(row: &SqliteRow) -> Result<DDayRecord> {
    let label: String = column(row, "d_category")?;
    let category = Category::from_label(&label)
        .ok_or_else(|| DDayError::store(format!("Unknown category in row: {label}")))?;

    let memo: Option<String> = column(row, "d_memo")?;
    let target_date: NaiveDate = column(row, "d_target_date")?;
    let created_at: DateTime<Utc> = column(row, "d_created_at")?;
    let updated_at: DateTime<Utc> = column(row, "d_updated_at")?;

    Ok(DDayRecord {
        id: column(row, "d_id")?,
        title: column(row, "d_title")?,
        target_date,
        category,
        memo: memo.unwrap_or_default(),
        is_important: column(row, "d_is_important")?,
        created_at,
        updated_at,
    })
}
