//! Test helpers: throwaway databases and sample records

use crate::database::DDayDatabase;
use crate::error::Result;
use crate::models::{DDayInput, DDayRecord};
use crate::validation::validate_input;
use std::path::Path;

/// Open a database at `db_path` with the schema in place
///
/// # Errors
/// Returns `DDayError::Store` if the database cannot be opened or the schema
/// cannot be created
pub async fn create_test_database<P: AsRef<Path>>(db_path: P) -> Result<DDayDatabase> {
    let db = DDayDatabase::new(db_path.as_ref()).await?;
    db.ensure_schema().await?;
    Ok(db)
}

/// A valid create payload
#[must_use]
pub fn sample_input(title: &str, target_date: &str, category: &str) -> DDayInput {
    DDayInput {
        title: title.to_string(),
        target_date: target_date.to_string(),
        category: category.to_string(),
        memo: String::new(),
        is_important: false,
    }
}

/// Inputs behind [`seed_records`], in insertion order
#[must_use]
pub fn sample_inputs() -> Vec<DDayInput> {
    let mut exam = sample_input("Exam Day", "2025-03-10", "학업");
    exam.memo = "Chapters 1-4".to_string();
    exam.is_important = true;

    let mut launch = sample_input("Product launch", "2025-09-01", "업무");
    launch.is_important = true;

    let mut trip = sample_input("Trip", "2025-07-20", "개인");
    trip.memo = "Pack sunscreen".to_string();

    vec![
        exam,
        sample_input("Finals", "2025-06-01", "학업"),
        trip,
        launch,
        sample_input("Birthday", "2025-12-24", "기타"),
    ]
}

/// Insert the [`sample_inputs`] and return the stored records
///
/// # Errors
/// Returns an error if a sample fails validation or an insert fails
pub async fn seed_records(db: &DDayDatabase) -> Result<Vec<DDayRecord>> {
    let mut records = Vec::new();
    for input in sample_inputs() {
        let record = DDayRecord::from_validated(validate_input(&input)?);
        db.create(&record).await?;
        records.push(record);
    }
    Ok(records)
}
