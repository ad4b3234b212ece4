//! D-Day Core - Core library for D-Day countdown records
//!
//! Models, request validation, the dynamic query builder and the SQLite
//! backed record store used by the HTTP server.
//!
//! # Quick Start
//!
//! ```no_run
//! use dday_core::{validate_input, DDayDatabase, DDayError, DDayInput, DDayRecord, ListQuery};
//!
//! # async fn example() -> Result<(), DDayError> {
//! let db = DDayDatabase::from_connection_string("sqlite://dday.db?mode=rwc").await?;
//! db.ensure_schema().await?;
//!
//! let input = DDayInput {
//!     title: "Finals".to_string(),
//!     target_date: "2025-06-01".to_string(),
//!     category: "학업".to_string(),
//!     ..DDayInput::default()
//! };
//! let record = DDayRecord::from_validated(validate_input(&input)?);
//! db.create(&record).await?;
//!
//! let page = db.list(&ListQuery::default().parts()).await?;
//! println!("Found {} D-Days", page.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod observability;
pub mod query;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod validation;

pub use config::{DDayConfig, DatabaseConfig, ServerConfig};
pub use database::{
    DDayDatabase, DDayQueryBuilder, DatabasePoolConfig, PoolHealthStatus, QueryPart,
    SqliteOptimizations,
};
pub use error::{DDayError, Result};
pub use models::{Category, DDayInput, DDayRecord, Pagination};
pub use observability::{init_tracing, ObservabilityConfig, ObservabilityError};
pub use query::{ListParams, ListQuery};
pub use validation::{validate_category, validate_input, ValidatedDDay};
