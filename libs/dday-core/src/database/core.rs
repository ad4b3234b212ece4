use crate::{
    database::{
        mappers::map_dday_row,
        query_builders::{DDayQueryBuilder, QueryPart, QueryValue},
    },
    error::{DDayError, Result as DDayResult},
    models::DDayRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    pool::PoolOptions,
    query::Query,
    sqlite::{SqliteArguments, SqliteQueryResult},
    Row, Sqlite, SqlitePool, Transaction,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const SELECT_DDAYS: &str = "SELECT d_id, d_title, d_target_date, d_category, d_memo, \
     d_is_important, d_created_at, d_updated_at FROM ddays_tb";

const COUNT_DDAYS: &str = "SELECT COUNT(*) FROM ddays_tb";

/// Order applied when the caller does not ask for one
pub const DEFAULT_ORDER: &str = "d_target_date ASC";

const INSERT_DDAY: &str = r"
    INSERT INTO ddays_tb (
        d_id, d_title, d_target_date, d_category, d_memo,
        d_is_important, d_created_at, d_updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE_DDAY: &str = r"
    UPDATE ddays_tb
    SET d_title = ?, d_target_date = ?, d_category = ?, d_memo = ?,
        d_is_important = ?, d_updated_at = ?
    WHERE d_id = ?
";

const DELETE_DDAY: &str = "DELETE FROM ddays_tb WHERE d_id = ?";

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS ddays_tb (
        d_id VARCHAR(36) PRIMARY KEY NOT NULL,
        d_title VARCHAR(255) NOT NULL,
        d_target_date DATE NOT NULL,
        d_category VARCHAR(50) NOT NULL DEFAULT '개인',
        d_memo TEXT,
        d_is_important BOOLEAN NOT NULL DEFAULT FALSE,
        d_created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        d_updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_d_target_date ON ddays_tb (d_target_date)",
    "CREATE INDEX IF NOT EXISTS idx_d_category ON ddays_tb (d_category)",
    "CREATE INDEX IF NOT EXISTS idx_d_is_important ON ddays_tb (d_is_important)",
    "CREATE INDEX IF NOT EXISTS idx_d_created_at ON ddays_tb (d_created_at)",
];

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Database connection pool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabasePoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections kept open
    pub min_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Idle timeout for connections
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
    /// Test connections before use
    pub test_before_acquire: bool,
    /// SQLite-specific settings
    pub sqlite_optimizations: SqliteOptimizations,
}

/// SQLite-specific optimization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteOptimizations {
    /// Journal mode (WAL, DELETE, ...)
    pub journal_mode: String,
    /// Synchronous mode (NORMAL, FULL, OFF)
    pub synchronous_mode: String,
    /// Milliseconds to wait on a locked database
    pub busy_timeout_ms: u32,
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600), // 10 minutes
            max_lifetime: Duration::from_secs(300),
            test_before_acquire: true,
            sqlite_optimizations: SqliteOptimizations::default(),
        }
    }
}

impl Default for SqliteOptimizations {
    fn default() -> Self {
        Self {
            journal_mode: "WAL".to_string(),
            synchronous_mode: "NORMAL".to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

/// Connection pool health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolHealthStatus {
    pub is_healthy: bool,
    pub pool_size: u32,
    pub idle_connections: u32,
    pub max_connections: u32,
    pub timestamp: DateTime<Utc>,
}

fn bind_params<'q>(mut query: SqliteQuery<'q>, params: &[QueryValue]) -> SqliteQuery<'q> {
    for value in params {
        query = match value {
            QueryValue::Text(text) => query.bind(text.clone()),
            QueryValue::Bool(flag) => query.bind(*flag),
        };
    }
    query
}

fn insert_query(record: &DDayRecord) -> SqliteQuery<'_> {
    sqlx::query(INSERT_DDAY)
        .bind(&record.id)
        .bind(&record.title)
        .bind(record.target_date)
        .bind(record.category.as_str())
        .bind(&record.memo)
        .bind(record.is_important)
        .bind(record.created_at)
        .bind(record.updated_at)
}

fn update_query<'q>(id: &'q str, record: &'q DDayRecord, now: DateTime<Utc>) -> SqliteQuery<'q> {
    sqlx::query(UPDATE_DDAY)
        .bind(&record.title)
        .bind(record.target_date)
        .bind(record.category.as_str())
        .bind(&record.memo)
        .bind(record.is_important)
        .bind(now)
        .bind(id)
}

fn delete_query(id: &str) -> SqliteQuery<'_> {
    sqlx::query(DELETE_DDAY).bind(id)
}

fn create_error(e: &sqlx::Error, id: &str) -> DDayError {
    let duplicate = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if duplicate {
        DDayError::store(format!("Failed to create D-Day: id {id} already exists"))
    } else {
        DDayError::store(format!("Failed to create D-Day: {e}"))
    }
}

/// SQLx-backed store for D-Day records
///
/// The only component that reads or writes `ddays_tb`. Construct it once at
/// startup and share it; cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct DDayDatabase {
    pool: SqlitePool,
    config: DatabasePoolConfig,
}

impl DDayDatabase {
    /// Open a database file with default pool configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or if `SQLite` configuration fails
    #[instrument]
    pub async fn new(database_path: &Path) -> DDayResult<Self> {
        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        Self::from_connection_string_with_config(&database_url, DatabasePoolConfig::default())
            .await
    }

    /// Create a connection pool from a connection string with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or if `SQLite` configuration fails
    #[instrument]
    pub async fn from_connection_string(database_url: &str) -> DDayResult<Self> {
        Self::from_connection_string_with_config(database_url, DatabasePoolConfig::default()).await
    }

    /// Create a connection pool from a connection string with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or if `SQLite` configuration fails
    #[instrument]
    pub async fn from_connection_string_with_config(
        database_url: &str,
        config: DatabasePoolConfig,
    ) -> DDayResult<Self> {
        info!("Connecting to SQLite database: {}", database_url);

        let pool = PoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .max_lifetime(Some(config.max_lifetime))
            .test_before_acquire(config.test_before_acquire)
            .connect(database_url)
            .await
            .map_err(|e| DDayError::store(format!("Failed to connect to database: {e}")))?;

        Self::apply_sqlite_optimizations(&pool, &config.sqlite_optimizations).await?;

        info!(
            "Database connection pool established with {} max connections",
            config.max_connections
        );

        Ok(Self { pool, config })
    }

    /// Apply SQLite-specific settings
    async fn apply_sqlite_optimizations(
        pool: &SqlitePool,
        optimizations: &SqliteOptimizations,
    ) -> DDayResult<()> {
        sqlx::query(&format!(
            "PRAGMA journal_mode = {}",
            optimizations.journal_mode
        ))
        .execute(pool)
        .await
        .map_err(|e| DDayError::store(format!("Failed to set journal mode: {e}")))?;

        sqlx::query(&format!(
            "PRAGMA synchronous = {}",
            optimizations.synchronous_mode
        ))
        .execute(pool)
        .await
        .map_err(|e| DDayError::store(format!("Failed to set synchronous mode: {e}")))?;

        sqlx::query(&format!(
            "PRAGMA busy_timeout = {}",
            optimizations.busy_timeout_ms
        ))
        .execute(pool)
        .await
        .map_err(|e| DDayError::store(format!("Failed to set busy timeout: {e}")))?;

        debug!(
            "Applied SQLite settings: journal={}, sync={}, busy_timeout={}ms",
            optimizations.journal_mode,
            optimizations.synchronous_mode,
            optimizations.busy_timeout_ms
        );

        Ok(())
    }

    /// Create `ddays_tb` and its indexes if they do not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> DDayResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DDayError::store(format!("Failed to create table: {e}")))?;
        }
        info!("Tables created/verified successfully");
        Ok(())
    }

    /// Get the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Pool configuration this store was opened with
    #[must_use]
    pub fn config(&self) -> &DatabasePoolConfig {
        &self.config
    }

    /// Check if the database answers a trivial query
    #[instrument(skip(self))]
    pub async fn is_connected(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                debug!("Database connection is healthy");
                true
            }
            Err(e) => {
                error!("Database connection check failed: {}", e);
                false
            }
        }
    }

    /// Get connection pool health status
    #[instrument(skip(self))]
    pub async fn get_pool_health(&self) -> PoolHealthStatus {
        let is_healthy = self.is_connected().await;
        PoolHealthStatus {
            is_healthy,
            pool_size: self.pool.size(),
            idle_connections: u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX),
            max_connections: self.config.max_connections,
            timestamp: Utc::now(),
        }
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert a new record
    ///
    /// `id`, `created_at` and `updated_at` must already be assigned.
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the id already exists or a column constraint fails
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn create(&self, record: &DDayRecord) -> DDayResult<()> {
        insert_query(record)
            .execute(&self.pool)
            .await
            .map_err(|e| create_error(&e, &record.id))?;

        info!("Created D-Day with id: {}", record.id);
        Ok(())
    }

    /// Fetch one record by id
    ///
    /// # Errors
    ///
    /// Returns `DDayError::NotFound` if no row matches, `DDayError::Store` if the query fails
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> DDayResult<DDayRecord> {
        let sql = format!("{SELECT_DDAYS} WHERE d_id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DDayError::store(format!("Failed to fetch D-Day: {e}")))?;

        match row {
            Some(row) => map_dday_row(&row),
            None => Err(DDayError::not_found(id)),
        }
    }

    /// List records matching `parts`
    ///
    /// Sorted by target date ascending unless a sort part is given. Returns an
    /// empty vector when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the query fails or a row cannot be mapped
    #[instrument(skip(self, parts))]
    pub async fn list(&self, parts: &[QueryPart]) -> DDayResult<Vec<DDayRecord>> {
        let built = DDayQueryBuilder::from_parts(parts).build();
        let sql = built.select_sql(SELECT_DDAYS, DEFAULT_ORDER);
        debug!("Listing D-Days: {}", sql);

        let rows = bind_params(sqlx::query(&sql), &built.params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DDayError::store(format!("Failed to fetch D-Days: {e}")))?;

        let records = rows
            .iter()
            .map(map_dday_row)
            .collect::<DDayResult<Vec<DDayRecord>>>()?;

        debug!("Fetched {} D-Days", records.len());
        Ok(records)
    }

    /// Count records matching the filter parts
    ///
    /// Sort and paging parts are ignored, so the same slice given to
    /// [`Self::list`] yields the matching total.
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the query fails
    #[instrument(skip(self, parts))]
    pub async fn count(&self, parts: &[QueryPart]) -> DDayResult<u64> {
        let built = DDayQueryBuilder::from_parts(parts).build();
        let sql = built.count_sql(COUNT_DDAYS);

        let row = bind_params(sqlx::query(&sql), &built.params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DDayError::store(format!("Failed to count D-Days: {e}")))?;

        let total: i64 = row
            .try_get(0)
            .map_err(|e| DDayError::store(format!("Failed to read count: {e}")))?;

        debug!(
            "Counted {} D-Days over {} filters",
            total,
            parts.iter().filter(|p| p.is_filter()).count()
        );
        Ok(u64::try_from(total).unwrap_or_default())
    }

    /// Replace every mutable field of the record with the given id
    ///
    /// `created_at` is never written; `updated_at` is set to now. Returns the
    /// number of rows affected, 0 when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the update fails
    #[instrument(skip(self, record))]
    pub async fn update(&self, id: &str, record: &DDayRecord) -> DDayResult<u64> {
        let result = update_query(id, record, Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DDayError::store(format!("Failed to update D-Day: {e}")))?;

        info!("Updated D-Day with id: {}", id);
        Ok(result.rows_affected())
    }

    /// Delete the record with the given id
    ///
    /// Deleting a missing id affects zero rows and is not an error.
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the delete fails
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> DDayResult<u64> {
        let result = delete_query(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DDayError::store(format!("Failed to delete D-Day: {e}")))?;

        info!("Deleted D-Day with id: {}", id);
        Ok(result.rows_affected())
    }

    /// Start a transaction for use with the `*_with_tx` operations
    ///
    /// The caller commits or rolls back. Dropping the transaction without
    /// committing rolls it back.
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if no connection can be acquired
    pub async fn begin(&self) -> DDayResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DDayError::store(format!("Failed to begin transaction: {e}")))
    }

    /// [`Self::create`] inside a caller-owned transaction
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the id already exists or a column constraint fails
    #[instrument(skip(self, tx, record), fields(id = %record.id))]
    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        record: &DDayRecord,
    ) -> DDayResult<()> {
        insert_query(record)
            .execute(&mut **tx)
            .await
            .map_err(|e| create_error(&e, &record.id))?;
        Ok(())
    }

    /// [`Self::update`] inside a caller-owned transaction
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the update fails
    #[instrument(skip(self, tx, record))]
    pub async fn update_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: &str,
        record: &DDayRecord,
    ) -> DDayResult<u64> {
        let result: SqliteQueryResult = update_query(id, record, Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(|e| DDayError::store(format!("Failed to update D-Day: {e}")))?;
        Ok(result.rows_affected())
    }

    /// [`Self::delete`] inside a caller-owned transaction
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Store` if the delete fails
    #[instrument(skip(self, tx))]
    pub async fn delete_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: &str,
    ) -> DDayResult<u64> {
        let result = delete_query(id)
            .execute(&mut **tx)
            .await
            .map_err(|e| DDayError::store(format!("Failed to delete D-Day: {e}")))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_database_connection() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = DDayDatabase::new(temp_file.path()).await.unwrap();

        assert!(db.is_connected().await);
        assert_eq!(db.config(), &DatabasePoolConfig::default());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = DDayDatabase::new(temp_file.path()).await.unwrap();

        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();

        let indexes: Vec<String> = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'ddays_tb' AND name LIKE 'idx_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap()
        .iter()
        .map(|row| row.get::<String, _>("name"))
        .collect();

        assert_eq!(
            indexes,
            vec![
                "idx_d_category",
                "idx_d_created_at",
                "idx_d_is_important",
                "idx_d_target_date"
            ]
        );
    }

    #[tokio::test]
    async fn test_pool_health() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = DDayDatabase::new(temp_file.path()).await.unwrap();

        let health = db.get_pool_health().await;
        assert!(health.is_healthy);
        assert_eq!(health.max_connections, 10);
        assert!(health.pool_size >= 1);
    }

    #[tokio::test]
    async fn test_connection_failure_is_store_error() {
        let result =
            DDayDatabase::from_connection_string("sqlite:/nonexistent/dir/dday.db").await;
        assert!(matches!(result, Err(DDayError::Store { .. })));
    }

    #[test]
    fn test_database_pool_config_default() {
        let config = DatabasePoolConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.max_lifetime, Duration::from_secs(300));
        assert!(config.test_before_acquire);
        assert_eq!(config.sqlite_optimizations.journal_mode, "WAL");
    }

    #[tokio::test]
    async fn test_bind_params_keeps_order() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = DDayDatabase::new(temp_file.path()).await.unwrap();

        let params = vec![
            QueryValue::Bool(false),
            QueryValue::Text("%a%".to_string()),
            QueryValue::Bool(true),
        ];
        let row = bind_params(sqlx::query("SELECT ?, ?, ?"), &params)
            .fetch_one(db.pool())
            .await
            .unwrap();

        assert!(!row.get::<bool, _>(0));
        assert_eq!(row.get::<String, _>(1), "%a%");
        assert!(row.get::<bool, _>(2));
    }
}
