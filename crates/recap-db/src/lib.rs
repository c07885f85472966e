//! SQLite persistence for analyzed media records.

use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use recap_core::models::{MediaRecord, NewMediaRecord};
use recap_core::AppError;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const MAX_CONNECTIONS: u32 = 5;

/// Open the database and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| AppError::Internal(format!("migration failed: {}", e)))?;

    tracing::info!(database_url = %database_url, "Database ready");
    Ok(pool)
}

/// Repository for [`MediaRecord`]s. Records are insert-only; a batch of
/// staged records is committed in a single transaction, all or none.
#[derive(Clone)]
pub struct MediaRepository {
    pool: SqlitePool,
}

impl MediaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert all staged records atomically; returns the assigned ids in
    /// insertion order. An empty batch is a no-op.
    pub async fn insert_batch(&self, records: &[NewMediaRecord]) -> Result<Vec<i64>, AppError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO media_records (filename, upload_date, analysis_result, media_type, processed) \
                 VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
            )
            .bind(&record.filename)
            .bind(Utc::now())
            .bind(&record.analysis_result)
            .bind(record.media_type)
            .bind(record.processed)
            .fetch_one(&mut *tx)
            .await?;
            ids.push(id);
        }
        tx.commit().await?;

        tracing::debug!(inserted = ids.len(), "Committed media record batch");
        Ok(ids)
    }

    /// All records, newest upload first.
    pub async fn list_all(&self) -> Result<Vec<MediaRecord>, AppError> {
        let records = sqlx::query_as::<_, MediaRecord>(
            "SELECT id, filename, upload_date, analysis_result, media_type, processed \
             FROM media_records ORDER BY upload_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
