use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use stubzone_application::ports::ServiceRecordBackend;
use stubzone_domain::discovery_path::path_from_domain;
use stubzone_domain::{DomainError, ServiceRecord};
use tracing::{debug, info, warn};

/// Service records kept in SQLite, one row per backend key.
pub struct SqliteServiceRecordBackend {
    pool: SqlitePool,
}

impl SqliteServiceRecordBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, record: &ServiceRecord) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO services (key, host, port) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                host = excluded.host,
                port = excluded.port,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(&record.key)
        .bind(&record.host)
        .bind(i64::from(record.port))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::BackendUnavailable(e.to_string()))?;

        info!(key = %record.key, host = %record.host, port = record.port, "Service record stored");
        Ok(())
    }

    /// Removes the record at `key`, or every record beneath it. Returns the
    /// number of rows removed.
    pub async fn remove(&self, key: &str) -> Result<u64, DomainError> {
        let key = key.trim_end_matches('/');
        let result = sqlx::query("DELETE FROM services WHERE key = ? OR key LIKE ? ESCAPE '\\'")
            .bind(key)
            .bind(subtree_pattern(key))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::BackendUnavailable(e.to_string()))?;

        info!(key = %key, removed = result.rows_affected(), "Service records removed");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ServiceRecordBackend for SqliteServiceRecordBackend {
    async fn records(&self, name: &str, exact: bool) -> Result<Vec<ServiceRecord>, DomainError> {
        let path = path_from_domain(name);

        let rows = if exact {
            sqlx::query("SELECT key, host, port FROM services WHERE key = ?")
                .bind(&path)
                .fetch_all(&self.pool)
                .await
        } else {
            sqlx::query(
                "SELECT key, host, port FROM services
                 WHERE key = ? OR key LIKE ? ESCAPE '\\'
                 ORDER BY key",
            )
            .bind(&path)
            .bind(subtree_pattern(&path))
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| DomainError::BackendUnavailable(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let key: String = row.get("key");
            let port: i64 = row.get("port");

            // Only port 0 has a default; anything outside u16 is malformed.
            let Ok(port) = u16::try_from(port) else {
                warn!(key = %key, port, "Skipping service record with out-of-range port");
                continue;
            };

            records.push(ServiceRecord {
                key,
                host: row.get("host"),
                port,
            });
        }

        debug!(path = %path, exact, records = records.len(), "Service records loaded");
        Ok(records)
    }
}

fn subtree_pattern(path: &str) -> String {
    let escaped = path
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{}/%", escaped)
}
