use anyhow::{anyhow, Context as _, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

/// Default timeout for individual SQLite queries.
/// Prevents hung queries from blocking the service indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
/// Returns an error if the operation takes longer than `QUERY_TIMEOUT`.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

// ─── Row types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub task_description: String,
    /// Stored as 0/1 in the table.
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

// ─── Storage ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("checkd.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("src/storage/migrations")
            .run(pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    /// Insert a new task with `completed = 0` and return the stored row.
    pub async fn create_task(&self, description: &str) -> Result<TaskRow> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO tasks (task_description, completed, created_at, updated_at)
             VALUES (?, 0, ?, ?)",
        )
        .bind(description)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_task(id)
            .await?
            .ok_or_else(|| anyhow!("task not found after insert"))
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// All tasks, newest first. Ties on `created_at` fall back to id order,
    /// which matches insertion order since ids are monotonic.
    pub async fn list_tasks(&self, completed: Option<bool>) -> Result<Vec<TaskRow>> {
        let pool = self.pool.clone();
        with_timeout(async {
            let rows = match completed {
                Some(flag) => {
                    sqlx::query_as(
                        "SELECT * FROM tasks WHERE completed = ?
                         ORDER BY created_at DESC, id DESC",
                    )
                    .bind(flag)
                    .fetch_all(&pool)
                    .await?
                }
                None => {
                    sqlx::query_as("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")
                        .fetch_all(&pool)
                        .await?
                }
            };
            Ok(rows)
        })
        .await
    }

    /// Partial update of the allowed fields. Fields passed as `None` are left
    /// untouched; an update with no effective fields is a no-op that still
    /// reports success. Returns false when the id does not exist.
    pub async fn update_task(
        &self,
        id: i64,
        description: Option<&str>,
        completed: Option<bool>,
    ) -> Result<bool> {
        if description.is_none() && completed.is_none() {
            return Ok(true);
        }
        let now = Utc::now().to_rfc3339();
        let rows_affected = sqlx::query(
            "UPDATE tasks
             SET task_description = COALESCE(?, task_description),
                 completed = COALESCE(?, completed),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(description)
        .bind(completed)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Returns false when the id does not exist.
    pub async fn delete_task(&self, id: i64) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }

    /// Delete every completed task and return how many were removed.
    pub async fn delete_completed_tasks(&self) -> Result<u64> {
        Ok(sqlx::query("DELETE FROM tasks WHERE completed = 1")
            .execute(&self.pool)
            .await?
            .rows_affected())
    }

    pub async fn delete_all_tasks(&self) -> Result<u64> {
        Ok(sqlx::query("DELETE FROM tasks")
            .execute(&self.pool)
            .await?
            .rows_affected())
    }

    // ─── Settings ───────────────────────────────────────────────────────────

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value.map(|(v,)| v))
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
