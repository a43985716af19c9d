//! Result persistence
//!
//! Every successful engine call hands a small JSON projection to a
//! [`ResultStore`]. Stores are best effort: the service logs their errors
//! and never surfaces them to callers.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

/// Projection tables. The set is closed so table names never come from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    IndicatorExplanations,
    AiDecisions,
    Predictions,
    StrategySimulations,
    QuizResults,
    Streaks,
    ProgressSnapshots,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::IndicatorExplanations,
        Table::AiDecisions,
        Table::Predictions,
        Table::StrategySimulations,
        Table::QuizResults,
        Table::Streaks,
        Table::ProgressSnapshots,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::IndicatorExplanations => "education_indicator_explanations",
            Table::AiDecisions => "education_ai_decisions",
            Table::Predictions => "education_predictions",
            Table::StrategySimulations => "education_strategy_simulations",
            Table::QuizResults => "education_quiz_results",
            Table::Streaks => "education_streaks",
            Table::ProgressSnapshots => "education_progress_snapshots",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append one projection row.
    async fn record(&self, table: Table, user_id: Option<&str>, payload: Value) -> Result<()>;

    /// Newest progress snapshot row for `user_id`, if any.
    async fn latest_progress(&self, user_id: &str) -> Result<Option<Value>>;

    /// False when persistence is switched off.
    fn is_available(&self) -> bool;
}

/// Persistence disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl ResultStore for NoopStore {
    async fn record(&self, table: Table, _user_id: Option<&str>, _payload: Value) -> Result<()> {
        tracing::trace!("Persistence disabled; dropping row for {}", table);
        Ok(())
    }

    async fn latest_progress(&self, _user_id: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[derive(Debug, FromRow)]
struct ProjectionRow {
    id: i64,
    user_id: Option<String>,
    payload: String,
    created_at: String,
}

impl ProjectionRow {
    /// Payload columns flattened next to the row metadata.
    fn into_record(self) -> Result<Value> {
        let mut record = match serde_json::from_str::<Value>(&self.payload)? {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("payload".to_string(), other);
                map
            }
        };
        record.insert("id".to_string(), Value::from(self.id));
        record.insert("user_id".to_string(), self.user_id.map(Value::from).unwrap_or(Value::Null));
        record.insert("created_at".to_string(), Value::from(self.created_at));
        Ok(Value::Object(record))
    }
}

/// SQLite-backed store, one table per projection
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    pool: SqlitePool,
}

impl SqliteResultStore {
    /// Connect and create any missing tables.
    pub async fn connect(database_url: &str) -> Result<Self> {
        // Each in-memory connection is its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self::new(pool);
        store.init_tables().await?;
        tracing::info!("Education result store ready at {}", database_url);
        Ok(store)
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_tables(&self) -> Result<()> {
        for table in Table::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT,
                    payload TEXT NOT NULL,
                    created_at TEXT NOT NULL
                )",
                table.name()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Number of rows in `table`
    pub async fn count(&self, table: Table) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table.name()))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn record(&self, table: Table, user_id: Option<&str>, payload: Value) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (user_id, payload, created_at) VALUES (?, ?, ?)",
            table.name()
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(payload.to_string())
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        tracing::debug!("Persisted row to {}", table);
        Ok(())
    }

    async fn latest_progress(&self, user_id: &str) -> Result<Option<Value>> {
        let sql = format!(
            "SELECT id, user_id, payload, created_at FROM {}
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            Table::ProgressSnapshots.name()
        );
        let row: Option<ProjectionRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProjectionRow::into_record).transpose()
    }

    fn is_available(&self) -> bool {
        true
    }
}
