use crate::config::pipeline::{DatabaseBackend, DatabaseConfig};
use crate::domain::model::{Outcome, PreparedRecord};
use crate::domain::ports::RecordProcessor;
use crate::domain::schema::{FieldKind, FieldSpec};
use crate::utils::error::{EtlError, Result};
use crate::utils::redact::sanitize_error_message;
use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;

/// Inserts each record as one autocommitted row of `table`.
pub struct SqlRecordSink {
    pool: AnyPool,
    insert_sql: String,
}

impl SqlRecordSink {
    /// The pool connects lazily; `ready()` performs the first connection.
    pub fn new(config: &DatabaseConfig, table: &str, columns: &[FieldSpec]) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect_lazy(&config.url)
            .map_err(database_error)?;

        Ok(Self {
            pool,
            insert_sql: insert_statement(config.backend, table, columns),
        })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }
}

#[async_trait]
impl RecordProcessor for SqlRecordSink {
    async fn ready(&self) -> Result<()> {
        self.pool.acquire().await.map_err(database_error)?;
        tracing::debug!("Database connection established");
        Ok(())
    }

    async fn process(&self, record: &PreparedRecord) -> Outcome {
        let mut query = sqlx::query(&self.insert_sql);
        for value in &record.values {
            query = query.bind(value.clone());
        }

        match query.execute(&self.pool).await {
            Ok(_) => Outcome::Success,
            Err(e) => Outcome::Failure(sanitize_error_message(&e.to_string())),
        }
    }
}

/// `INSERT INTO table (c1, c2, ...) VALUES (...)` with one placeholder per
/// column. Values are bound as text, so Postgres gets explicit casts.
pub fn insert_statement(backend: DatabaseBackend, table: &str, columns: &[FieldSpec]) -> String {
    let names = columns
        .iter()
        .map(|column| column.name)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = columns
        .iter()
        .enumerate()
        .map(|(i, column)| placeholder(backend, i + 1, column.kind))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {} ({}) VALUES ({})", table, names, placeholders)
}

fn placeholder(backend: DatabaseBackend, position: usize, kind: FieldKind) -> String {
    match backend {
        DatabaseBackend::Postgres => match kind {
            FieldKind::Text => format!("${}", position),
            FieldKind::Integer => format!("CAST(${} AS BIGINT)", position),
            FieldKind::Decimal => format!("CAST(${} AS NUMERIC)", position),
            FieldKind::Date => format!("CAST(${} AS DATE)", position),
            FieldKind::Timestamp => format!("CAST(${} AS TIMESTAMP)", position),
        },
        DatabaseBackend::MySql | DatabaseBackend::Sqlite => "?".to_string(),
    }
}

fn database_error(e: sqlx::Error) -> EtlError {
    EtlError::DatabaseError {
        message: sanitize_error_message(&e.to_string()),
    }
}
