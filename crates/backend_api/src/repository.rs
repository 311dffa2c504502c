use async_trait::async_trait;
use models::{QueryResult, ReportType, ReportVariant, Row};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, Result};
use crate::queries;
use crate::terms;

/// Optional inclusive bounds on the date or timestamp column of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateWindow {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }
}

/// Repository trait for the finance datastore, one method per resource
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    async fn fetch_symbols(&self) -> Result<QueryResult>;
    async fn fetch_table_schema(&self, table: &str) -> Result<QueryResult>;
    async fn fetch_overview(&self, symbol: &str) -> Result<QueryResult>;
    async fn fetch_intraday(&self, symbol: &str, window: &DateWindow) -> Result<QueryResult>;
    async fn fetch_statement_flow(
        &self,
        variant: ReportVariant,
        symbol: &str,
        report_type: ReportType,
        window: &DateWindow,
    ) -> Result<QueryResult>;
    async fn fetch_word_cloud(&self, symbol: &str, window: &DateWindow) -> Result<QueryResult>;
    async fn fetch_sentiment(&self, symbol: &str, window: &DateWindow) -> Result<QueryResult>;
}

/// Read-only SQLite implementation over the collected finance database file
pub struct SqliteFinanceRepository {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteFinanceRepository {
    /// Opens the database read-only. Fails if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::info!(path = %path.display(), "finance database opened read-only");

        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs a statement on the blocking pool and collects every row as a JSON object
    async fn query(&self, sql: String, params: Vec<SqlValue>) -> Result<QueryResult> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<QueryResult> {
            let conn = conn
                .lock()
                .map_err(|_| ApiError::Internal("database connection lock poisoned".to_string()))?;
            let rows = collect_rows(&conn, &sql, &params)?;
            tracing::debug!(rows = rows.len(), "query complete");
            Ok(rows)
        })
        .await?
    }
}

#[async_trait]
impl FinanceRepository for SqliteFinanceRepository {
    async fn fetch_symbols(&self) -> Result<QueryResult> {
        self.query(queries::SYMBOLS.to_string(), vec![]).await
    }

    async fn fetch_table_schema(&self, table: &str) -> Result<QueryResult> {
        self.query(queries::TABLE_SCHEMA.to_string(), vec![text(table)])
            .await
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<QueryResult> {
        self.query(queries::OVERVIEW.to_string(), vec![text(symbol)])
            .await
    }

    async fn fetch_intraday(&self, symbol: &str, window: &DateWindow) -> Result<QueryResult> {
        let mut params = vec![text(symbol)];
        params.extend(bounds(window));
        self.query(queries::INTRADAY.to_string(), params).await
    }

    async fn fetch_statement_flow(
        &self,
        variant: ReportVariant,
        symbol: &str,
        report_type: ReportType,
        window: &DateWindow,
    ) -> Result<QueryResult> {
        let mut params = vec![text(symbol), text(report_type.as_str())];
        params.extend(bounds(window));
        self.query(queries::statement_flow(variant), params).await
    }

    async fn fetch_word_cloud(&self, symbol: &str, window: &DateWindow) -> Result<QueryResult> {
        let mut params = vec![text(symbol)];
        params.extend(bounds(window));
        let articles = self.query(queries::NEWS_TEXT.to_string(), params).await?;
        Ok(terms::top_terms(&articles, terms::TERM_LIMIT))
    }

    async fn fetch_sentiment(&self, symbol: &str, window: &DateWindow) -> Result<QueryResult> {
        let mut params = vec![text(symbol)];
        params.extend(bounds(window));
        self.query(queries::SENTIMENT.to_string(), params).await
    }
}

fn text(value: &str) -> SqlValue {
    SqlValue::Text(value.to_string())
}

fn bounds(window: &DateWindow) -> [SqlValue; 2] {
    let bound = |v: &Option<String>| v.clone().map(SqlValue::Text).unwrap_or(SqlValue::Null);
    [bound(&window.start), bound(&window.end)]
}

fn collect_rows(conn: &Connection, sql: &str, params: &[SqlValue]) -> rusqlite::Result<QueryResult> {
    let mut stmt = conn.prepare_cached(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
        let mut object = Row::new();
        for (idx, name) in columns.iter().enumerate() {
            object.insert(name.clone(), to_json(row.get_ref(idx)?));
        }
        Ok(object)
    })?;

    rows.collect()
}

/// Converts one SQLite cell into the JSON scalar sent to the browser
fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    }
}
