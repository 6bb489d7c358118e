//! SQLite driver for students-query
//!
//! Implements `QueryExecutor` over a single rusqlite connection. Filter
//! arguments are always bound as positional parameters. Every rusqlite call
//! runs on the blocking pool.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use students_query::{
    DataRow, ProviderError, QueryDescriptor, QueryExecutor, QueryResult, Result,
};
use tokio::task;
use tracing::{debug, error, info};

/// SQLite data source implementation
pub struct SqliteSource {
    conn: Arc<Mutex<Option<Connection>>>,
    location: String,
}

impl SqliteSource {
    /// Open the database at `path`, creating the file if it does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        debug!("Opening SQLite database: {}", path.display());

        let conn = Connection::open(&path).map_err(|e| {
            ProviderError::ConnectionFailed(format!(
                "SQLite open failed for {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Opened SQLite database: {}", path.display());
        Ok(Self::from_connection(conn, path.display().to_string()))
    }

    /// Open an existing database without write access
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| {
                ProviderError::ConnectionFailed(format!(
                    "SQLite read-only open failed for {}: {}",
                    path.display(),
                    e
                ))
            })?;

        info!("Opened SQLite database read-only: {}", path.display());
        Ok(Self::from_connection(conn, path.display().to_string()))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            ProviderError::ConnectionFailed(format!("SQLite in-memory open failed: {}", e))
        })?;
        Ok(Self::from_connection(conn, ":memory:".to_string()))
    }

    pub fn from_connection(conn: Connection, location: String) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            location,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Run one or more statements without parameters
    ///
    /// Meant for fixtures and operator setup; the provider never calls it.
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        let sql = sql.to_string();

        self.with_connection(move |conn| {
            conn.execute_batch(&sql)
                .map_err(|e| ProviderError::QueryFailed(format!("Batch failed: {}", e)))
        })
        .await
    }

    /// Run `f` against the open connection on the blocking pool
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let location = self.location.clone();

        task::spawn_blocking(move || {
            let guard = conn.lock();
            let conn = guard
                .as_ref()
                .ok_or(ProviderError::ConnectionLost(location))?;
            f(conn)
        })
        .await
        .map_err(join_error)?
    }

    /// Render a descriptor as a SELECT statement with `?` placeholders intact
    pub fn build_sql(descriptor: &QueryDescriptor) -> String {
        let columns = match &descriptor.projection {
            Some(columns) if !columns.is_empty() => columns.join(", "),
            _ => "*".to_string(),
        };

        let mut sql = format!("SELECT {} FROM {}", columns, descriptor.table_name);

        if let Some(predicate) = non_empty(&descriptor.filter_predicate) {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }

        if let Some(sort_order) = non_empty(&descriptor.sort_order) {
            sql.push_str(" ORDER BY ");
            sql.push_str(sort_order);
        }

        sql
    }

    /// Convert a SQLite row to DataRow
    fn row_to_datarow(row: &Row, columns: &[String]) -> Result<DataRow> {
        let mut data_row = DataRow::with_capacity(columns.len());

        for (idx, name) in columns.iter().enumerate() {
            let value = row
                .get_ref(idx)
                .map_err(|e| ProviderError::QueryFailed(format!("Column {}: {}", name, e)))?;
            data_row.insert(name.clone(), Self::extract_value(value));
        }

        Ok(data_row)
    }

    /// Extract value from a SQLite cell
    fn extract_value(value: ValueRef<'_>) -> serde_json::Value {
        match value {
            ValueRef::Null => serde_json::Value::Null,
            ValueRef::Integer(v) => serde_json::Value::Number(v.into()),
            ValueRef::Real(v) => serde_json::Number::from_f64(v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ValueRef::Text(bytes) => {
                serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
            }
            ValueRef::Blob(bytes) => serde_json::Value::String(hex::encode(bytes)),
        }
    }

    fn run_query(conn: &Connection, descriptor: &QueryDescriptor) -> Result<QueryResult> {
        let start = Instant::now();
        let sql = Self::build_sql(descriptor);
        debug!("Executing SQLite query: {}", sql);

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ProviderError::InvalidQuery(format!("{}: {}", sql, e)))?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        // Rows are keyed by column name, so a repeated name would lose values
        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(repeated) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ProviderError::InvalidQuery(format!(
                "{}: column '{}' appears more than once",
                sql, repeated
            )));
        }

        let mut rows = stmt
            .query(params_from_iter(descriptor.arguments().iter()))
            .map_err(|e| match e {
                rusqlite::Error::InvalidParameterCount(given, expected) => {
                    ProviderError::InvalidQuery(format!(
                        "{}: {} argument(s) given for {} placeholder(s)",
                        sql, given, expected
                    ))
                }
                other => ProviderError::QueryFailed(format!("{}: {}", sql, other)),
            })?;

        let mut data_rows = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| ProviderError::QueryFailed(format!("{}: {}", sql, e)))?
        {
            data_rows.push(Self::row_to_datarow(row, &columns)?);
        }

        let execution_ms = start.elapsed().as_millis() as u64;
        Ok(QueryResult::new(columns, data_rows, execution_ms))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn join_error(err: task::JoinError) -> ProviderError {
    ProviderError::Internal(format!("SQLite task failed: {}", err))
}

#[async_trait]
impl QueryExecutor for SqliteSource {
    fn source_type(&self) -> &'static str {
        "sqlite"
    }

    async fn execute_query(&self, descriptor: &QueryDescriptor) -> Result<QueryResult> {
        let owned = descriptor.clone();

        self.with_connection(move |conn| Self::run_query(conn, &owned))
            .await
            .map_err(|e| {
                error!("SQLite query on {} failed: {}", descriptor.table_name, e);
                e
            })
    }

    async fn close(&self) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let location = self.location.clone();

        task::spawn_blocking(move || {
            let taken = conn.lock().take();
            if let Some(conn) = taken {
                debug!("Closing SQLite database: {}", location);
                conn.close().map_err(|(_, e)| {
                    ProviderError::Internal(format!("Closing {} failed: {}", location, e))
                })?;
            }
            Ok::<(), ProviderError>(())
        })
        .await
        .map_err(join_error)?
    }
}
