use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use shopforge_core::{Catalog, Dataset, EntityKind, Table};

use crate::ddl::{load_order, render_create_table, render_drop_table};
use crate::errors::LoadError;
use crate::loader::{LoadReport, Loader, SqlValue, TableLoad, table_rows};

/// Open (creating when needed) a SQLite database file with foreign keys on.
pub async fn connect_sqlite(path: &Path) -> Result<SqlitePool, LoadError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open a SQLite database file that must already exist.
pub async fn open_existing_sqlite(path: &Path) -> Result<SqlitePool, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingInput(format!(
            "database not found: {}",
            path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Loader for SQLite databases.
#[derive(Debug, Clone)]
pub struct SqliteLoader {
    pool: SqlitePool,
}

impl SqliteLoader {
    /// Create a new loader using a pre-configured pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Loader for SqliteLoader {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self, catalog: &Catalog, dataset: &Dataset) -> Result<LoadReport, LoadError> {
        let start = Instant::now();
        let tables = load_order(catalog)?;

        let mut conn = self.pool.acquire().await?;
        // The pragma is ignored inside a transaction.
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut *conn)
            .await?;

        let mut tx = sqlx::Connection::begin(&mut *conn).await?;
        for table in tables.iter().rev() {
            sqlx::query(&render_drop_table(table))
                .execute(&mut *tx)
                .await?;
        }

        let mut report = LoadReport {
            engine: self.engine().to_string(),
            tables: Vec::with_capacity(tables.len()),
        };
        for table in &tables {
            sqlx::query(&render_create_table(table))
                .execute(&mut *tx)
                .await?;

            let kind = EntityKind::from_table_name(&table.name).ok_or_else(|| {
                LoadError::InvalidCatalog(format!("no dataset rows for table: {}", table.name))
            })?;
            let rows = table_rows(dataset, kind);
            let statement = insert_statement(table);
            let width = table.columns.len();

            for row in &rows {
                if row.len() != width {
                    return Err(LoadError::InvalidCatalog(format!(
                        "{} expects {width} values, row has {}",
                        table.name,
                        row.len()
                    )));
                }

                let mut query = sqlx::query(&statement);
                for value in row {
                    query = match value {
                        SqlValue::Integer(value) => query.bind(*value),
                        SqlValue::Real(value) => query.bind(*value),
                        SqlValue::Text(value) => query.bind(value.as_str()),
                    };
                }
                query.execute(&mut *tx).await?;
            }

            debug!(table = %table.name, rows = rows.len(), "table loaded");
            report.tables.push(TableLoad {
                table: table.name.clone(),
                rows_inserted: rows.len() as u64,
            });
        }
        tx.commit().await?;

        info!(
            engine = self.engine(),
            rows = report.total_rows(),
            duration_ms = start.elapsed().as_millis() as u64,
            "dataset loaded"
        );
        Ok(report)
    }
}

fn insert_statement(table: &Table) -> String {
    let columns = table.column_names();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        columns.join(", "),
        placeholders
    )
}
