use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use shopforge_core::{Catalog, ColumnType};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool};
use tracing::info;

use crate::errors::LoadError;
use crate::sqlite::open_existing_sqlite;

/// Join over all five tables, shipped as the default query.
pub const DEFAULT_JOIN_QUERY: &str = include_str!("../sql/join_query.sql");

/// Printed instead of a table when the result set is empty.
pub const NO_ROWS_MESSAGE: &str = "Query returned no rows.";

/// Materialized result set; `None` cells are SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryOutput {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fixed-width text table: header, dashed separator, then one line per row.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return NO_ROWS_MESSAGE.to_string();
        }

        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| column.chars().count())
            .collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                let len = cell.as_deref().map_or(0, |cell| cell.chars().count());
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(len);
                }
            }
        }

        let format_line = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format_line(self.columns.iter().map(String::as_str).collect()));
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &self.rows {
            lines.push(format_line(
                row.iter().map(|cell| cell.as_deref().unwrap_or("")).collect(),
            ));
        }
        lines.join("\n")
    }
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Execute `sql` and materialize every row as text.
pub async fn run_query(pool: &SqlitePool, sql: &str) -> Result<QueryOutput, LoadError> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;

    let columns: Vec<String> = rows
        .first()
        .map(|row| {
            row.columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect()
        })
        .unwrap_or_default();

    let money = money_columns();
    let cents: Vec<bool> = columns
        .iter()
        .map(|column| money.contains(column))
        .collect();

    let mut output = QueryOutput {
        columns,
        rows: Vec::with_capacity(rows.len()),
    };
    for row in &rows {
        let mut cells = Vec::with_capacity(row.len());
        for idx in 0..row.len() {
            let is_money = cents.get(idx).copied().unwrap_or(false);
            cells.push(cell_text(row, idx, is_money)?);
        }
        output.rows.push(cells);
    }
    Ok(output)
}

/// Read a SQL file and run it against an existing database file.
pub async fn run_query_file(db_path: &Path, sql_path: &Path) -> Result<QueryOutput, LoadError> {
    if !sql_path.is_file() {
        return Err(LoadError::MissingInput(format!(
            "SQL file not found: {}",
            sql_path.display()
        )));
    }
    let sql = std::fs::read_to_string(sql_path)?;

    let pool = open_existing_sqlite(db_path).await?;
    let output = run_query(&pool, &sql).await;
    pool.close().await;

    let output = output?;
    info!(
        db = %db_path.display(),
        sql = %sql_path.display(),
        rows = output.rows.len(),
        "query executed"
    );
    Ok(output)
}

/// Names of the catalog's REAL columns, all of which hold currency.
fn money_columns() -> BTreeSet<String> {
    Catalog::ecommerce()
        .tables
        .into_iter()
        .flat_map(|table| table.columns)
        .filter(|column| column.column_type == ColumnType::Real)
        .map(|column| column.name)
        .collect()
}

fn cell_text(row: &SqliteRow, idx: usize, is_money: bool) -> Result<Option<String>, LoadError> {
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(value.map(|value| value.to_string()));
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(value.map(|value| {
            if is_money {
                format!("{value:.2}")
            } else {
                value.to_string()
            }
        }));
    }
    Ok(row.try_get::<Option<String>, _>(idx)?)
}
