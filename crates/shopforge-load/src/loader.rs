use std::path::Path;

use async_trait::async_trait;

use shopforge_core::{Catalog, Dataset, EntityKind, timestamp};
use shopforge_generate::output::read_dataset;

use crate::errors::LoadError;

/// Trait implemented by database backends that can persist a dataset.
#[async_trait]
pub trait Loader {
    /// Returns the engine identifier (e.g. `sqlite`).
    fn engine(&self) -> &'static str;

    /// Recreate the catalog tables and insert every row of `dataset`.
    async fn load(&self, catalog: &Catalog, dataset: &Dataset) -> Result<LoadReport, LoadError>;

    /// Load the CSV tables found in `dir`.
    async fn load_dir(&self, catalog: &Catalog, dir: &Path) -> Result<LoadReport, LoadError> {
        let dataset = read_dataset(dir)?;
        self.load(catalog, &dataset).await
    }
}

/// Rows inserted per table, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub engine: String,
    pub tables: Vec<TableLoad>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub table: String,
    pub rows_inserted: u64,
}

impl LoadReport {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|table| table.rows_inserted).sum()
    }

    pub fn rows_for(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|entry| entry.table == table)
            .map(|entry| entry.rows_inserted)
    }
}

/// A single bound column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

/// Column values of every row of `kind`, in catalog column order.
pub fn table_rows(dataset: &Dataset, kind: EntityKind) -> Vec<Vec<SqlValue>> {
    use SqlValue::{Integer, Real, Text};

    match kind {
        EntityKind::Customers => dataset
            .customers
            .iter()
            .map(|row| {
                vec![
                    Integer(row.customer_id),
                    Text(row.name.clone()),
                    Text(row.email.clone()),
                    Text(row.phone.clone()),
                    Text(row.city.clone()),
                    Text(timestamp::format(&row.created_at)),
                ]
            })
            .collect(),
        EntityKind::Products => dataset
            .products
            .iter()
            .map(|row| {
                vec![
                    Integer(row.product_id),
                    Text(row.product_name.clone()),
                    Text(row.category.as_str().to_string()),
                    Real(row.price.as_f64()),
                ]
            })
            .collect(),
        EntityKind::Orders => dataset
            .orders
            .iter()
            .map(|row| {
                vec![
                    Integer(row.order_id),
                    Integer(row.customer_id),
                    Text(timestamp::format(&row.order_date)),
                    Real(row.total_amount.as_f64()),
                ]
            })
            .collect(),
        EntityKind::OrderItems => dataset
            .order_items
            .iter()
            .map(|row| {
                vec![
                    Integer(row.item_id),
                    Integer(row.order_id),
                    Integer(row.product_id),
                    Integer(row.quantity),
                    Real(row.item_price.as_f64()),
                ]
            })
            .collect(),
        EntityKind::Payments => dataset
            .payments
            .iter()
            .map(|row| {
                vec![
                    Integer(row.payment_id),
                    Integer(row.order_id),
                    Text(row.payment_method.as_str().to_string()),
                    Text(row.payment_status.as_str().to_string()),
                    Text(timestamp::format(&row.payment_date)),
                ]
            })
            .collect(),
    }
}
