use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::constraints::{Constraint, ForeignKey, PrimaryKey, UniqueConstraint};
use crate::entities::EntityKind;
use crate::error::{Error, Result};
use crate::types::ColumnType;

/// Relational layout of the generated dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub tables: Vec<Table>,
}

/// A persisted entity table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

/// Column metadata for a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub ordinal_position: i16,
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
    pub default: Option<String>,
}

impl Catalog {
    /// Catalog for the five e-commerce entities, parents declared first.
    pub fn ecommerce() -> Self {
        use ColumnType::{Integer, Real, Text};

        let customers = TableBuilder::new(EntityKind::Customers)
            .column("customer_id", Integer, false)
            .column("name", Text, false)
            .column("email", Text, false)
            .column("phone", Text, true)
            .column("city", Text, true)
            .column("created_at", Text, true)
            .primary_key("customer_id")
            .unique("email")
            .build();

        let products = TableBuilder::new(EntityKind::Products)
            .column("product_id", Integer, false)
            .column("product_name", Text, false)
            .column("category", Text, true)
            .column("price", Real, false)
            .primary_key("product_id")
            .build();

        let orders = TableBuilder::new(EntityKind::Orders)
            .column("order_id", Integer, false)
            .column("customer_id", Integer, false)
            .column("order_date", Text, false)
            .column_with_default("total_amount", Real, "0")
            .primary_key("order_id")
            .foreign_key("customer_id", EntityKind::Customers, "customer_id")
            .build();

        let order_items = TableBuilder::new(EntityKind::OrderItems)
            .column("item_id", Integer, false)
            .column("order_id", Integer, false)
            .column("product_id", Integer, false)
            .column("quantity", Integer, false)
            .column("item_price", Real, false)
            .primary_key("item_id")
            .foreign_key("order_id", EntityKind::Orders, "order_id")
            .foreign_key("product_id", EntityKind::Products, "product_id")
            .build();

        let payments = TableBuilder::new(EntityKind::Payments)
            .column("payment_id", Integer, false)
            .column("order_id", Integer, false)
            .column("payment_method", Text, false)
            .column("payment_status", Text, false)
            .column("payment_date", Text, false)
            .primary_key("payment_id")
            .foreign_key("order_id", EntityKind::Orders, "order_id")
            .build();

        Self {
            tables: vec![customers, products, orders, order_items, payments],
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Validate internal consistency of the catalog.
    ///
    /// This checks:
    /// - duplicate tables/columns
    /// - primary key and unique columns exist
    /// - foreign key columns and referenced targets exist
    pub fn validate(&self) -> Result<()> {
        let mut catalog: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for table in &self.tables {
            let mut columns = BTreeSet::new();
            for column in &table.columns {
                if !columns.insert(column.name.as_str()) {
                    return Err(Error::InvalidCatalog(format!(
                        "duplicate column name: {}.{}",
                        table.name, column.name
                    )));
                }
            }
            if catalog.insert(table.name.as_str(), columns).is_some() {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate table name: {}",
                    table.name
                )));
            }
        }

        for table in &self.tables {
            let columns = &catalog[table.name.as_str()];
            for constraint in &table.constraints {
                let (kind, own_columns) = match constraint {
                    Constraint::PrimaryKey(pk) => ("primary key", &pk.columns),
                    Constraint::Unique(unique) => ("unique", &unique.columns),
                    Constraint::ForeignKey(fk) => ("foreign key", &fk.columns),
                };
                for column in own_columns {
                    if !columns.contains(column.as_str()) {
                        return Err(Error::InvalidCatalog(format!(
                            "{kind} column not found: {}.{}",
                            table.name, column
                        )));
                    }
                }

                if let Constraint::ForeignKey(fk) = constraint {
                    let ref_columns =
                        catalog.get(fk.referenced_table.as_str()).ok_or_else(|| {
                            Error::InvalidCatalog(format!(
                                "foreign key target table not found: {} -> {}",
                                table.name, fk.referenced_table
                            ))
                        })?;
                    for column in &fk.referenced_columns {
                        if !ref_columns.contains(column.as_str()) {
                            return Err(Error::InvalidCatalog(format!(
                                "foreign key target column not found: {}.{}",
                                fk.referenced_table, column
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Table {
    pub fn column_names(&self) -> Vec<&str> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|col| col.ordinal_position);
        columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.constraints.iter().filter_map(|constraint| match constraint {
            Constraint::ForeignKey(fk) => Some(fk),
            _ => None,
        })
    }
}

struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    fn new(kind: EntityKind) -> Self {
        Self {
            table: Table {
                name: kind.table_name().to_string(),
                columns: Vec::new(),
                constraints: Vec::new(),
            },
        }
    }

    fn column(mut self, name: &str, column_type: ColumnType, is_nullable: bool) -> Self {
        self.push_column(name, column_type, is_nullable, None);
        self
    }

    fn column_with_default(mut self, name: &str, column_type: ColumnType, default: &str) -> Self {
        self.push_column(name, column_type, true, Some(default.to_string()));
        self
    }

    fn push_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        is_nullable: bool,
        default: Option<String>,
    ) {
        let ordinal_position = self.table.columns.len() as i16 + 1;
        self.table.columns.push(Column {
            ordinal_position,
            name: name.to_string(),
            column_type,
            is_nullable,
            default,
        });
    }

    fn primary_key(mut self, column: &str) -> Self {
        self.table.constraints.push(Constraint::PrimaryKey(PrimaryKey {
            columns: vec![column.to_string()],
        }));
        self
    }

    fn unique(mut self, column: &str) -> Self {
        self.table
            .constraints
            .push(Constraint::Unique(UniqueConstraint {
                columns: vec![column.to_string()],
            }));
        self
    }

    fn foreign_key(mut self, column: &str, target: EntityKind, target_column: &str) -> Self {
        self.table.constraints.push(Constraint::ForeignKey(ForeignKey {
            columns: vec![column.to_string()],
            referenced_table: target.table_name().to_string(),
            referenced_columns: vec![target_column.to_string()],
        }));
        self
    }

    fn build(self) -> Table {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecommerce_catalog_is_consistent() {
        let catalog = Catalog::ecommerce();
        catalog.validate().expect("valid catalog");
        assert_eq!(catalog.tables.len(), 5);
    }

    #[test]
    fn validate_rejects_dangling_foreign_key() {
        let mut catalog = Catalog::ecommerce();
        catalog.tables.retain(|table| table.name != "customers");
        let err = catalog.validate().expect_err("missing parent");
        assert!(err.to_string().contains("orders -> customers"));
    }

    #[test]
    fn column_names_follow_ordinal_position() {
        let catalog = Catalog::ecommerce();
        let items = catalog.table("order_items").expect("order_items");
        assert_eq!(
            items.column_names(),
            vec!["item_id", "order_id", "product_id", "quantity", "item_price"]
        );
    }
}
