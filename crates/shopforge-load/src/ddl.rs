use shopforge_core::{Catalog, Column, Constraint, Table};

use crate::errors::LoadError;

/// `DROP TABLE IF EXISTS` for one table.
pub fn render_drop_table(table: &Table) -> String {
    format!("DROP TABLE IF EXISTS {}", table.name)
}

/// `CREATE TABLE` with column nullability, defaults and key constraints.
pub fn render_create_table(table: &Table) -> String {
    let mut columns: Vec<&Column> = table.columns.iter().collect();
    columns.sort_by_key(|column| column.ordinal_position);

    let mut lines: Vec<String> = columns.into_iter().map(render_column).collect();
    for constraint in &table.constraints {
        lines.push(match constraint {
            Constraint::PrimaryKey(pk) => format!("PRIMARY KEY ({})", pk.columns.join(", ")),
            Constraint::Unique(unique) => format!("UNIQUE ({})", unique.columns.join(", ")),
            Constraint::ForeignKey(fk) => format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                fk.columns.join(", "),
                fk.referenced_table,
                fk.referenced_columns.join(", ")
            ),
        });
    }

    format!(
        "CREATE TABLE {} (\n    {}\n)",
        table.name,
        lines.join(",\n    ")
    )
}

fn render_column(column: &Column) -> String {
    let mut line = format!("{} {}", column.name, column.column_type.sql_name());
    if !column.is_nullable {
        line.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        line.push_str(" DEFAULT ");
        line.push_str(default);
    }
    line
}

/// Tables of `catalog` in parent-first order.
pub fn load_order(catalog: &Catalog) -> Result<Vec<&Table>, LoadError> {
    catalog.validate()?;
    let report = shopforge_core::build_fk_graph_report(catalog);
    let order = match report.topo_order {
        Some(order) => order,
        None => {
            return Err(LoadError::InvalidCatalog(format!(
                "foreign key cycle: {}",
                report.cycle.unwrap_or_default().join(" -> ")
            )));
        }
    };

    order
        .iter()
        .map(|name| {
            catalog
                .table(name)
                .ok_or_else(|| LoadError::InvalidCatalog(format!("unknown table: {name}")))
        })
        .collect()
}
