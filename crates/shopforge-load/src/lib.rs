//! SQLite persistence for generated shopforge datasets.
//!
//! The loader recreates the catalog tables with their key constraints and
//! bulk-inserts a dataset parent-first; the query runner executes a SQL file
//! against the resulting database and renders the rows as a text table.

pub mod ddl;
pub mod errors;
pub mod loader;
pub mod query;
pub mod sqlite;

pub use errors::LoadError;
pub use loader::{LoadReport, Loader, SqlValue, TableLoad, table_rows};
pub use query::{DEFAULT_JOIN_QUERY, NO_ROWS_MESSAGE, QueryOutput, run_query, run_query_file};
pub use sqlite::{SqliteLoader, connect_sqlite, open_existing_sqlite};
