pub mod csv;

pub use self::csv::{read_dataset, read_table_csv, write_dataset, write_table_csv};
