use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use shopforge_core::{Dataset, EntityKind};

use crate::errors::GenerationError;

/// Write one entity table as CSV: header row, then one row per record.
pub fn write_table_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(counting);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

/// Read one entity table back into typed rows.
pub fn read_table_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, GenerationError> {
    if !path.exists() {
        return Err(GenerationError::MissingInput(format!(
            "dataset file not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, csv::Error>>()?;
    Ok(rows)
}

/// Write all five tables into `dir`, returning total bytes written.
pub fn write_dataset(dir: &Path, dataset: &Dataset) -> Result<u64, GenerationError> {
    let mut bytes = 0;
    for kind in EntityKind::ALL {
        let path = dir.join(kind.file_name());
        bytes += match kind {
            EntityKind::Customers => write_table_csv(&path, &dataset.customers)?,
            EntityKind::Products => write_table_csv(&path, &dataset.products)?,
            EntityKind::Orders => write_table_csv(&path, &dataset.orders)?,
            EntityKind::OrderItems => write_table_csv(&path, &dataset.order_items)?,
            EntityKind::Payments => write_table_csv(&path, &dataset.payments)?,
        };
    }
    Ok(bytes)
}

/// Reload a dataset previously written with [`write_dataset`].
pub fn read_dataset(dir: &Path) -> Result<Dataset, GenerationError> {
    let path = |kind: EntityKind| dir.join(kind.file_name());
    Ok(Dataset {
        customers: read_table_csv(&path(EntityKind::Customers))?,
        products: read_table_csv(&path(EntityKind::Products))?,
        orders: read_table_csv(&path(EntityKind::Orders))?,
        order_items: read_table_csv(&path(EntityKind::OrderItems))?,
        payments: read_table_csv(&path(EntityKind::Payments))?,
    })
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
