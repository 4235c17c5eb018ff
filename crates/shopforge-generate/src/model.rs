use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use shopforge_core::EntityKind;

use crate::errors::GenerationError;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
    /// Seed of the single random stream every generator draws from.
    pub seed: u64,
    /// Inclusive range each planned row count is sampled from.
    pub count_range: CountRange,
    /// Explicit row counts; bypasses the planner when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<EntityCounts>,
    /// "Now" for timestamp windows; the wall clock at run start when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<NaiveDateTime>,
    /// Maximum draws for a single unique value (customer email).
    pub max_unique_attempts: u32,
    /// Reject runs whose item count cannot cover every order.
    pub require_item_coverage: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data"),
            seed: 2024,
            count_range: CountRange::default(),
            counts: None,
            reference_time: None,
            max_unique_attempts: 1000,
            require_item_coverage: false,
        }
    }
}

impl GenerateOptions {
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.count_range.validate()?;
        if let Some(counts) = &self.counts {
            counts.validate()?;
        }
        if self.max_unique_attempts == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_unique_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Inclusive bounds for a sampled row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u64,
    pub max: u64,
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 100, max: 200 }
    }
}

impl CountRange {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.min == 0 {
            return Err(GenerationError::InvalidConfig(
                "count_range.min must be at least 1".to_string(),
            ));
        }
        if self.min > self.max {
            return Err(GenerationError::InvalidConfig(format!(
                "count_range.min ({}) exceeds count_range.max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Row count per entity for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub customers: u64,
    pub products: u64,
    pub orders: u64,
    pub order_items: u64,
    pub payments: u64,
}

impl EntityCounts {
    pub fn get(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Customers => self.customers,
            EntityKind::Products => self.products,
            EntityKind::Orders => self.orders,
            EntityKind::OrderItems => self.order_items,
            EntityKind::Payments => self.payments,
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        for kind in EntityKind::ALL {
            if self.get(kind) == 0 {
                return Err(GenerationError::InvalidConfig(format!(
                    "counts.{} must be at least 1",
                    kind.table_name()
                )));
            }
        }
        Ok(())
    }

    /// Whether the item budget is large enough to give every order an item.
    pub fn covers_orders(&self) -> bool {
        self.order_items >= self.orders
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub file: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub dataset_version: String,
    pub seed: u64,
    pub reference_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<EntityCounts>,
    pub tables: Vec<TableReport>,
    pub orders_without_items: Vec<i64>,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub warnings: Vec<GenerationIssue>,
    pub errors: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, reference_time: String) -> Self {
        Self {
            run_id,
            dataset_version: shopforge_core::DATASET_VERSION.to_string(),
            seed,
            reference_time,
            counts: None,
            tables: Vec::new(),
            orders_without_items: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        self.warnings.push(issue);
    }

    pub fn record_error(&mut self, issue: GenerationIssue) {
        self.errors.push(issue);
    }
}
