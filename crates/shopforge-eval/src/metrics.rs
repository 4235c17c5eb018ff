use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shopforge_core::{CheckKind, Money};

/// Metrics contract version for dataset evaluation.
pub const METRICS_VERSION: &str = "0.1";

/// Machine-readable metrics for a dataset evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub metrics_version: String,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub tables: Vec<TableMetrics>,
    pub checks: Vec<CheckStats>,
    pub orders_without_items: Vec<i64>,
    /// Sum of every order total.
    pub revenue: Money,
    /// Payment count per status label.
    pub payment_status: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningItem>,
    pub performance: PerformanceMetrics,
}

impl MetricsReport {
    pub fn total_violations(&self) -> u64 {
        self.checks.iter().map(|check| check.violations).sum()
    }
}

/// Per-table row counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetrics {
    pub table: String,
    pub rows_found: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_expected: Option<u64>,
}

/// Violation count for one invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStats {
    pub check: CheckKind,
    pub violations: u64,
}

/// Structured warning entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningItem {
    pub code: String,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Performance timings for the evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub load_ms: u128,
    pub validate_ms: u128,
    pub total_ms: u128,
}
