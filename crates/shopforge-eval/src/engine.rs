use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use shopforge_core::{CheckKind, Dataset, EntityKind, Money, Violation, validate_dataset};
use shopforge_generate::model::GenerationReport;
use shopforge_generate::output::read_dataset;

use crate::errors::EvalError;
use crate::metrics::{
    CheckStats, METRICS_VERSION, MetricsReport, PerformanceMetrics, TableMetrics, WarningItem,
};
use crate::model::{EvaluateOptions, EvaluationResult};
use crate::report::render_report;

/// Evaluate a generated dataset directory against the dataset invariants.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    options: EvaluateOptions,
}

impl EvaluationEngine {
    pub fn new(options: EvaluateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, dataset_dir: &Path) -> Result<EvaluationResult, EvalError> {
        let total_start = Instant::now();
        let load_start = Instant::now();

        if !dataset_dir.is_dir() {
            return Err(EvalError::MissingInput(format!(
                "dataset directory not found: {}",
                dataset_dir.display()
            )));
        }

        let generation = load_generation_report(dataset_dir);
        let run_id = generation
            .as_ref()
            .map(|report| report.run_id.clone())
            .or_else(|| run_id_from_dir_name(dataset_dir))
            .unwrap_or_else(|| "unknown".to_string());

        let dataset = read_dataset(dataset_dir)?;
        let load_ms = load_start.elapsed().as_millis();

        let validate_start = Instant::now();
        let mut violations = validate_dataset(&dataset);
        sort_violations(&mut violations);
        let validate_ms = validate_start.elapsed().as_millis();

        let orders_without_items = dataset.orders_without_items();
        let mut warnings = Vec::new();
        if !orders_without_items.is_empty() {
            warnings.push(WarningItem {
                code: "orders_without_items".to_string(),
                path: EntityKind::Orders.table_name().to_string(),
                message: format!("{} order(s) have no items", orders_without_items.len()),
                hint: Some("order item count is below order count".to_string()),
            });
        }

        let tables = build_table_metrics(&dataset, generation.as_ref(), &mut warnings);
        let metrics = MetricsReport {
            metrics_version: METRICS_VERSION.to_string(),
            run_id: run_id.clone(),
            seed: generation.as_ref().map(|report| report.seed),
            tables,
            checks: count_checks(&violations),
            orders_without_items,
            revenue: dataset.orders.iter().map(|order| order.total_amount).sum::<Money>(),
            payment_status: payment_status_counts(&dataset),
            warnings,
            performance: PerformanceMetrics {
                load_ms,
                validate_ms,
                total_ms: total_start.elapsed().as_millis(),
            },
        };

        let report = render_report(&metrics, &violations, self.options.max_examples);
        let out_dir = self
            .options
            .out_dir
            .clone()
            .unwrap_or_else(|| dataset_dir.to_path_buf());
        std::fs::create_dir_all(&out_dir)?;

        let metrics_path = out_dir.join("metrics.json");
        std::fs::write(&metrics_path, serde_json::to_vec_pretty(&metrics)?)?;

        let report_path = out_dir.join("report.md");
        std::fs::write(&report_path, report.as_bytes())?;

        let violations_path = if self.options.write_violations {
            let path = out_dir.join("violations.json");
            std::fs::write(&path, serde_json::to_vec_pretty(&violations)?)?;
            Some(path)
        } else {
            None
        };

        if violations.is_empty() {
            info!(run_id = %run_id, "evaluation passed");
        } else {
            warn!(
                run_id = %run_id,
                violations = violations.len(),
                "evaluation found violations"
            );
        }

        if self.options.strict && !violations.is_empty() {
            return Err(EvalError::Violations(violations.len() as u64));
        }

        Ok(EvaluationResult {
            run_dir: out_dir,
            metrics_path,
            report_path,
            violations_path,
            metrics,
            report,
            violations,
        })
    }
}

fn build_table_metrics(
    dataset: &Dataset,
    generation: Option<&GenerationReport>,
    warnings: &mut Vec<WarningItem>,
) -> Vec<TableMetrics> {
    let mut tables = Vec::new();
    for (kind, rows_found) in dataset.row_counts() {
        let rows_found = rows_found as u64;
        let rows_expected = generation.and_then(|report| {
            report
                .tables
                .iter()
                .find(|table| table.table == kind.table_name())
                .map(|table| table.rows_generated)
        });

        if let Some(expected) = rows_expected.filter(|expected| *expected != rows_found) {
            warnings.push(WarningItem {
                code: "row_count_mismatch".to_string(),
                path: kind.table_name().to_string(),
                message: format!("expected {expected} rows, found {rows_found}"),
                hint: None,
            });
        }

        tables.push(TableMetrics {
            table: kind.table_name().to_string(),
            rows_found,
            rows_expected,
        });
    }
    tables
}

fn count_checks(violations: &[Violation]) -> Vec<CheckStats> {
    CheckKind::ALL
        .iter()
        .map(|kind| CheckStats {
            check: *kind,
            violations: violations
                .iter()
                .filter(|violation| violation.check == *kind)
                .count() as u64,
        })
        .collect()
}

fn payment_status_counts(dataset: &Dataset) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for payment in &dataset.payments {
        *counts
            .entry(payment.payment_status.as_str().to_string())
            .or_insert(0) += 1;
    }
    counts
}

fn load_generation_report(dataset_dir: &Path) -> Option<GenerationReport> {
    let contents = std::fs::read_to_string(dataset_dir.join("generation_report.json")).ok()?;
    serde_json::from_str(&contents).ok()
}

fn run_id_from_dir_name(dataset_dir: &Path) -> Option<String> {
    let name = dataset_dir.file_name()?.to_string_lossy();
    name.split_once("__run_")
        .map(|(_, run_part)| run_part.to_string())
}

fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        (a.table, a.check, a.row_id.unwrap_or_default()).cmp(&(
            b.table,
            b.check,
            b.row_id.unwrap_or_default(),
        ))
    });
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;
    use shopforge_core::Order;
    use shopforge_generate::output::{read_table_csv, write_table_csv};
    use shopforge_generate::{CountRange, GenerateOptions, GenerationEngine};

    use super::*;

    fn generate_run(label: &str) -> PathBuf {
        let options = GenerateOptions {
            out_dir: temp_out_dir(label),
            seed: 11,
            count_range: CountRange { min: 10, max: 20 },
            reference_time: NaiveDate::from_ymd_opt(2025, 3, 1)
                .and_then(|date| date.and_hms_opt(8, 30, 0)),
            ..GenerateOptions::default()
        };
        GenerationEngine::new(options)
            .run()
            .expect("generate dataset")
            .run_dir
    }

    fn break_first_order_total(run_dir: &Path) {
        let path = run_dir.join("orders.csv");
        let mut orders: Vec<Order> = read_table_csv(&path).expect("read orders");
        orders[0].total_amount = orders[0].total_amount + Money::from_cents(1);
        write_table_csv(&path, &orders).expect("write orders");
    }

    #[test]
    fn clean_run_passes_and_writes_artifacts() {
        let run_dir = generate_run("eval_clean");
        let result = EvaluationEngine::new(EvaluateOptions::default())
            .run(&run_dir)
            .expect("evaluate");

        assert!(result.violations.is_empty());
        assert!(result.metrics_path.exists());
        assert!(result.report_path.exists());
        assert!(result.violations_path.is_none());
        assert_eq!(result.metrics.total_violations(), 0);
        assert_eq!(result.metrics.checks.len(), CheckKind::ALL.len());
        assert_eq!(result.metrics.seed, Some(11));
        let tables: Vec<&str> = result
            .metrics
            .tables
            .iter()
            .map(|table| table.table.as_str())
            .collect();
        assert_eq!(
            tables,
            vec!["customers", "products", "orders", "order_items", "payments"]
        );
        for table in &result.metrics.tables {
            assert_eq!(table.rows_expected, Some(table.rows_found));
        }
        let payments: u64 = result.metrics.payment_status.values().sum();
        assert_eq!(
            Some(payments),
            result
                .metrics
                .tables
                .iter()
                .find(|table| table.table == "payments")
                .map(|table| table.rows_found)
        );
    }

    #[test]
    fn strict_mode_fails_on_tampered_totals() {
        let run_dir = generate_run("eval_strict");
        break_first_order_total(&run_dir);

        let err = EvaluationEngine::new(EvaluateOptions::default())
            .run(&run_dir)
            .expect_err("tampered total");
        assert!(matches!(err, EvalError::Violations(1)), "{err}");
        assert!(run_dir.join("report.md").exists());
    }

    #[test]
    fn lenient_mode_reports_violations() {
        let run_dir = generate_run("eval_lenient");
        break_first_order_total(&run_dir);

        let options = EvaluateOptions {
            strict: false,
            write_violations: true,
            ..EvaluateOptions::default()
        };
        let result = EvaluationEngine::new(options)
            .run(&run_dir)
            .expect("evaluate");

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].check, CheckKind::OrderTotal);
        assert_eq!(result.violations[0].row_id, Some(1));
        assert!(result.violations_path.is_some_and(|path| path.exists()));
        assert!(result.report.contains("## Top violations"));
    }

    #[test]
    fn missing_directory_is_missing_input() {
        let dir = std::env::temp_dir()
            .join(format!("shopforge_eval_absent_{}", uuid::Uuid::new_v4()));
        let err = EvaluationEngine::new(EvaluateOptions::default())
            .run(&dir)
            .expect_err("absent directory");
        assert!(matches!(err, EvalError::MissingInput(_)), "{err}");
    }

    #[test]
    fn missing_table_is_missing_input() {
        let run_dir = generate_run("eval_missing_table");
        std::fs::remove_file(run_dir.join("payments.csv")).expect("remove payments.csv");

        let err = EvaluationEngine::new(EvaluateOptions::default())
            .run(&run_dir)
            .expect_err("missing payments");
        assert!(err.to_string().contains("payments.csv"), "{err}");
    }

    fn temp_out_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("shopforge_eval_{label}_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp out dir");
        dir
    }
}
