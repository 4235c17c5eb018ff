use shopforge_core::{CheckKind, Violation};

use crate::metrics::MetricsReport;

/// Render a deterministic markdown report from metrics and violations.
pub fn render_report(
    metrics: &MetricsReport,
    violations: &[Violation],
    max_examples: usize,
) -> String {
    let mut lines = Vec::new();

    lines.push("# Shopforge Evaluation Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", metrics.run_id));
    if let Some(seed) = metrics.seed {
        lines.push(format!("- seed: {seed}"));
    }
    lines.push(format!("- revenue: {}", metrics.revenue));
    lines.push(String::new());

    lines.push("## Row counts".to_string());
    lines.push("| table | rows_expected | rows_found |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    for table in &metrics.tables {
        let expected = table
            .rows_expected
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "| {} | {} | {} |",
            table.table, expected, table.rows_found
        ));
    }
    lines.push(String::new());

    lines.push("## Invariant checks".to_string());
    lines.push("| check | violations |".to_string());
    lines.push("| --- | --- |".to_string());
    for check in &metrics.checks {
        lines.push(format!("| {} | {} |", check.check.as_str(), check.violations));
    }
    lines.push(String::new());

    lines.push("## Payment status".to_string());
    for (status, count) in &metrics.payment_status {
        lines.push(format!("- {status}: {count}"));
    }
    lines.push(String::new());

    if !metrics.warnings.is_empty() {
        lines.push("## Warnings".to_string());
        for warning in &metrics.warnings {
            let hint = warning
                .hint
                .as_ref()
                .map(|hint| format!(" (hint: {hint})"))
                .unwrap_or_default();
            lines.push(format!("- {}: {}{}", warning.path, warning.message, hint));
        }
        lines.push(String::new());
    }

    if !violations.is_empty() {
        lines.push("## Top violations".to_string());
        for violation in violations.iter().take(max_examples) {
            let row = violation
                .row_id
                .map(|row| format!(" row {row}"))
                .unwrap_or_default();
            lines.push(format!(
                "- {}.{}{}: {}",
                violation.table,
                violation.check.as_str(),
                row,
                violation.message
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(metrics));
    lines.join("\n")
}

fn recommendations(metrics: &MetricsReport) -> Vec<String> {
    let failing = |kind: CheckKind| {
        metrics
            .checks
            .iter()
            .any(|check| check.check == kind && check.violations > 0)
    };

    let mut lines = Vec::new();
    if failing(CheckKind::PrimaryKey) || failing(CheckKind::Unique) {
        lines.push("- regenerate the dataset; keys or emails were duplicated.".to_string());
    }
    if failing(CheckKind::ForeignKey) {
        lines.push("- ensure parent tables are written before children.".to_string());
    }
    if failing(CheckKind::OrderTotal) {
        lines.push("- rerun the aggregation pass after editing order items.".to_string());
    }
    if failing(CheckKind::Coverage) || !metrics.orders_without_items.is_empty() {
        lines.push("- raise the order item count to at least the order count.".to_string());
    }
    if metrics.total_violations() == 0 {
        lines.push("- no violations detected; compare metrics across runs for drift.".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use shopforge_core::{EntityKind, Money};

    use super::*;
    use crate::metrics::{CheckStats, PerformanceMetrics, TableMetrics};

    fn metrics(violations: u64) -> MetricsReport {
        MetricsReport {
            metrics_version: "0.1".to_string(),
            run_id: "run-1".to_string(),
            seed: Some(7),
            tables: vec![TableMetrics {
                table: "orders".to_string(),
                rows_found: 2,
                rows_expected: Some(2),
            }],
            checks: vec![CheckStats {
                check: CheckKind::OrderTotal,
                violations,
            }],
            orders_without_items: Vec::new(),
            revenue: Money::from_cents(4250),
            payment_status: BTreeMap::from([("Completed".to_string(), 1)]),
            warnings: Vec::new(),
            performance: PerformanceMetrics {
                load_ms: 0,
                validate_ms: 0,
                total_ms: 0,
            },
        }
    }

    #[test]
    fn clean_report_lists_counts_and_no_violations() {
        let report = render_report(&metrics(0), &[], 5);
        assert!(report.starts_with("# Shopforge Evaluation Report"));
        assert!(report.contains("| orders | 2 | 2 |"));
        assert!(report.contains("- revenue: 42.50"));
        assert!(report.contains("no violations detected"));
        assert!(!report.contains("## Top violations"));
    }

    #[test]
    fn violations_are_capped_by_max_examples() {
        let violations: Vec<Violation> = (1..=3)
            .map(|row_id| Violation {
                check: CheckKind::OrderTotal,
                table: EntityKind::Orders,
                row_id: Some(row_id),
                message: "total mismatch".to_string(),
            })
            .collect();
        let report = render_report(&metrics(3), &violations, 2);

        assert!(report.contains("- orders.order_total row 1: total mismatch"));
        assert!(report.contains("- orders.order_total row 2: total mismatch"));
        assert!(!report.contains("row 3"));
        assert!(report.contains("rerun the aggregation pass"));
    }
}
