use std::any::Any;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{NaiveDateTime, SubsecRound, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use shopforge_core::{Dataset, EntityKind, ensure_valid, timestamp};

use crate::aggregate::aggregate_order_totals;
use crate::errors::GenerationError;
use crate::generators::{
    UniqueValues, generate_customers, generate_order_items, generate_orders, generate_payments,
    generate_products,
};
use crate::model::{EntityCounts, GenerateOptions, GenerationIssue, GenerationReport, TableReport};
use crate::output::write_dataset;
use crate::planner::plan_counts;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
    pub dataset: Dataset,
}

/// Entry point for generating a dataset into a run directory.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        self.options.validate()?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        std::fs::create_dir_all(&run_dir)?;

        let now = self
            .options
            .reference_time
            .unwrap_or_else(|| Utc::now().naive_utc())
            .trunc_subsecs(0);
        let mut resolved = self.options.clone();
        resolved.reference_time = Some(now);

        let mut rng = ChaCha8Rng::seed_from_u64(self.options.seed);
        let counts = match self.options.counts {
            Some(counts) => counts,
            None => plan_counts(&self.options.count_range, &mut rng),
        };
        resolved.counts = Some(counts);

        let config_path = run_dir.join("resolved_config.json");
        std::fs::write(&config_path, serde_json::to_vec_pretty(&resolved)?)?;

        let mut report =
            GenerationReport::new(run_id.clone(), self.options.seed, timestamp::format(&now));
        report.counts = Some(counts);

        info!(
            run_id = %run_id,
            seed = self.options.seed,
            reference_time = %report.reference_time,
            orders = counts.orders,
            order_items = counts.order_items,
            "generation started"
        );

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
            || -> Result<Dataset, GenerationError> {
                check_coverage_policy(&counts, &self.options, &mut report)?;
                let dataset = generate_dataset(
                    &counts,
                    now,
                    self.options.max_unique_attempts,
                    &mut rng,
                )?;
                ensure_valid(&dataset)?;

                report.bytes_written = write_dataset(&run_dir, &dataset)?;
                for kind in EntityKind::ALL {
                    report.tables.push(TableReport {
                        table: kind.table_name().to_string(),
                        file: kind.file_name(),
                        rows_requested: counts.get(kind),
                        rows_generated: dataset.row_count(kind) as u64,
                    });
                }
                report.orders_without_items = dataset.orders_without_items();
                Ok(dataset)
            },
        ));

        report.duration_ms = start.elapsed().as_millis() as u64;

        let report_path = run_dir.join("generation_report.json");
        let write_report = |report: &GenerationReport| -> Result<(), GenerationError> {
            std::fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
            Ok(())
        };

        match outcome {
            Ok(Ok(dataset)) => {
                write_report(&report)?;
                info!(
                    run_id = %run_id,
                    tables = report.tables.len(),
                    duration_ms = report.duration_ms,
                    bytes_written = report.bytes_written,
                    "generation completed"
                );
                Ok(GenerationResult {
                    run_dir,
                    report,
                    dataset,
                })
            }
            Ok(Err(err)) => {
                record_generation_failure(&mut report, err.to_string());
                write_report(&report)?;
                warn!(run_id = %run_id, error = %err, "generation failed");
                Err(err)
            }
            Err(panic) => {
                record_generation_failure(&mut report, panic_message(panic));
                write_report(&report)?;
                warn!(run_id = %run_id, "generation panicked");
                Err(GenerationError::Failed(Box::new(report)))
            }
        }
    }
}

/// Generate the whole dataset in memory from one random stream.
///
/// Stages run parent-first: customers, products, orders, order items, the
/// total aggregation, then payments.
pub fn generate_dataset<R: Rng + ?Sized>(
    counts: &EntityCounts,
    now: NaiveDateTime,
    max_unique_attempts: u32,
    rng: &mut R,
) -> Result<Dataset, GenerationError> {
    let mut emails = UniqueValues::new("email", max_unique_attempts);
    let customers = generate_customers(counts.customers, now, &mut emails, rng)?;
    debug!(table = "customers", rows = customers.len(), "table generated");

    let products = generate_products(counts.products, rng);
    debug!(table = "products", rows = products.len(), "table generated");

    let customer_ids: Vec<i64> = customers.iter().map(|c| c.customer_id).collect();
    let orders = generate_orders(counts.orders, &customer_ids, now, rng)?;
    debug!(table = "orders", rows = orders.len(), "table generated");

    let order_ids: Vec<i64> = orders.iter().map(|o| o.order_id).collect();
    let order_items = generate_order_items(counts.order_items, &order_ids, &products, rng)?;
    debug!(table = "order_items", rows = order_items.len(), "table generated");

    let orders = aggregate_order_totals(&orders, &order_items)?;
    debug!(table = "orders", rows = orders.len(), "order totals aggregated");

    let payments = generate_payments(counts.payments, &orders, rng)?;
    debug!(table = "payments", rows = payments.len(), "table generated");

    Ok(Dataset {
        customers,
        products,
        orders,
        order_items,
        payments,
    })
}

fn check_coverage_policy(
    counts: &EntityCounts,
    options: &GenerateOptions,
    report: &mut GenerationReport,
) -> Result<(), GenerationError> {
    if counts.covers_orders() {
        return Ok(());
    }

    let message = format!(
        "{} order items cannot cover {} orders",
        counts.order_items, counts.orders
    );
    if options.require_item_coverage {
        return Err(GenerationError::InvalidConfig(message));
    }

    warn!(
        orders = counts.orders,
        order_items = counts.order_items,
        "some orders will have no items"
    );
    report.record_warning(GenerationIssue {
        level: "warning".to_string(),
        code: "orders_without_items".to_string(),
        message,
        table: Some(EntityKind::OrderItems.table_name().to_string()),
    });
    Ok(())
}

fn record_generation_failure(report: &mut GenerationReport, message: String) {
    report.record_error(GenerationIssue {
        level: "error".to_string(),
        code: "generation_failed".to_string(),
        message,
        table: None,
    });
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}
