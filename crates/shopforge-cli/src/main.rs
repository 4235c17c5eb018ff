mod config;
mod registry;

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use config::{ConfigError, ShopforgeConfig, load_config};
use registry::{RunContext, init_run_logging, start_run};
use serde::Serialize;
use shopforge_core::{Catalog, timestamp};
use shopforge_eval::{EvalError, EvaluationEngine};
use shopforge_generate::{CountRange, EntityCounts, GenerationEngine, GenerationError};
use shopforge_load::{
    DEFAULT_JOIN_QUERY, LoadError, Loader, SqliteLoader, connect_sqlite, open_existing_sqlite,
    run_query, run_query_file,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "shopforge", version, about = "Synthetic e-commerce dataset generator")]
struct Cli {
    /// Optional TOML config file; flags override its values.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Registry directory for run config and logs.
    #[arg(long, global = true, value_name = "DIR")]
    runs_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the five CSV tables into a new run directory.
    Generate(GenerateArgs),
    /// Re-check a generated run directory and write metrics.
    Evaluate(EvaluateArgs),
    /// Load a run directory into a SQLite database.
    Load(LoadArgs),
    /// Run a SQL file against the SQLite database.
    Query(QueryArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Output directory for generation runs.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Seed for the random stream.
    #[arg(long)]
    seed: Option<u64>,
    /// Lower bound of each sampled row count.
    #[arg(long, requires = "max")]
    min: Option<u64>,
    /// Upper bound of each sampled row count.
    #[arg(long, requires = "min")]
    max: Option<u64>,
    /// Explicit counts as customers,products,orders,order_items,payments.
    #[arg(long, value_parser = parse_counts, value_name = "C,P,O,I,PAY")]
    counts: Option<EntityCounts>,
    /// Reference "now" as YYYY-MM-DDTHH:MM:SS.
    #[arg(long, value_parser = parse_reference_time)]
    reference_time: Option<NaiveDateTime>,
    /// Fail when the item count cannot cover every order.
    #[arg(long, default_value_t = false)]
    require_item_coverage: bool,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Run directory holding the CSV tables.
    run: PathBuf,
    /// Report violations without failing.
    #[arg(long, default_value_t = false)]
    lenient: bool,
    /// Write violations.json next to the metrics.
    #[arg(long, default_value_t = false)]
    write_violations: bool,
    /// Maximum violations listed in report.md.
    #[arg(long)]
    max_examples: Option<usize>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Run directory holding the CSV tables.
    data: PathBuf,
    /// SQLite database file.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// SQL file to execute; the bundled join query when omitted.
    #[arg(long)]
    sql: Option<PathBuf>,
    /// SQLite database file.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(runs_dir) = cli.runs_dir {
        config.runs_dir = runs_dir;
    }

    match cli.command {
        Command::Generate(args) => run_generate(config, args),
        Command::Evaluate(args) => run_evaluate(config, args),
        Command::Load(args) => run_load(config, args).await,
        Command::Query(args) => run_query_command(config, args).await,
    }
}

fn run_generate(config: ShopforgeConfig, args: GenerateArgs) -> Result<(), CliError> {
    let mut options = config.generate;
    if let Some(out) = args.out {
        options.out_dir = out;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    if let (Some(min), Some(max)) = (args.min, args.max) {
        options.count_range = CountRange { min, max };
    }
    if let Some(counts) = args.counts {
        options.counts = Some(counts);
    }
    if let Some(reference_time) = args.reference_time {
        options.reference_time = Some(reference_time);
    }
    if args.require_item_coverage {
        options.require_item_coverage = true;
    }
    options
        .validate()
        .map_err(|err| CliError::InvalidConfig(err.to_string()))?;

    let run_id = begin_run(&config.runs_dir, "generate", &options)?;
    let timer = Instant::now();

    let result = GenerationEngine::new(options).run()?;
    for table in &result.report.tables {
        tracing::info!(
            event = "table_written",
            table = %table.table,
            rows = table.rows_generated
        );
    }
    for warning in &result.report.warnings {
        tracing::warn!(
            event = "generation_warning",
            code = %warning.code,
            detail = %warning.message
        );
    }

    println!("run_dir={}", result.run_dir.display());
    finish_run(&run_id, timer);
    Ok(())
}

fn run_evaluate(config: ShopforgeConfig, args: EvaluateArgs) -> Result<(), CliError> {
    let mut options = config.evaluate;
    if args.lenient {
        options.strict = false;
    }
    if args.write_violations {
        options.write_violations = true;
    }
    if let Some(max_examples) = args.max_examples {
        options.max_examples = max_examples;
    }

    let run_id = begin_run(
        &config.runs_dir,
        "evaluate",
        &serde_json::json!({ "run": args.run, "options": options }),
    )?;
    let timer = Instant::now();

    let result = EvaluationEngine::new(options).run(&args.run)?;
    tracing::info!(
        event = "metrics_written",
        path = %result.metrics_path.display(),
        violations = result.violations.len()
    );

    println!("metrics_path={}", result.metrics_path.display());
    println!("report_path={}", result.report_path.display());
    finish_run(&run_id, timer);
    Ok(())
}

async fn run_load(config: ShopforgeConfig, args: LoadArgs) -> Result<(), CliError> {
    let db_path = args.db.unwrap_or(config.database.path);
    let run_id = begin_run(
        &config.runs_dir,
        "load",
        &serde_json::json!({ "data": args.data, "db": db_path }),
    )?;
    let timer = Instant::now();

    let pool = connect_sqlite(&db_path).await?;
    let loader = SqliteLoader::new(pool.clone());
    let report = loader.load_dir(&Catalog::ecommerce(), &args.data).await?;
    pool.close().await;

    for table in &report.tables {
        tracing::info!(event = "table_loaded", table = %table.table, rows = table.rows_inserted);
    }
    println!("Data loaded successfully into {}", db_path.display());
    finish_run(&run_id, timer);
    Ok(())
}

async fn run_query_command(config: ShopforgeConfig, args: QueryArgs) -> Result<(), CliError> {
    let db_path = args.db.unwrap_or(config.database.path);
    let run_id = begin_run(
        &config.runs_dir,
        "query",
        &serde_json::json!({ "sql": args.sql, "db": db_path }),
    )?;
    let timer = Instant::now();

    let output = match &args.sql {
        Some(sql_path) => run_query_file(&db_path, sql_path).await?,
        None => {
            let pool = open_existing_sqlite(&db_path).await?;
            let output = run_query(&pool, DEFAULT_JOIN_QUERY).await;
            pool.close().await;
            output?
        }
    };

    println!("{}", output.render());
    finish_run(&run_id, timer);
    Ok(())
}

fn begin_run<T: Serialize>(
    runs_dir: &std::path::Path,
    command: &str,
    options: &T,
) -> Result<String, CliError> {
    let run_id = Uuid::new_v4().to_string();
    let ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        command: command.to_string(),
        runs_dir: runs_dir.to_path_buf(),
        options: serde_json::to_value(options)?,
    };

    let run_paths = start_run(&ctx)?;
    init_run_logging(&run_paths.logs_ndjson)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        command = %command,
        run_dir = %run_paths.run_dir.display(),
        config = %run_paths.config_json.display()
    );
    Ok(run_id)
}

fn finish_run(run_id: &str, timer: Instant) {
    let duration_ms = timer.elapsed().as_millis() as u64;
    tracing::info!(
        event = "run_finished",
        run_id = %run_id,
        status = "success",
        duration_ms = duration_ms
    );
}

fn parse_counts(raw: &str) -> Result<EntityCounts, String> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid count: {err}"))?;

    match values.as_slice() {
        &[customers, products, orders, order_items, payments] => Ok(EntityCounts {
            customers,
            products,
            orders,
            order_items,
            payments,
        }),
        _ => Err(format!("expected 5 comma-separated counts, got {}", values.len())),
    }
}

fn parse_reference_time(raw: &str) -> Result<NaiveDateTime, String> {
    timestamp::parse(raw).map_err(|err| format!("expected {}: {err}", timestamp::FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_flag_parses_five_values() {
        let counts = parse_counts("3, 2,2,3,1").expect("parse counts");
        assert_eq!(
            counts,
            EntityCounts {
                customers: 3,
                products: 2,
                orders: 2,
                order_items: 3,
                payments: 1,
            }
        );
        assert!(parse_counts("3,2,2").is_err());
        assert!(parse_counts("3,2,x,3,1").is_err());
    }

    #[test]
    fn generate_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "shopforge",
            "--config",
            "shopforge.toml",
            "generate",
            "--seed",
            "7",
            "--counts",
            "3,2,2,1,1",
            "--reference-time",
            "2025-01-01T00:00:00",
        ])
        .expect("parse cli");

        assert_eq!(cli.config, Some(PathBuf::from("shopforge.toml")));
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.counts.map(|counts| counts.order_items), Some(1));
                assert!(args.reference_time.is_some());
                assert!(!args.require_item_coverage);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn min_requires_max() {
        assert!(Cli::try_parse_from(["shopforge", "generate", "--min", "5"]).is_err());
    }

    #[test]
    fn query_defaults_to_bundled_sql() {
        let cli = Cli::try_parse_from(["shopforge", "query"]).expect("parse cli");
        match cli.command {
            Command::Query(args) => {
                assert!(args.sql.is_none());
                assert!(args.db.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
