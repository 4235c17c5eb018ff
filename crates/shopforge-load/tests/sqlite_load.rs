use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use shopforge_core::{Catalog, Dataset, EntityKind};
use shopforge_generate::{EntityCounts, GenerateOptions, GenerationEngine, generate_dataset};
use shopforge_load::{
    DEFAULT_JOIN_QUERY, LoadError, Loader, NO_ROWS_MESSAGE, SqliteLoader, connect_sqlite,
    run_query, run_query_file,
};

fn dataset() -> Dataset {
    let counts = EntityCounts {
        customers: 12,
        products: 8,
        orders: 15,
        order_items: 30,
        payments: 10,
    };
    let now = NaiveDate::from_ymd_opt(2025, 1, 15)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("valid timestamp");
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    generate_dataset(&counts, now, 1000, &mut rng).expect("generate dataset")
}

async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite")
}

async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

#[tokio::test]
async fn loads_every_table_parent_first() {
    let dataset = dataset();
    let loader = SqliteLoader::new(memory_pool().await);
    let report = loader
        .load(&Catalog::ecommerce(), &dataset)
        .await
        .expect("load dataset");

    assert_eq!(report.engine, "sqlite");
    let order: Vec<&str> = report.tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(
        order,
        vec!["customers", "products", "orders", "order_items", "payments"]
    );
    for kind in EntityKind::ALL {
        let expected = dataset.row_count(kind) as i64;
        assert_eq!(count_rows(loader.pool(), kind.table_name()).await, expected);
        assert_eq!(report.rows_for(kind.table_name()), Some(expected as u64));
    }
}

#[tokio::test]
async fn reloading_replaces_previous_rows() {
    let dataset = dataset();
    let loader = SqliteLoader::new(memory_pool().await);
    let catalog = Catalog::ecommerce();
    loader.load(&catalog, &dataset).await.expect("first load");
    loader.load(&catalog, &dataset).await.expect("second load");

    assert_eq!(
        count_rows(loader.pool(), "order_items").await,
        dataset.order_items.len() as i64
    );
}

#[tokio::test]
async fn foreign_keys_are_enforced_after_load() {
    let loader = SqliteLoader::new(memory_pool().await);
    loader
        .load(&Catalog::ecommerce(), &dataset())
        .await
        .expect("load dataset");

    let orphan = sqlx::query(
        "INSERT INTO orders (order_id, customer_id, order_date, total_amount) \
         VALUES (9999, 424242, '2025-01-01T00:00:00', 0)",
    )
    .execute(loader.pool())
    .await;
    assert!(orphan.is_err(), "orphan order must be rejected");

    let duplicate_email = sqlx::query(
        "INSERT INTO customers (customer_id, name, email) \
         SELECT 9999, 'Copy', email FROM customers WHERE customer_id = 1",
    )
    .execute(loader.pool())
    .await;
    assert!(duplicate_email.is_err(), "duplicate email must be rejected");
}

#[tokio::test]
async fn join_query_returns_rows_and_empty_result_renders_message() {
    let loader = SqliteLoader::new(memory_pool().await);
    loader
        .load(&Catalog::ecommerce(), &dataset())
        .await
        .expect("load dataset");

    let output = run_query(loader.pool(), DEFAULT_JOIN_QUERY)
        .await
        .expect("join query");
    assert!(!output.is_empty());
    assert_eq!(output.columns.first().map(String::as_str), Some("order_id"));
    assert!(output.rows.len() <= 20);

    let empty = run_query(loader.pool(), "SELECT * FROM orders WHERE order_id < 0")
        .await
        .expect("empty query");
    assert_eq!(empty.render(), NO_ROWS_MESSAGE);
}

#[tokio::test]
async fn only_money_columns_are_rounded_to_cents() {
    let pool = memory_pool().await;
    let output = run_query(&pool, "SELECT 1.0 / 3 AS ratio, 12.3 AS total_amount, 7 AS units")
        .await
        .expect("literal query");

    assert_eq!(
        output.rows,
        vec![vec![
            Some((1.0_f64 / 3.0).to_string()),
            Some("12.30".to_string()),
            Some("7".to_string()),
        ]]
    );
}

#[tokio::test]
async fn file_database_round_trip_from_run_directory() {
    let work_dir = temp_dir("file_db");
    let options = GenerateOptions {
        out_dir: work_dir.join("data"),
        counts: Some(EntityCounts {
            customers: 5,
            products: 4,
            orders: 6,
            order_items: 9,
            payments: 3,
        }),
        ..GenerateOptions::default()
    };
    let run = GenerationEngine::new(options).run().expect("generate run");

    let db_path = work_dir.join("db").join("shop.db");
    let pool = connect_sqlite(&db_path).await.expect("create database");
    let report = SqliteLoader::new(pool.clone())
        .load_dir(&Catalog::ecommerce(), &run.run_dir)
        .await
        .expect("load run directory");
    assert_eq!(report.total_rows(), 5 + 4 + 6 + 9 + 3);
    pool.close().await;

    let sql_path = work_dir.join("count.sql");
    fs::write(&sql_path, "SELECT COUNT(*) AS orders FROM orders").expect("write sql");
    let output = run_query_file(&db_path, &sql_path)
        .await
        .expect("run query file");
    assert_eq!(output.columns, vec!["orders".to_string()]);
    assert_eq!(output.rows, vec![vec![Some("6".to_string())]]);
}

#[tokio::test]
async fn missing_inputs_are_reported() {
    let work_dir = temp_dir("missing");
    let sql_path = work_dir.join("query.sql");
    fs::write(&sql_path, "SELECT 1").expect("write sql");

    let err = run_query_file(&work_dir.join("absent.db"), &sql_path)
        .await
        .expect_err("no database");
    assert!(matches!(err, LoadError::MissingInput(_)), "{err}");

    let err = run_query_file(&work_dir.join("absent.db"), &work_dir.join("absent.sql"))
        .await
        .expect_err("no sql file");
    assert!(err.to_string().contains("SQL file not found"), "{err}");

    let loader = SqliteLoader::new(memory_pool().await);
    let err = loader
        .load_dir(&Catalog::ecommerce(), &work_dir)
        .await
        .expect_err("no csv files");
    assert!(matches!(err, LoadError::MissingInput(_)), "{err}");
}

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("shopforge_load_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
