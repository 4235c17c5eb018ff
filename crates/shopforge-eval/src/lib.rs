//! Dataset evaluation for generated shopforge runs.
//!
//! Reloads a run directory, re-checks every dataset invariant and writes a
//! machine-readable `metrics.json` next to a markdown `report.md`.

pub mod engine;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod report;

pub use engine::EvaluationEngine;
pub use errors::EvalError;
pub use metrics::{CheckStats, METRICS_VERSION, MetricsReport, TableMetrics};
pub use model::{EvaluateOptions, EvaluationResult};
pub use report::render_report;
