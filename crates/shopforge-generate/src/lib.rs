//! Synthetic e-commerce dataset generator for shopforge.
//!
//! Plans row counts, generates the five entity tables parent-first from a
//! single seeded random stream, derives order totals from the generated line
//! items and writes the dataset as CSV.

pub mod aggregate;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;
pub mod planner;

pub use aggregate::aggregate_order_totals;
pub use engine::{GenerationEngine, GenerationResult, generate_dataset};
pub use errors::GenerationError;
pub use model::{CountRange, EntityCounts, GenerateOptions, GenerationReport, TableReport};
