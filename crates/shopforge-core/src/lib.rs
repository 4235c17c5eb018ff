//! Core contracts and helpers for shopforge.
//!
//! This crate defines the e-commerce entity rows, the table catalog they are
//! persisted with, and the invariant checks shared by the generator, the
//! evaluator and the loader.

pub mod constraints;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod graph;
pub mod money;
pub mod schema;
pub mod timestamp;
pub mod types;
pub mod validation;

pub use constraints::{Constraint, ForeignKey, PrimaryKey, UniqueConstraint};
pub use dataset::Dataset;
pub use entities::{
    Category, Customer, EntityKind, Order, OrderItem, Payment, PaymentMethod, PaymentStatus,
    Product,
};
pub use error::{Error, Result};
pub use graph::{FkGraphReport, FkGraphSummary, build_fk_graph_report};
pub use money::Money;
pub use schema::{Catalog, Column, Table};
pub use types::ColumnType;
pub use validation::{CheckKind, Violation, ensure_valid, validate_dataset};

/// Current contract version for generated datasets and reports.
pub const DATASET_VERSION: &str = "0.1";
