use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::entities::{EntityKind, Order};
use crate::error::{Error, Result};
use crate::money::Money;

pub const QUANTITY_RANGE: (i64, i64) = (1, 5);
pub const PRICE_RANGE: (Money, Money) = (Money::from_cents(500), Money::from_cents(50_000));
pub const ITEM_PRICE_FACTOR: (f64, f64) = (0.9, 1.1);

/// Dataset invariant a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Coverage,
    OrderTotal,
    PaymentDate,
    ItemPrice,
    Domain,
}

impl CheckKind {
    pub const ALL: [CheckKind; 8] = [
        CheckKind::PrimaryKey,
        CheckKind::ForeignKey,
        CheckKind::Unique,
        CheckKind::Coverage,
        CheckKind::OrderTotal,
        CheckKind::PaymentDate,
        CheckKind::ItemPrice,
        CheckKind::Domain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::PrimaryKey => "primary_key",
            CheckKind::ForeignKey => "foreign_key",
            CheckKind::Unique => "unique",
            CheckKind::Coverage => "coverage",
            CheckKind::OrderTotal => "order_total",
            CheckKind::PaymentDate => "payment_date",
            CheckKind::ItemPrice => "item_price",
            CheckKind::Domain => "domain",
        }
    }
}

/// Structured invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub check: CheckKind,
    pub table: EntityKind,
    /// Primary key of the offending row, when the violation is row-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
    pub message: String,
}

/// Check every dataset invariant and return all violations found.
///
/// Coverage is only required when there are at least as many items as
/// orders; with a smaller item budget uncovered orders are expected.
pub fn validate_dataset(dataset: &Dataset) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_dense_keys(
        EntityKind::Customers,
        dataset.customers.iter().map(|row| row.customer_id),
        &mut violations,
    );
    check_dense_keys(
        EntityKind::Products,
        dataset.products.iter().map(|row| row.product_id),
        &mut violations,
    );
    check_dense_keys(
        EntityKind::Orders,
        dataset.orders.iter().map(|row| row.order_id),
        &mut violations,
    );
    check_dense_keys(
        EntityKind::OrderItems,
        dataset.order_items.iter().map(|row| row.item_id),
        &mut violations,
    );
    check_dense_keys(
        EntityKind::Payments,
        dataset.payments.iter().map(|row| row.payment_id),
        &mut violations,
    );

    check_unique_emails(dataset, &mut violations);
    check_products(dataset, &mut violations);
    check_orders(dataset, &mut violations);
    check_items(dataset, &mut violations);
    check_payments(dataset, &mut violations);

    violations
}

/// Fail with [`Error::ConstraintViolation`] when any invariant is broken.
pub fn ensure_valid(dataset: &Dataset) -> Result<()> {
    let violations = validate_dataset(dataset);
    match violations.first() {
        None => Ok(()),
        Some(first) => Err(Error::ConstraintViolation(format!(
            "{} violation(s), first: {}.{}: {}",
            violations.len(),
            first.table,
            first.check.as_str(),
            first.message
        ))),
    }
}

fn check_dense_keys(
    table: EntityKind,
    keys: impl Iterator<Item = i64>,
    violations: &mut Vec<Violation>,
) {
    for (idx, key) in keys.enumerate() {
        let expected = idx as i64 + 1;
        if key != expected {
            violations.push(Violation {
                check: CheckKind::PrimaryKey,
                table,
                row_id: Some(key),
                message: format!("expected key {expected} at row {idx}, found {key}"),
            });
        }
    }
}

fn check_unique_emails(dataset: &Dataset, violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for customer in &dataset.customers {
        if !seen.insert(customer.email.as_str()) {
            violations.push(Violation {
                check: CheckKind::Unique,
                table: EntityKind::Customers,
                row_id: Some(customer.customer_id),
                message: format!("duplicate email '{}'", customer.email),
            });
        }
    }
}

fn check_products(dataset: &Dataset, violations: &mut Vec<Violation>) {
    let (min, max) = PRICE_RANGE;
    for product in &dataset.products {
        if product.price < min || product.price > max {
            violations.push(Violation {
                check: CheckKind::Domain,
                table: EntityKind::Products,
                row_id: Some(product.product_id),
                message: format!("price {} outside [{min}, {max}]", product.price),
            });
        }
    }
}

fn check_orders(dataset: &Dataset, violations: &mut Vec<Violation>) {
    let customer_ids: HashSet<i64> = dataset.customers.iter().map(|c| c.customer_id).collect();
    let mut totals: HashMap<i64, Money> = HashMap::new();
    for item in &dataset.order_items {
        *totals.entry(item.order_id).or_default() += item.line_total();
    }

    for order in &dataset.orders {
        if !customer_ids.contains(&order.customer_id) {
            violations.push(Violation {
                check: CheckKind::ForeignKey,
                table: EntityKind::Orders,
                row_id: Some(order.order_id),
                message: format!("customer_id {} not found", order.customer_id),
            });
        }

        let expected = totals.get(&order.order_id).copied().unwrap_or(Money::ZERO);
        if order.total_amount != expected {
            violations.push(Violation {
                check: CheckKind::OrderTotal,
                table: EntityKind::Orders,
                row_id: Some(order.order_id),
                message: format!(
                    "total_amount {} differs from item sum {expected}",
                    order.total_amount
                ),
            });
        }
    }

    if dataset.order_items.len() >= dataset.orders.len() {
        for order_id in dataset.orders_without_items() {
            violations.push(Violation {
                check: CheckKind::Coverage,
                table: EntityKind::Orders,
                row_id: Some(order_id),
                message: "order has no items".to_string(),
            });
        }
    }
}

fn check_items(dataset: &Dataset, violations: &mut Vec<Violation>) {
    let order_ids: HashSet<i64> = dataset.orders.iter().map(|o| o.order_id).collect();
    let prices: HashMap<i64, Money> = dataset
        .products
        .iter()
        .map(|p| (p.product_id, p.price))
        .collect();
    let (min_qty, max_qty) = QUANTITY_RANGE;
    let (low, high) = ITEM_PRICE_FACTOR;

    for item in &dataset.order_items {
        let mut push = |check: CheckKind, message: String| {
            violations.push(Violation {
                check,
                table: EntityKind::OrderItems,
                row_id: Some(item.item_id),
                message,
            });
        };

        if !order_ids.contains(&item.order_id) {
            push(
                CheckKind::ForeignKey,
                format!("order_id {} not found", item.order_id),
            );
        }
        match prices.get(&item.product_id) {
            None => push(
                CheckKind::ForeignKey,
                format!("product_id {} not found", item.product_id),
            ),
            Some(price) => {
                let (floor, ceil) = (price.scale(low), price.scale(high));
                if item.item_price < floor || item.item_price > ceil {
                    push(
                        CheckKind::ItemPrice,
                        format!(
                            "item_price {} outside [{floor}, {ceil}] for product price {price}",
                            item.item_price
                        ),
                    );
                }
            }
        }
        if !(min_qty..=max_qty).contains(&item.quantity) {
            push(
                CheckKind::Domain,
                format!("quantity {} outside [{min_qty}, {max_qty}]", item.quantity),
            );
        }
    }
}

fn check_payments(dataset: &Dataset, violations: &mut Vec<Violation>) {
    let orders: BTreeMap<i64, &Order> = dataset.orders.iter().map(|o| (o.order_id, o)).collect();

    for payment in &dataset.payments {
        match orders.get(&payment.order_id) {
            None => violations.push(Violation {
                check: CheckKind::ForeignKey,
                table: EntityKind::Payments,
                row_id: Some(payment.payment_id),
                message: format!("order_id {} not found", payment.order_id),
            }),
            Some(order) if payment.payment_date < order.order_date => {
                violations.push(Violation {
                    check: CheckKind::PaymentDate,
                    table: EntityKind::Payments,
                    row_id: Some(payment.payment_id),
                    message: format!(
                        "payment_date {} precedes order_date {}",
                        crate::timestamp::format(&payment.payment_date),
                        crate::timestamp::format(&order.order_date)
                    ),
                });
            }
            Some(_) => {}
        }
    }
}
