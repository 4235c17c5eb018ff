use std::collections::BTreeMap;

use shopforge_core::{Money, Order, OrderItem};

use crate::errors::GenerationError;

/// Derive every order's `total_amount` from its line items.
///
/// Returns a new order collection; keys and foreign keys are copied
/// unchanged. Orders without items total `0.00`. An item pointing at an
/// unknown order is a constraint violation.
pub fn aggregate_order_totals(
    orders: &[Order],
    items: &[OrderItem],
) -> Result<Vec<Order>, GenerationError> {
    let mut totals: BTreeMap<i64, Money> = orders
        .iter()
        .map(|order| (order.order_id, Money::ZERO))
        .collect();

    for item in items {
        let total = totals.get_mut(&item.order_id).ok_or_else(|| {
            shopforge_core::Error::ConstraintViolation(format!(
                "order item {} references unknown order {}",
                item.item_id, item.order_id
            ))
        })?;
        *total += item.line_total();
    }

    Ok(orders
        .iter()
        .map(|order| Order {
            total_amount: totals[&order.order_id],
            ..order.clone()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn order(order_id: i64) -> Order {
        Order {
            order_id,
            customer_id: 3,
            order_date: NaiveDate::from_ymd_opt(2024, 1, 2)
                .and_then(|date| date.and_hms_opt(3, 4, 5))
                .expect("valid timestamp"),
            total_amount: Money::ZERO,
        }
    }

    fn item(item_id: i64, order_id: i64, quantity: i64, cents: i64) -> OrderItem {
        OrderItem {
            item_id,
            order_id,
            product_id: 1,
            quantity,
            item_price: Money::from_cents(cents),
        }
    }

    #[test]
    fn totals_sum_line_items() {
        let orders = vec![order(1), order(2), order(3)];
        let items = vec![
            item(1, 1, 2, 1050),
            item(2, 2, 1, 999),
            item(3, 1, 3, 333),
        ];

        let aggregated = aggregate_order_totals(&orders, &items).expect("aggregate");
        assert_eq!(aggregated[0].total_amount, Money::from_cents(3099));
        assert_eq!(aggregated[1].total_amount, Money::from_cents(999));
        assert_eq!(aggregated[2].total_amount, Money::ZERO);
        // Inputs are left untouched.
        assert!(orders.iter().all(|order| order.total_amount == Money::ZERO));
        for (before, after) in orders.iter().zip(&aggregated) {
            assert_eq!(before.order_id, after.order_id);
            assert_eq!(before.customer_id, after.customer_id);
            assert_eq!(before.order_date, after.order_date);
        }
    }

    #[test]
    fn unknown_order_is_a_violation() {
        let err = aggregate_order_totals(&[order(1)], &[item(1, 5, 1, 100)])
            .expect_err("dangling item");
        assert!(err.to_string().contains("unknown order 5"));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let orders = vec![order(1), order(2)];
        let items = vec![item(1, 1, 1, 10), item(2, 2, 5, 20), item(3, 2, 1, 1)];
        let first = aggregate_order_totals(&orders, &items).expect("first");
        let second = aggregate_order_totals(&orders, &items).expect("second");
        assert_eq!(first, second);
    }
}
