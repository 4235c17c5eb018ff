use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;
use rand::seq::IndexedRandom;

use shopforge_core::{Money, Order};

use crate::errors::GenerationError;
use crate::generators::{row_key, timestamp_within};

/// Orders are placed within the year before "now".
pub const ORDER_WINDOW_DAYS: i64 = 365;

/// Generate orders for customers drawn uniformly with replacement.
///
/// Totals start at zero; see [`crate::aggregate::aggregate_order_totals`].
pub fn generate_orders<R: Rng + ?Sized>(
    count: u64,
    customer_ids: &[i64],
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<Vec<Order>, GenerationError> {
    if customer_ids.is_empty() {
        return Err(GenerationError::MissingInput(
            "customers (required by orders)".to_string(),
        ));
    }

    let window = TimeDelta::days(ORDER_WINDOW_DAYS);
    let mut orders = Vec::with_capacity(count as usize);

    for index in 0..count {
        let customer_id = *customer_ids
            .choose(rng)
            .ok_or_else(|| GenerationError::MissingInput("customers".to_string()))?;
        let order_date = timestamp_within(now, window, rng);

        orders.push(Order {
            order_id: row_key(index),
            customer_id,
            order_date,
            total_amount: Money::ZERO,
        });
    }

    Ok(orders)
}
