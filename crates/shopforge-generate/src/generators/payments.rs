use chrono::TimeDelta;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;

use shopforge_core::{Order, Payment, PaymentMethod, PaymentStatus};

use crate::errors::GenerationError;
use crate::generators::row_key;

/// Largest settlement delay after the order, as (days, hours).
pub const MAX_SETTLEMENT_DELAY: (i64, i64) = (5, 23);

/// Generate payments against orders drawn uniformly with replacement.
///
/// A payment settles 0..=5 days and 0..=23 hours after its order.
pub fn generate_payments<R: Rng + ?Sized>(
    count: u64,
    orders: &[Order],
    rng: &mut R,
) -> Result<Vec<Payment>, GenerationError> {
    if orders.is_empty() {
        return Err(GenerationError::MissingInput(
            "orders (required by payments)".to_string(),
        ));
    }

    let statuses = WeightedIndex::new(PaymentStatus::WEIGHTS)
        .map_err(|err| GenerationError::InvalidConfig(format!("payment status weights: {err}")))?;
    let (max_days, max_hours) = MAX_SETTLEMENT_DELAY;
    let mut payments = Vec::with_capacity(count as usize);

    for index in 0..count {
        let order = orders
            .choose(rng)
            .ok_or_else(|| GenerationError::MissingInput("orders".to_string()))?;
        let payment_method = *PaymentMethod::ALL
            .choose(rng)
            .unwrap_or(&PaymentMethod::CreditCard);
        let payment_status = PaymentStatus::ALL[statuses.sample(rng)];
        let delay = TimeDelta::days(rng.random_range(0..=max_days))
            + TimeDelta::hours(rng.random_range(0..=max_hours));

        payments.push(Payment {
            payment_id: row_key(index),
            order_id: order.order_id,
            payment_method,
            payment_status,
            payment_date: order.order_date + delay,
        });
    }

    Ok(payments)
}
