//! Row generators, one module per entity.
//!
//! Every generator takes the shared random stream by `&mut` and draws from
//! it in a fixed order, so a seeded stream reproduces the dataset.

use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;

pub mod customers;
pub mod faker;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod products;
pub mod unique;

pub use customers::generate_customers;
pub use order_items::{ItemPhase, OrderItemStream, generate_order_items};
pub use orders::generate_orders;
pub use payments::generate_payments;
pub use products::generate_products;
pub use unique::UniqueValues;

/// Uniform whole-second timestamp in `[now - window, now]`.
pub fn timestamp_within<R: Rng + ?Sized>(
    now: NaiveDateTime,
    window: TimeDelta,
    rng: &mut R,
) -> NaiveDateTime {
    let span = window.num_seconds().max(0);
    let offset = rng.random_range(0..=span);
    now - TimeDelta::seconds(offset)
}

/// Dense 1-based key for the zero-based row `index`.
pub(crate) fn row_key(index: u64) -> i64 {
    index as i64 + 1
}
