use rand::Rng;

use crate::model::{CountRange, EntityCounts};

impl CountRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.random_range(self.min..=self.max)
    }
}

/// Sample a row count for every entity.
///
/// Counts are drawn in load order. The item count is floored at the order
/// count so the coverage phase can reach every order.
pub fn plan_counts<R: Rng + ?Sized>(range: &CountRange, rng: &mut R) -> EntityCounts {
    let customers = range.sample(rng);
    let products = range.sample(rng);
    let orders = range.sample(rng);
    let order_items = orders.max(range.sample(rng));
    let payments = range.sample(rng);

    EntityCounts {
        customers,
        products,
        orders,
        order_items,
        payments,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn counts_stay_in_range_and_cover_orders() {
        let range = CountRange { min: 100, max: 200 };
        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let counts = plan_counts(&range, &mut rng);
            for value in [
                counts.customers,
                counts.products,
                counts.orders,
                counts.order_items,
                counts.payments,
            ] {
                assert!((100..=200).contains(&value), "seed {seed}: {value}");
            }
            assert!(counts.covers_orders(), "seed {seed}: {counts:?}");
        }
    }

    #[test]
    fn degenerate_range_is_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let counts = plan_counts(&CountRange { min: 3, max: 3 }, &mut rng);
        assert_eq!(
            counts,
            EntityCounts {
                customers: 3,
                products: 3,
                orders: 3,
                order_items: 3,
                payments: 3,
            }
        );
    }

    #[test]
    fn same_seed_same_plan() {
        let range = CountRange::default();
        let a = plan_counts(&range, &mut ChaCha8Rng::seed_from_u64(2024));
        let b = plan_counts(&range, &mut ChaCha8Rng::seed_from_u64(2024));
        assert_eq!(a, b);
    }
}
