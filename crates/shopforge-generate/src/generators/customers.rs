use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;

use shopforge_core::Customer;

use crate::errors::GenerationError;
use crate::generators::unique::UniqueValues;
use crate::generators::{faker, row_key, timestamp_within};

/// Customers sign up within the two years before "now".
pub const SIGNUP_WINDOW_DAYS: i64 = 730;

pub fn generate_customers<R: Rng + ?Sized>(
    count: u64,
    now: NaiveDateTime,
    emails: &mut UniqueValues,
    rng: &mut R,
) -> Result<Vec<Customer>, GenerationError> {
    let window = TimeDelta::days(SIGNUP_WINDOW_DAYS);
    let mut customers = Vec::with_capacity(count as usize);

    for index in 0..count {
        let created_at = timestamp_within(now, window, rng);
        let name = faker::person_name(rng);
        let email = emails.next_with(|| faker::safe_email(rng))?;
        let phone = faker::phone_number(rng);
        let city = faker::city(rng);

        customers.push(Customer {
            customer_id: row_key(index),
            name,
            email,
            phone,
            city,
            created_at,
        });
    }

    Ok(customers)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn customers_have_dense_ids_and_unique_emails() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut emails = UniqueValues::new("email", 1000);
        let customers = generate_customers(150, now(), &mut emails, &mut rng).expect("customers");

        assert_eq!(customers.len(), 150);
        for (idx, customer) in customers.iter().enumerate() {
            assert_eq!(customer.customer_id, idx as i64 + 1);
            assert!(customer.email.contains('@'));
            assert!(!customer.name.is_empty());
            assert!(customer.created_at <= now());
            assert!(customer.created_at >= now() - TimeDelta::days(SIGNUP_WINDOW_DAYS));
        }
        let distinct: HashSet<&str> = customers.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(distinct.len(), customers.len());
    }

    #[test]
    fn exhausted_email_source_aborts() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut emails = UniqueValues::new("email", 1);
        // One attempt per value cannot survive a run this long.
        let result = generate_customers(5_000, now(), &mut emails, &mut rng);
        assert!(matches!(result, Err(GenerationError::Exhausted { .. })));
    }
}
