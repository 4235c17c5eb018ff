use rand::Rng;
use rand::seq::IndexedRandom;

use shopforge_core::validation::PRICE_RANGE;
use shopforge_core::{Category, Money, Product};

use crate::generators::{faker, row_key};

pub fn generate_products<R: Rng + ?Sized>(count: u64, rng: &mut R) -> Vec<Product> {
    let (min, max) = PRICE_RANGE;
    let mut products = Vec::with_capacity(count as usize);

    for index in 0..count {
        let product_name = faker::catch_phrase(rng);
        let category = *Category::ALL.choose(rng).unwrap_or(&Category::Electronics);
        let price = Money::from_f64_rounded(rng.random_range(min.as_f64()..=max.as_f64()));

        products.push(Product {
            product_id: row_key(index),
            product_name,
            category,
            price,
        });
    }

    products
}
