use rand::Rng;
use rand::seq::IndexedRandom;

use shopforge_core::validation::{ITEM_PRICE_FACTOR, QUANTITY_RANGE};
use shopforge_core::{OrderItem, Product};

use crate::errors::GenerationError;

/// Which order the next item is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPhase {
    /// One item per order, in id order; `next` indexes the order list.
    AssigningCoverage { next: usize },
    /// Remaining items go to uniformly drawn orders.
    FillingRemainder,
}

/// Iterator over order items with a coverage phase followed by a fill phase.
///
/// Coverage ends once every order has an item or the item budget runs out,
/// whichever comes first. The stream terminates when item ids reach `total`.
pub struct OrderItemStream<'a, R: Rng + ?Sized> {
    order_ids: &'a [i64],
    products: &'a [Product],
    total: u64,
    emitted: u64,
    phase: ItemPhase,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> OrderItemStream<'a, R> {
    pub fn new(
        total: u64,
        order_ids: &'a [i64],
        products: &'a [Product],
        rng: &'a mut R,
    ) -> Result<Self, GenerationError> {
        if total > 0 && order_ids.is_empty() {
            return Err(GenerationError::MissingInput(
                "orders (required by order_items)".to_string(),
            ));
        }
        if total > 0 && products.is_empty() {
            return Err(GenerationError::MissingInput(
                "products (required by order_items)".to_string(),
            ));
        }

        Ok(Self {
            order_ids,
            products,
            total,
            emitted: 0,
            phase: ItemPhase::AssigningCoverage { next: 0 },
            rng,
        })
    }

    pub fn phase(&self) -> ItemPhase {
        self.phase
    }

    fn next_order_id(&mut self) -> Option<i64> {
        match self.phase {
            ItemPhase::AssigningCoverage { next } => {
                let order_id = *self.order_ids.get(next)?;
                self.phase = if next + 1 < self.order_ids.len() {
                    ItemPhase::AssigningCoverage { next: next + 1 }
                } else {
                    ItemPhase::FillingRemainder
                };
                Some(order_id)
            }
            ItemPhase::FillingRemainder => self.order_ids.choose(self.rng).copied(),
        }
    }
}

impl<R: Rng + ?Sized> Iterator for OrderItemStream<'_, R> {
    type Item = OrderItem;

    fn next(&mut self) -> Option<OrderItem> {
        if self.emitted >= self.total {
            return None;
        }

        let order_id = self.next_order_id()?;
        let product = self.products.choose(self.rng)?;
        let (min_qty, max_qty) = QUANTITY_RANGE;
        let quantity = self.rng.random_range(min_qty..=max_qty);
        let (low, high) = ITEM_PRICE_FACTOR;
        let factor = self.rng.random_range(low..=high);

        self.emitted += 1;
        Some(OrderItem {
            item_id: self.emitted as i64,
            order_id,
            product_id: product.product_id,
            quantity,
            item_price: product.price.scale(factor),
        })
    }
}

/// Generate `count` items, covering orders in id order before filling.
pub fn generate_order_items<R: Rng + ?Sized>(
    count: u64,
    order_ids: &[i64],
    products: &[Product],
    rng: &mut R,
) -> Result<Vec<OrderItem>, GenerationError> {
    let items: Vec<OrderItem> = OrderItemStream::new(count, order_ids, products, rng)?.collect();
    if items.len() as u64 != count {
        return Err(GenerationError::Core(
            shopforge_core::Error::ConstraintViolation(format!(
                "expected {count} order items, produced {}",
                items.len()
            )),
        ));
    }
    Ok(items)
}
