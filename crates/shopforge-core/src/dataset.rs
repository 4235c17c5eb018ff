use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entities::{Customer, EntityKind, Order, OrderItem, Payment, Product};

/// A complete generated dataset, one ordered row sequence per entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
}

impl Dataset {
    pub fn row_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Customers => self.customers.len(),
            EntityKind::Products => self.products.len(),
            EntityKind::Orders => self.orders.len(),
            EntityKind::OrderItems => self.order_items.len(),
            EntityKind::Payments => self.payments.len(),
        }
    }

    pub fn row_counts(&self) -> BTreeMap<EntityKind, usize> {
        EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, self.row_count(kind)))
            .collect()
    }

    /// Order ids that no order item references, ascending.
    pub fn orders_without_items(&self) -> Vec<i64> {
        let covered: BTreeSet<i64> = self.order_items.iter().map(|item| item.order_id).collect();
        self.orders
            .iter()
            .map(|order| order.order_id)
            .filter(|order_id| !covered.contains(order_id))
            .collect()
    }
}
