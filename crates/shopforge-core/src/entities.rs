use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// The five persisted entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customers,
    Products,
    Orders,
    OrderItems,
    Payments,
}

impl EntityKind {
    /// Parent tables before children.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Customers,
        EntityKind::Products,
        EntityKind::Orders,
        EntityKind::OrderItems,
        EntityKind::Payments,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Customers => "customers",
            EntityKind::Products => "products",
            EntityKind::Orders => "orders",
            EntityKind::OrderItems => "order_items",
            EntityKind::Payments => "payments",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.table_name())
    }

    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.table_name() == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub category: Category,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    #[serde(with = "crate::timestamp")]
    pub order_date: NaiveDateTime,
    /// Sum of the order's line totals; zero until aggregation runs.
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub item_price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.item_price * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub order_id: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(with = "crate::timestamp")]
    pub payment_date: NaiveDateTime,
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Home,
    Fashion,
    Beauty,
    Outdoors,
    Toys,
    Books,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Home,
        Category::Fashion,
        Category::Beauty,
        Category::Outdoors,
        Category::Toys,
        Category::Books,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Home => "Home",
            Category::Fashion => "Fashion",
            Category::Beauty => "Beauty",
            Category::Outdoors => "Outdoors",
            Category::Toys => "Toys",
            Category::Books => "Books",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Apple Pay")]
    ApplePay,
    #[serde(rename = "Google Pay")]
    GooglePay,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::CreditCard,
        PaymentMethod::PayPal,
        PaymentMethod::ApplePay,
        PaymentMethod::GooglePay,
        PaymentMethod::BankTransfer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::ApplePay => "Apple Pay",
            PaymentMethod::GooglePay => "Google Pay",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Completed,
        PaymentStatus::Pending,
        PaymentStatus::Failed,
    ];

    /// Sampling weight of each status, parallel to [`PaymentStatus::ALL`].
    pub const WEIGHTS: [f64; 3] = [0.7, 0.2, 0.1];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Failed => "Failed",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Category, PaymentMethod, PaymentStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_labels_match_serde_names() {
        for method in PaymentMethod::ALL {
            let json = serde_json::to_string(&method).expect("serialize");
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
        for category in Category::ALL {
            let json = serde_json::to_string(&category).expect("serialize");
            assert_eq!(json, format!("\"{category}\""));
        }
    }

    #[test]
    fn entity_kinds_map_to_file_names() {
        assert_eq!(EntityKind::OrderItems.file_name(), "order_items.csv");
        assert_eq!(
            EntityKind::from_table_name("payments"),
            Some(EntityKind::Payments)
        );
        assert_eq!(EntityKind::from_table_name("refunds"), None);
    }

    #[test]
    fn line_total_multiplies_quantity() {
        let item = OrderItem {
            item_id: 1,
            order_id: 1,
            product_id: 1,
            quantity: 3,
            item_price: Money::from_cents(1999),
        };
        assert_eq!(item.line_total(), Money::from_cents(5997));
    }
}
