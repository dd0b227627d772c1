//! Customer order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hadi_books_core::{
    OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentRecordStatus, PaymentStatus, Price,
};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user: Option<OrderCustomer>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_price: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment: Option<PaymentInfo>,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub shipping_method: Option<String>,
    /// Free-form date the admin entered, echoed back by the backend.
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Customer's full name, `name lastName`.
    #[must_use]
    pub fn customer_name(&self) -> String {
        self.user.as_ref().map_or_else(String::new, |user| {
            format!("{} {}", user.name, user.last_name).trim().to_string()
        })
    }

    /// Case-insensitive match on order id, customer name, email, or mobile
    /// number. An empty needle matches everything.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let customer = self.user.as_ref();
        let full_name = customer
            .map(|user| format!("{} {}", user.name, user.last_name))
            .unwrap_or_default();
        let email = customer.map(|user| user.email.as_str()).unwrap_or_default();
        let mobile = customer
            .map(|user| user.mobile_number.as_str())
            .unwrap_or_default();

        [self.id.as_str(), full_name.as_str(), email, mobile]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Whether a payment proof has been uploaded and awaits review.
    #[must_use]
    pub fn has_payment_proof(&self) -> bool {
        self.payment
            .as_ref()
            .and_then(|payment| payment.payment_proof.as_deref())
            .is_some_and(|proof| !proof.is_empty())
    }
}

/// The customer who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile_number: String,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub quantity: u32,
    pub price: Price,
    #[serde(default)]
    pub product: Option<OrderItemProduct>,
}

impl OrderItem {
    /// Product name, or `Unknown Product` when the book was deleted.
    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .map(|product| product.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown Product")
    }
}

/// Snapshot of the product an order line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub original_price: Option<Price>,
}

/// Payment attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub bank_account: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub status: PaymentRecordStatus,
    /// URL of the uploaded payment screenshot.
    #[serde(default)]
    pub payment_proof: Option<String>,
}
