use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::product::Product;

pub const STATUS_PENDING: &str = "pending";

/// A line item snapshots the catalog at order time. Title, price and
/// currency are copies, not references, so order history survives catalog
/// edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub currency: String,
}

impl OrderItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_title: product.title.clone(),
            unit_price: product.price,
            quantity,
            currency: product.currency.clone(),
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_mobile: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a pending single-item order for the given product.
    pub fn pending(
        product: &Product,
        customer_name: String,
        customer_email: Option<String>,
        customer_mobile: Option<String>,
    ) -> Self {
        let item = OrderItem::from_product(product, 1);
        let total_amount = item.line_total();
        Self {
            customer_name,
            customer_email,
            customer_mobile,
            total_amount,
            currency: item.currency.clone(),
            items: vec![item],
            status: STATUS_PENDING.to_string(),
            invoice_id: None,
            invoice_url: None,
            payment_id: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_mobile: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub payment_url: Option<String>,
    pub message: String,
}

/// Acknowledgement returned to the gateway for every callback delivery.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackAck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallbackAck {
    pub fn ok() -> Self {
        Self { ok: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { ok: false, error: Some(error.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pending_order_snapshots_product_and_totals() {
        let product = Product::catalog();
        let order = Order::pending(&product, "Dana".to_string(), None, None);

        assert_eq!(order.status, STATUS_PENDING);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_title, product.title);
        assert_eq!(order.items[0].quantity, 1);
        assert_eq!(order.total_amount, product.price);
        assert_eq!(order.currency, product.currency);
        assert!(order.invoice_id.is_none());
        assert!(order.invoice_url.is_none());
        assert!(order.payment_id.is_none());
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        let item = OrderItem {
            product_title: "Beans".to_string(),
            unit_price: dec!(12.500),
            quantity: 3,
            currency: "KWD".to_string(),
        };
        assert_eq!(item.line_total(), dec!(37.500));
    }
}
