use mongodb::bson::{doc, to_document};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::order::{CheckoutRequest, CheckoutResponse, Order};
use crate::models::product::Product;
use crate::services::gateway_client::{InvoiceGateway, InvoiceRequest, InvoiceResult};
use crate::store::{DocumentStore, StoreError, ORDERS};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("product out of stock")]
    OutOfStock,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ties model, store and gateway together for the checkout flow. The initial
/// order write is the one hard dependency; everything after it degrades to a
/// message in the response.
pub struct CheckoutService {
    product: Product,
    store: Arc<dyn DocumentStore>,
    gateway: Arc<dyn InvoiceGateway>,
}

impl CheckoutService {
    pub fn new(
        product: Product,
        store: Arc<dyn DocumentStore>,
        gateway: Arc<dyn InvoiceGateway>,
    ) -> Self {
        Self {
            product,
            store,
            gateway,
        }
    }

    pub async fn checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse, CheckoutError> {
        if !self.product.in_stock {
            return Err(CheckoutError::OutOfStock);
        }

        let order = Order::pending(
            &self.product,
            request.customer_name,
            request.customer_email,
            request.customer_mobile,
        );
        let document =
            to_document(&order).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let order_id = self.store.create(ORDERS, document).await?;
        info!("Order {} persisted, requesting invoice", order_id);

        let invoice_request = InvoiceRequest {
            order_id: order_id.clone(),
            total: order.total_amount,
            currency: order.currency.clone(),
            product_title: self.product.title.clone(),
            product_price: self.product.price,
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            customer_mobile: order.customer_mobile.clone(),
        };

        let (payment_url, message) = match self.gateway.create_invoice(&invoice_request).await {
            InvoiceResult::Succeeded {
                invoice_id,
                invoice_url,
            } => {
                // Advisory write: the response carries the in-memory invoice
                // URL either way, the stored copy is best-effort.
                let patch = doc! { "invoice_id": invoice_id.as_str(), "invoice_url": invoice_url.as_str() };
                if let Err(e) = self
                    .store
                    .update_one(ORDERS, doc! { "_id": order_id.as_str() }, patch)
                    .await
                {
                    warn!("Failed to save invoice details for order {}: {}", order_id, e);
                }
                (Some(invoice_url), "Proceed to payment".to_string())
            }
            InvoiceResult::NotConfigured { reason } => {
                warn!("Invoice for order {} skipped: {}", order_id, reason);
                (
                    None,
                    "Payment gateway not configured. Contact support.".to_string(),
                )
            }
            InvoiceResult::Failed { reason, .. } => {
                error!("Invoice creation for order {} failed: {}", order_id, reason);
                (None, format!("Payment creation failed: {}", reason))
            }
        };

        Ok(CheckoutResponse {
            order_id,
            payment_url,
            message,
        })
    }
}
