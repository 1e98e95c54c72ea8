use mongodb::bson::{doc, to_bson, DateTime, Document};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::models::order::CallbackAck;
use crate::store::{DocumentStore, StoreError, ORDERS, ORDER_CALLBACKS};

/// Applies gateway-pushed status updates to the matching order and keeps a
/// verbatim audit trail. Always acknowledges; the gateway never sees a fault.
pub struct CallbackService {
    store: Arc<dyn DocumentStore>,
}

impl CallbackService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle_callback(&self, payload: Value) -> CallbackAck {
        match self.process(payload).await {
            Ok(()) => CallbackAck::ok(),
            Err(e) => {
                error!("Callback processing failed: {}", e);
                CallbackAck::failed(e.to_string())
            }
        }
    }

    async fn process(&self, payload: Value) -> Result<(), StoreError> {
        let invoice_id = payload.get("InvoiceId").and_then(scalar_to_string);
        let payment_id = payload.get("PaymentId").filter(|v| !v.is_null());
        let status = payload
            .get("TransactionStatus")
            .and_then(scalar_to_string)
            .or_else(|| payload.get("InvoiceStatus").and_then(scalar_to_string))
            .map(|s| s.to_lowercase());

        let mut patch = Document::new();
        if let Some(payment_id) = payment_id {
            let value = to_bson(payment_id)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            patch.insert("payment_id", value);
        }
        if let Some(invoice_id) = &invoice_id {
            patch.insert("invoice_id", invoice_id.as_str());
        }
        if let Some(status) = &status {
            patch.insert("status", status.as_str());
        }

        // Orders are only ever matched by invoice id; a callback never
        // creates one.
        if !patch.is_empty() {
            if let Some(invoice_id) = &invoice_id {
                let matched = self
                    .store
                    .update_one(ORDERS, doc! { "invoice_id": invoice_id.as_str() }, patch)
                    .await?;
                if matched == 0 {
                    info!("Callback for invoice {} matched no order", invoice_id);
                }
            }
        }

        // The raw payload is kept even when nothing was extracted or matched.
        let payload_bson =
            to_bson(&payload).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store
            .create(
                ORDER_CALLBACKS,
                doc! { "payload": payload_bson, "received_at": DateTime::now() },
            )
            .await?;
        Ok(())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
