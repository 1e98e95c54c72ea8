use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::app::config::Config;

const SEND_PAYMENT_PATH: &str = "/v2/SendPayment";
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(20);

/// Everything the gateway needs to issue a hosted payment link for one order.
#[derive(Debug, Clone)]
pub struct InvoiceRequest {
    pub order_id: String,
    pub total: Decimal,
    pub currency: String,
    pub product_title: String,
    pub product_price: Decimal,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_mobile: Option<String>,
}

/// Outcome of an invoice-creation attempt. Every failure mode comes back as
/// data; callers match exhaustively instead of catching.
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceResult {
    NotConfigured { reason: String },
    Succeeded { invoice_id: String, invoice_url: String },
    Failed { reason: String, details: Option<Value> },
}

#[async_trait]
pub trait InvoiceGateway: Send + Sync {
    async fn create_invoice(&self, request: &InvoiceRequest) -> InvoiceResult;
}

// MyFatoorah SendPayment wire format. Amounts go out as JSON numbers with
// three fraction digits; email and mobile must be present even when blank.
#[derive(Debug, Serialize)]
struct SendPaymentPayload<'a> {
    #[serde(rename = "CustomerName")]
    customer_name: &'a str,
    #[serde(rename = "NotificationOption")]
    notification_option: &'a str,
    #[serde(rename = "InvoiceValue", with = "rust_decimal::serde::float")]
    invoice_value: Decimal,
    #[serde(rename = "DisplayCurrencyIso")]
    display_currency_iso: &'a str,
    #[serde(rename = "CustomerEmail")]
    customer_email: &'a str,
    #[serde(rename = "CustomerMobile")]
    customer_mobile: &'a str,
    #[serde(rename = "CallBackUrl")]
    callback_url: &'a str,
    #[serde(rename = "ErrorUrl")]
    error_url: &'a str,
    #[serde(rename = "Language")]
    language: &'a str,
    #[serde(rename = "CustomerReference")]
    customer_reference: &'a str,
    #[serde(rename = "InvoiceItems")]
    invoice_items: Vec<InvoiceItemPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct InvoiceItemPayload<'a> {
    #[serde(rename = "ItemName")]
    item_name: &'a str,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "UnitPrice", with = "rust_decimal::serde::float")]
    unit_price: Decimal,
}

pub struct PaymentGatewayClient {
    client: Client,
    config: Config,
}

impl PaymentGatewayClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            config: config.clone(),
        }
    }

    fn build_payload<'a>(&'a self, request: &'a InvoiceRequest) -> SendPaymentPayload<'a> {
        SendPaymentPayload {
            customer_name: &request.customer_name,
            notification_option: "LNK",
            invoice_value: request.total.round_dp(3),
            display_currency_iso: &request.currency,
            customer_email: request.customer_email.as_deref().unwrap_or(""),
            customer_mobile: request.customer_mobile.as_deref().unwrap_or(""),
            callback_url: &self.config.callback_url,
            error_url: &self.config.error_url,
            language: "en",
            customer_reference: &request.order_id,
            invoice_items: vec![InvoiceItemPayload {
                item_name: &request.product_title,
                quantity: 1,
                unit_price: request.product_price.round_dp(3),
            }],
        }
    }
}

#[async_trait]
impl InvoiceGateway for PaymentGatewayClient {
    async fn create_invoice(&self, request: &InvoiceRequest) -> InvoiceResult {
        let Some(token) = &self.config.gateway_token else {
            return InvoiceResult::NotConfigured {
                reason: "MyFatoorah token not configured".to_string(),
            };
        };

        let payload = self.build_payload(request);
        let url = format!("{}{}", self.config.gateway_base_url, SEND_PAYMENT_PATH);

        let response = match self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("SendPayment request for order {} failed: {}", request.order_id, e);
                return InvoiceResult::Failed {
                    reason: e.to_string(),
                    details: None,
                };
            }
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!("Malformed gateway response for order {}: {}", request.order_id, e);
                return InvoiceResult::Failed {
                    reason: format!("invalid gateway response: {}", e),
                    details: None,
                };
            }
        };

        let result = map_send_payment_response(status, body);
        if let InvoiceResult::Succeeded { invoice_id, .. } = &result {
            info!("Invoice {} created for order {}", invoice_id, request.order_id);
        }
        result
    }
}

/// Maps a SendPayment HTTP response to an [`InvoiceResult`]. Anything short
/// of a 200 with `IsSuccess` and complete invoice data is a failure.
fn map_send_payment_response(status: StatusCode, body: Value) -> InvoiceResult {
    let accepted = status == StatusCode::OK
        && body.get("IsSuccess").and_then(Value::as_bool).unwrap_or(false);
    if !accepted {
        let reason = body
            .get("Message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or("MyFatoorah request failed")
            .to_string();
        return InvoiceResult::Failed {
            reason,
            details: Some(body),
        };
    }

    let data = body.get("Data");
    let invoice_id = data.and_then(|d| d.get("InvoiceId")).and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });
    let invoice_url = data
        .and_then(|d| d.get("InvoiceURL"))
        .and_then(Value::as_str)
        .map(str::to_string);

    match (invoice_id, invoice_url) {
        (Some(invoice_id), Some(invoice_url)) => InvoiceResult::Succeeded {
            invoice_id,
            invoice_url,
        },
        _ => InvoiceResult::Failed {
            reason: "gateway response missing invoice data".to_string(),
            details: Some(body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn test_config() -> Config {
        Config {
            server_port: 8000,
            gateway_token: Some("secret".to_string()),
            gateway_base_url: "https://apitest.myfatoorah.com".to_string(),
            callback_url: "http://localhost:8000/api/payment/callback".to_string(),
            error_url: "http://localhost:8000/api/payment/callback".to_string(),
            database_url: None,
            database_name: "coffee_shop".to_string(),
        }
    }

    fn test_request() -> InvoiceRequest {
        InvoiceRequest {
            order_id: "order-1".to_string(),
            total: dec!(299.0),
            currency: "KWD".to_string(),
            product_title: "Kalerm B6 Home Coffee Machine".to_string(),
            product_price: dec!(299.0),
            customer_name: "Dana".to_string(),
            customer_email: None,
            customer_mobile: None,
        }
    }

    #[test]
    fn payload_carries_reference_and_single_item() {
        let client = PaymentGatewayClient::new(&test_config());
        let request = test_request();
        let payload = serde_json::to_value(client.build_payload(&request)).unwrap();

        assert_eq!(payload["CustomerReference"], json!("order-1"));
        assert_eq!(payload["InvoiceValue"], json!(299.0));
        assert_eq!(payload["DisplayCurrencyIso"], json!("KWD"));
        assert_eq!(payload["NotificationOption"], json!("LNK"));
        let items = payload["InvoiceItems"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["ItemName"], json!("Kalerm B6 Home Coffee Machine"));
        assert_eq!(items[0]["Quantity"], json!(1));
        assert_eq!(items[0]["UnitPrice"], json!(299.0));
    }

    #[test]
    fn payload_blanks_absent_contact_fields() {
        let client = PaymentGatewayClient::new(&test_config());
        let payload = serde_json::to_value(client.build_payload(&test_request())).unwrap();
        assert_eq!(payload["CustomerEmail"], json!(""));
        assert_eq!(payload["CustomerMobile"], json!(""));
    }

    #[test]
    fn payload_rounds_amounts_to_three_decimals() {
        let client = PaymentGatewayClient::new(&test_config());
        let mut request = test_request();
        request.total = dec!(10.12349);
        request.product_price = dec!(10.12349);
        let payload = serde_json::to_value(client.build_payload(&request)).unwrap();
        assert_eq!(payload["InvoiceValue"], json!(10.123));
        assert_eq!(payload["InvoiceItems"][0]["UnitPrice"], json!(10.123));
    }

    #[test]
    fn payload_uses_configured_callback_and_error_urls() {
        let mut config = test_config();
        config.error_url = "http://localhost:8000/payment-error".to_string();
        let client = PaymentGatewayClient::new(&config);
        let payload = serde_json::to_value(client.build_payload(&test_request())).unwrap();
        assert_eq!(payload["CallBackUrl"], json!("http://localhost:8000/api/payment/callback"));
        assert_eq!(payload["ErrorUrl"], json!("http://localhost:8000/payment-error"));
    }

    #[tokio::test]
    async fn missing_token_short_circuits_without_a_network_call() {
        let mut config = test_config();
        config.gateway_token = None;
        let client = PaymentGatewayClient::new(&config);

        match client.create_invoice(&test_request()).await {
            InvoiceResult::NotConfigured { reason } => assert!(reason.contains("token")),
            other => panic!("expected NotConfigured, got {:?}", other),
        }
    }

    #[test]
    fn success_response_maps_to_succeeded() {
        let body = json!({
            "IsSuccess": true,
            "Data": { "InvoiceId": 4253, "InvoiceURL": "https://portal.example/pay/4253" }
        });
        assert_eq!(
            map_send_payment_response(StatusCode::OK, body),
            InvoiceResult::Succeeded {
                invoice_id: "4253".to_string(),
                invoice_url: "https://portal.example/pay/4253".to_string(),
            }
        );
    }

    #[test]
    fn rejected_response_maps_to_failed_with_gateway_message() {
        let body = json!({ "IsSuccess": false, "Message": "Invalid currency" });
        match map_send_payment_response(StatusCode::OK, body) {
            InvoiceResult::Failed { reason, details } => {
                assert_eq!(reason, "Invalid currency");
                assert!(details.is_some());
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn non_ok_status_maps_to_failed() {
        let body = json!({ "IsSuccess": true });
        match map_send_payment_response(StatusCode::UNAUTHORIZED, body) {
            InvoiceResult::Failed { reason, .. } => {
                assert_eq!(reason, "MyFatoorah request failed");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn success_flag_without_invoice_data_maps_to_failed() {
        let body = json!({ "IsSuccess": true, "Data": {} });
        match map_send_payment_response(StatusCode::OK, body) {
            InvoiceResult::Failed { reason, .. } => {
                assert!(reason.contains("missing invoice data"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}
