use axum::{extract::State, response::Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::app::state::AppState;
use crate::models::order::CallbackAck;

/// Gateway-facing endpoint. Always answers 200 with a structured ack so the
/// gateway does not retry delivery forever.
pub async fn payment_callback(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<CallbackAck> {
    info!("Payment callback received");
    Json(state.callbacks.handle_callback(payload).await)
}
