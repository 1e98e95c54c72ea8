use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::state::AppState;

/// Operability check: reports which store backend is live and whether it
/// answers. Not part of the business contract.
pub async fn store_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let status = state.store.status().await;
    Json(json!({
        "backend": "running",
        "store_backend": status.backend,
        "connection_status": if status.connected { "connected" } else { "not connected" },
        "database_name": status.database,
        "collections": status.collections,
        "database_url_set": state.config.database_url.is_some(),
    }))
}
