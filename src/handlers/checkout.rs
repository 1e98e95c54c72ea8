use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};
use validator::validate_email;

use crate::app::state::AppState;
use crate::models::order::{CheckoutRequest, CheckoutResponse};
use crate::services::CheckoutError;

pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, (StatusCode, Json<Value>)> {
    if let Some(email) = request.customer_email.as_deref() {
        if !validate_email(email) {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": "customer_email is not a valid email address" })),
            ));
        }
    }

    info!("Checkout requested by {}", request.customer_name);

    match state.checkout.checkout(request).await {
        Ok(response) => Ok(Json(response)),
        Err(CheckoutError::OutOfStock) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Product out of stock" })),
        )),
        Err(CheckoutError::Store(e)) => {
            error!("Failed to persist order: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Failed to create order" })),
            ))
        }
    }
}
