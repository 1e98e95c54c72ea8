use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::app::state::AppState;
use crate::models::product::Product;

pub async fn get_product(State(state): State<Arc<AppState>>) -> Json<Product> {
    Json(state.product.clone())
}
