mod app;
mod handlers;
mod models;
mod services;
mod store;

use app::config::Config;
use app::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use models::product::Product;
use services::{CallbackService, CheckoutService, PaymentGatewayClient};
use std::sync::Arc;
use store::{DocumentStore, MemoryStore, MongoStore};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    info!("Starting coffee shop backend on port {}", config.server_port);

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(MongoStore::connect(url, &config.database_name).await?),
        None => {
            warn!("DATABASE_URL not set, orders will be kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let product = Product::catalog();
    let gateway = Arc::new(PaymentGatewayClient::new(&config));
    if config.gateway_token.is_none() {
        warn!("MYFATOORAH_TOKEN not set, checkout will run without payment links");
    }

    let state = Arc::new(AppState {
        checkout: CheckoutService::new(product.clone(), store.clone(), gateway),
        callbacks: CallbackService::new(store.clone()),
        product,
        store,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/", get(root))
        .route("/api/product", get(handlers::product::get_product))
        .route("/api/checkout", post(handlers::checkout::checkout))
        .route(
            "/api/payment/callback",
            post(handlers::callback::payment_callback),
        )
        .route("/test", get(handlers::diagnostics::store_status))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Coffee Shop Backend is running" }))
}
