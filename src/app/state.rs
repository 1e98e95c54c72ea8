use std::sync::Arc;

use crate::app::config::Config;
use crate::models::product::Product;
use crate::services::{CallbackService, CheckoutService};
use crate::store::DocumentStore;

/// Shared, read-only per-process state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub product: Product,
    pub checkout: CheckoutService,
    pub callbacks: CallbackService,
    pub store: Arc<dyn DocumentStore>,
}
