use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// The single product this shop sells. Built once at startup and passed
/// into the services; read-only for the process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub short: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    pub in_stock: bool,
    pub images: Vec<String>,
    pub specs: Vec<String>,
}

impl Product {
    pub fn catalog() -> Self {
        Self {
            id: "kalrem-b6".to_string(),
            title: "Kalerm B6 Home Coffee Machine".to_string(),
            short: "Premium automatic coffee machine for home baristas".to_string(),
            description: "Make cafe-quality espresso, cappuccino, and latte at home with the \
                          Kalerm B6. One-touch drinks, integrated grinder, and sleek compact \
                          design."
                .to_string(),
            price: dec!(299.0), // KWD
            currency: "KWD".to_string(),
            in_stock: true,
            images: vec![
                "https://images.unsplash.com/photo-1517705008128-361805f42e86?q=80&w=1200&auto=format&fit=crop".to_string(),
                "https://images.unsplash.com/photo-1498804103079-a6351b050096?q=80&w=1200&auto=format&fit=crop".to_string(),
            ],
            specs: vec![
                "One-touch espresso, cappuccino, latte".to_string(),
                "Integrated conical burr grinder".to_string(),
                "Adjustable milk frother".to_string(),
                "Compact, modern design".to_string(),
            ],
        }
    }
}
