use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub gateway_token: Option<String>,
    pub gateway_base_url: String,
    pub callback_url: String,
    pub error_url: String,
    pub database_url: Option<String>,
    pub database_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        let callback_url = env::var("PAYMENT_CALLBACK_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api/payment/callback".to_string());
        Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            gateway_token: env::var("MYFATOORAH_TOKEN").ok(),
            gateway_base_url: env::var("MYFATOORAH_BASE_URL")
                .unwrap_or_else(|_| "https://apitest.myfatoorah.com".to_string()),
            // Gateway error redirects fall back to the callback URL when unset
            error_url: env::var("PAYMENT_ERROR_URL").unwrap_or_else(|_| callback_url.clone()),
            callback_url,
            database_url: env::var("DATABASE_URL").ok(),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "coffee_shop".to_string()),
        }
    }
}
