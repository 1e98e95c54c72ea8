pub mod callback;
pub mod checkout;
pub mod gateway_client;

pub use callback::CallbackService;
pub use checkout::{CheckoutError, CheckoutService};
pub use gateway_client::{InvoiceGateway, InvoiceRequest, InvoiceResult, PaymentGatewayClient};
