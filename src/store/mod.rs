use async_trait::async_trait;
use mongodb::bson::Document;
use serde::Serialize;
use thiserror::Error;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub const ORDERS: &str = "order";
pub const ORDER_CALLBACKS: &str = "order_callbacks";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("document serialization failed: {0}")]
    Serialization(String),
}

/// Connectivity snapshot for the diagnostics route.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub backend: &'static str,
    pub connected: bool,
    pub database: Option<String>,
    pub collections: Vec<String>,
}

/// Collection-oriented create/read/update store. Documents, filters and
/// patches are flat bson maps; `update_one` applies a partial patch to the
/// first matching document. A `_id` filter key matches the id returned by
/// `create`. No guarantees across collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        patch: Document,
    ) -> Result<u64, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn status(&self) -> StoreStatus;
}
