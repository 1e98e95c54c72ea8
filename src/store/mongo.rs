use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Database};
use tracing::warn;

use super::{DocumentStore, StoreError, StoreStatus};

/// MongoDB-backed store. Ids cross the trait boundary as strings; this
/// adapter owns the string/ObjectId conversion in both directions.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            db: client.database(database),
        })
    }

    fn with_object_id(mut filter: Document) -> Document {
        if let Ok(id) = filter.get_str("_id") {
            if let Ok(oid) = ObjectId::parse_str(id) {
                filter.insert("_id", oid);
            }
        }
        filter
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn create(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        patch: Document,
    ) -> Result<u64, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .update_one(Self::with_object_id(filter), doc! { "$set": patch }, None)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(result.matched_count)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.db
            .collection::<Document>(collection)
            .find_one(Self::with_object_id(filter), None)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn status(&self) -> StoreStatus {
        match self.db.list_collection_names(None).await {
            Ok(mut collections) => {
                collections.truncate(10);
                StoreStatus {
                    backend: "mongodb",
                    connected: true,
                    database: Some(self.db.name().to_string()),
                    collections,
                }
            }
            Err(e) => {
                warn!("MongoDB connectivity check failed: {}", e);
                StoreStatus {
                    backend: "mongodb",
                    connected: false,
                    database: Some(self.db.name().to_string()),
                    collections: Vec::new(),
                }
            }
        }
    }
}
