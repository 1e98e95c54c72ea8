use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::Document;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreStatus};

/// In-process store used when no database is configured, and by tests.
/// Documents are kept per collection in arrival order.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| document.get(key) == Some(value))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut document = document;
        document.insert("_id", id.clone());
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        patch: Document,
    ) -> Result<u64, StoreError> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(0);
        };
        match documents.iter_mut().find(|doc| matches(doc, &filter)) {
            Some(document) => {
                for (key, value) in patch {
                    document.insert(key, value);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, &filter)).cloned()))
    }

    async fn status(&self) -> StoreStatus {
        let mut collections: Vec<String> =
            self.collections.iter().map(|entry| entry.key().clone()).collect();
        collections.sort();
        StoreStatus {
            backend: "memory",
            connected: true,
            database: None,
            collections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn create_assigns_distinct_ids_and_find_matches_them() {
        let store = MemoryStore::new();
        let a = store.create("order", doc! { "status": "pending" }).await.unwrap();
        let b = store.create("order", doc! { "status": "pending" }).await.unwrap();
        assert_ne!(a, b);

        let found = store.find_one("order", doc! { "_id": &a }).await.unwrap().unwrap();
        assert_eq!(found.get_str("status").unwrap(), "pending");
        assert_eq!(found.get_str("_id").unwrap(), a);
    }

    #[tokio::test]
    async fn update_one_patches_only_the_matching_document() {
        let store = MemoryStore::new();
        let id = store
            .create("order", doc! { "status": "pending", "customer_name": "Dana" })
            .await
            .unwrap();
        store.create("order", doc! { "status": "pending" }).await.unwrap();

        let matched = store
            .update_one("order", doc! { "_id": &id }, doc! { "status": "paid" })
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let patched = store.find_one("order", doc! { "_id": &id }).await.unwrap().unwrap();
        assert_eq!(patched.get_str("status").unwrap(), "paid");
        // Untouched fields survive a partial patch
        assert_eq!(patched.get_str("customer_name").unwrap(), "Dana");

        let other = store.find_one("order", doc! { "status": "pending" }).await.unwrap();
        assert!(other.is_some());
    }

    #[tokio::test]
    async fn update_one_without_match_reports_zero() {
        let store = MemoryStore::new();
        let matched = store
            .update_one("order", doc! { "invoice_id": "nope" }, doc! { "status": "paid" })
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn status_lists_collections() {
        let store = MemoryStore::new();
        store.create("order", doc! {}).await.unwrap();
        store.create("order_callbacks", doc! {}).await.unwrap();

        let status = store.status().await;
        assert!(status.connected);
        assert_eq!(status.collections, vec!["order", "order_callbacks"]);
    }
}
