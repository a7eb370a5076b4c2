use super::store::{DocumentStore, Filter, Limit, StoredDocument};
use crate::models::CollectionName;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local document store for development (`DATABASE_URL=memory://`)
/// and tests. Documents keep insertion order; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<CollectionName, Vec<StoredDocument>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::store("in-memory store lock poisoned")
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_document(
        &self,
        collection: CollectionName,
        record: Map<String, Value>,
    ) -> Result<StoredDocument, AppError> {
        // Same identifier format and timestamp precision as MongoDB.
        let now = BsonDateTime::now().to_chrono();
        let stored = StoredDocument {
            id: ObjectId::new().to_hex(),
            fields: record,
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.collections
            .write()
            .map_err(poisoned)?
            .entry(collection)
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn get_documents(
        &self,
        collection: CollectionName,
        filter: &Filter,
        limit: Limit,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let collections = self.collections.read().map_err(poisoned)?;
        let documents = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.fields))
                    .take(limit.get() as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let _collections = self.collections.read().map_err(poisoned)?;
        Ok(())
    }

    async fn collection_names(&self) -> Result<Vec<String>, AppError> {
        let collections = self.collections.read().map_err(poisoned)?;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.as_str().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn assigns_unique_ids() {
        let store = InMemoryStore::new();
        let a = store
            .create_document(CollectionName::Inquiry, record(json!({ "name": "A" })))
            .await
            .unwrap();
        let b = store
            .create_document(CollectionName::Inquiry, record(json!({ "name": "B" })))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 24);
        assert!(a.created_at.is_some());
    }

    #[tokio::test]
    async fn fetch_honours_filter_and_limit() {
        let store = InMemoryStore::new();
        for (title, tag) in [("a", "x"), ("b", "y"), ("c", "x"), ("d", "x")] {
            store
                .create_document(
                    CollectionName::Artwork,
                    record(json!({ "title": title, "tags": [tag] })),
                )
                .await
                .unwrap();
        }

        let docs = store
            .get_documents(
                CollectionName::Artwork,
                &Filter::contains("tags", "x"),
                Limit::new(2).unwrap(),
            )
            .await
            .unwrap();

        let titles: Vec<_> = docs.iter().map(|d| d.fields["title"].clone()).collect();
        assert_eq!(titles, vec![json!("a"), json!("c")]);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryStore::new();
        store
            .create_document(CollectionName::Inquiry, record(json!({ "name": "A" })))
            .await
            .unwrap();

        let artworks = store
            .get_documents(CollectionName::Artwork, &Filter::All, Limit::default())
            .await
            .unwrap();

        assert!(artworks.is_empty());
        assert_eq!(store.collection_names().await.unwrap(), vec!["inquiry"]);
    }
}
