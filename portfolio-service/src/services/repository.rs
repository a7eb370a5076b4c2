use super::store::{DocumentStore, Filter, Limit, StoredDocument};
use crate::models::{Artwork, Inquiry, Record, Stored};
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

/// Typed access to the document store.
#[derive(Clone)]
pub struct PortfolioRepository {
    store: Arc<dyn DocumentStore>,
}

impl PortfolioRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Validates `record` and persists it. The returned value carries the
    /// submitted fields unchanged plus the store-assigned id and timestamps.
    pub async fn create<T: Record>(&self, record: T) -> Result<Stored<T>, AppError> {
        record.validate()?;

        let fields = match serde_json::to_value(&record) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                return Err(AppError::InternalError(anyhow::anyhow!(
                    "{} record did not serialize to an object",
                    T::COLLECTION
                )))
            }
            Err(e) => {
                return Err(AppError::InternalError(anyhow::anyhow!(
                    "Failed to serialize {} record: {}",
                    T::COLLECTION,
                    e
                )))
            }
        };

        let stored = self.store.create_document(T::COLLECTION, fields).await?;

        Ok(Stored {
            id: stored.id,
            record,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }

    /// Fetches up to `limit` records matching `filter`. Documents that no
    /// longer decode or validate are logged and left out.
    pub async fn find<T: Record>(
        &self,
        filter: &Filter,
        limit: Limit,
    ) -> Result<Vec<Stored<T>>, AppError> {
        let documents = self
            .store
            .get_documents(T::COLLECTION, filter, limit)
            .await?;

        Ok(documents.into_iter().filter_map(decode::<T>).collect())
    }

    pub async fn list_artworks(
        &self,
        tag: Option<&str>,
        limit: Limit,
    ) -> Result<Vec<Stored<Artwork>>, AppError> {
        let filter = match tag {
            Some(tag) if !tag.is_empty() => Filter::contains("tags", tag),
            _ => Filter::All,
        };
        self.find(&filter, limit).await
    }

    pub async fn submit_inquiry(&self, inquiry: Inquiry) -> Result<Stored<Inquiry>, AppError> {
        self.create(inquiry).await
    }
}

fn decode<T: Record>(document: StoredDocument) -> Option<Stored<T>> {
    let record: T = match serde_json::from_value(Value::Object(document.fields)) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(
                collection = %T::COLLECTION,
                id = %document.id,
                "Skipping undecodable document: {}",
                e
            );
            return None;
        }
    };

    if let Err(e) = record.validate() {
        tracing::warn!(
            collection = %T::COLLECTION,
            id = %document.id,
            "Skipping invalid document: {}",
            e
        );
        return None;
    }

    Some(Stored {
        id: document.id,
        record,
        created_at: document.created_at,
        updated_at: document.updated_at,
    })
}
