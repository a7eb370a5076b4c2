use super::store::{DocumentStore, Filter, Limit, StoredDocument};
use crate::models::CollectionName;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, DateTime as BsonDateTime, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use serde_json::{Map, Value};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for portfolio-service");

        // Multikey index backing the tag filter on artwork listings
        let tags_index = IndexModel::builder()
            .keys(doc! { "tags": 1 })
            .options(IndexOptions::builder().name("tags_idx".to_string()).build())
            .build();

        self.collection(CollectionName::Artwork)
            .create_index(tags_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create tags index: {}", e);
                AppError::from(e)
            })?;

        // Inquiries are read newest first by whoever answers them
        let created_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.collection(CollectionName::Inquiry)
            .create_index(created_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    fn collection(&self, name: CollectionName) -> Collection<Document> {
        self.db.collection(name.as_str())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn create_document(
        &self,
        collection: CollectionName,
        record: Map<String, Value>,
    ) -> Result<StoredDocument, AppError> {
        // BSON keeps millisecond precision; stamp once so the echo matches what is stored.
        let now = BsonDateTime::now();

        let mut document = to_bson_document(&record)?;
        document.insert("created_at", now);
        document.insert("updated_at", now);

        let result = self
            .collection(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "Failed to insert document: {}", e);
                AppError::from(e)
            })?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };

        tracing::debug!(collection = %collection, id = %id, "Document created");

        Ok(StoredDocument {
            id,
            fields: record,
            created_at: Some(now.to_chrono()),
            updated_at: Some(now.to_chrono()),
        })
    }

    async fn get_documents(
        &self,
        collection: CollectionName,
        filter: &Filter,
        limit: Limit,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let find_options = FindOptions::builder()
            .limit(i64::from(limit.get()))
            .build();

        let cursor = self
            .collection(collection)
            .find(to_bson_filter(filter)?, find_options)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "Failed to query documents: {}", e);
                AppError::from(e)
            })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            tracing::error!(collection = %collection, "Failed to collect documents: {}", e);
            AppError::from(e)
        })?;

        documents.into_iter().map(into_stored).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn collection_names(&self) -> Result<Vec<String>, AppError> {
        self.db.list_collection_names(None).await.map_err(|e| {
            tracing::error!("Failed to list collections: {}", e);
            AppError::from(e)
        })
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

fn to_bson_document(record: &Map<String, Value>) -> Result<Document, AppError> {
    mongodb::bson::to_document(record).map_err(|e| {
        tracing::error!("Failed to encode record as BSON: {}", e);
        AppError::store(e)
    })
}

fn to_bson_value(value: &Value) -> Result<Bson, AppError> {
    mongodb::bson::to_bson(value).map_err(AppError::store)
}

fn to_bson_filter(filter: &Filter) -> Result<Document, AppError> {
    let mut query = Document::new();
    match filter {
        Filter::All => {}
        Filter::Equals { field, value } => {
            query.insert(field.clone(), to_bson_value(value)?);
        }
        Filter::Contains { field, value } => {
            query.insert(field.clone(), doc! { "$in": [to_bson_value(value)?] });
        }
    }
    Ok(query)
}

fn into_stored(mut document: Document) -> Result<StoredDocument, AppError> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s,
        Some(other) => other.to_string(),
        None => return Err(AppError::store("document is missing its _id")),
    };
    let created_at = take_timestamp(&mut document, "created_at");
    let updated_at = take_timestamp(&mut document, "updated_at");

    let fields = document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();

    Ok(StoredDocument {
        id,
        fields,
        created_at,
        updated_at,
    })
}

/// Relaxed extended JSON, except that whole-number doubles come back as
/// integers. Shell and driver tooling often write `2021` as a double.
fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Double(d) if is_whole(d) => Value::from(d as i64),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        other => other.into_relaxed_extjson(),
    }
}

fn is_whole(d: f64) -> bool {
    d.fract() == 0.0 && d >= i64::MIN as f64 && d < i64::MAX as f64
}

fn take_timestamp(document: &mut Document, key: &str) -> Option<DateTime<Utc>> {
    match document.remove(key) {
        Some(Bson::DateTime(dt)) => Some(dt.to_chrono()),
        _ => None,
    }
}
