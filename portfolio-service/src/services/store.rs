//! Store-agnostic access contract.
//!
//! Records cross this boundary as flat JSON objects; typing happens one
//! layer up in [`PortfolioRepository`](super::PortfolioRepository).

use crate::models::CollectionName;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use service_core::error::AppError;

pub const DEFAULT_LIMIT: u32 = 24;
pub const MAX_LIMIT: u32 = 100;

/// Maximum number of records a single fetch may return, always in `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u32);

impl Limit {
    pub fn new(value: i64) -> Result<Self, AppError> {
        match u32::try_from(value) {
            Ok(v) if (1..=MAX_LIMIT).contains(&v) => Ok(Self(v)),
            _ => Err(AppError::invalid_field(
                "limit",
                "range",
                format!("limit must be between 1 and {}, got {}", MAX_LIMIT, value),
            )),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

/// Predicate applied by [`DocumentStore::get_documents`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// `field` equals `value`.
    Equals { field: String, value: Value },
    /// `field` is an array containing `value` (a scalar equal to `value` also matches).
    Contains { field: String, value: Value },
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluates the predicate against a document's fields.
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        match self {
            Filter::All => true,
            Filter::Equals { field, value } => fields.get(field) == Some(value),
            Filter::Contains { field, value } => match fields.get(field) {
                Some(Value::Array(items)) => items.contains(value),
                Some(other) => other == value,
                None => false,
            },
        }
    }
}

/// A document as the store returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Map<String, Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts one record; the store assigns its identifier and timestamps.
    async fn create_document(
        &self,
        collection: CollectionName,
        record: Map<String, Value>,
    ) -> Result<StoredDocument, AppError>;

    /// Fetches up to `limit` records matching `filter`, in store order.
    async fn get_documents(
        &self,
        collection: CollectionName,
        filter: &Filter,
        limit: Limit,
    ) -> Result<Vec<StoredDocument>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    async fn collection_names(&self) -> Result<Vec<String>, AppError>;

    /// Short backend label for diagnostics.
    fn backend(&self) -> &'static str;
}
