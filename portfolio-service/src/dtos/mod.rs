use crate::models::{Artwork, Inquiry, Stored};
use crate::services::{Limit, DEFAULT_LIMIT};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

/// Query parameters for `GET /api/artworks`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ArtworkQuery {
    pub tag: Option<String>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl ArtworkQuery {
    /// The tag filter, if a non-empty one was given.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|t| !t.is_empty())
    }

    pub fn limit(&self) -> Result<Limit, AppError> {
        Limit::new(self.limit.unwrap_or(i64::from(DEFAULT_LIMIT)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtworkListResponse {
    pub items: Vec<Stored<Artwork>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InquiryCreatedResponse {
    pub ok: bool,
    pub inquiry: Stored<Inquiry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Connection report served by `GET /test`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}
