use super::record::{CollectionName, Record};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A published illustration.
///
/// `title` and `image_url` default to empty when absent so that a missing
/// field is reported by validation rather than by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Artwork {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,

    /// Public image URL.
    #[serde(default)]
    #[validate(length(min = 1, message = "image_url is required"))]
    pub image_url: String,

    /// Smaller preview URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub year: Option<i32>,

    /// Labels such as `portrait` or `fantasy`, used for filtering.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Primary palette, free-form or a hex value like `#f5f5f5`.
    #[serde(default)]
    pub palette: Option<String>,
}

impl Artwork {
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Record for Artwork {
    const COLLECTION: CollectionName = CollectionName::Artwork;
}
