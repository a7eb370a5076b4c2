use super::record::{CollectionName, Record};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A contact/commission request submitted through the site.
///
/// Required fields default to empty when absent, so one validation pass
/// reports every missing or short field together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Inquiry {
    #[serde(default)]
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,

    // Presence only; the address format is not checked.
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 2, message = "subject must be at least 2 characters"))]
    pub subject: String,

    #[serde(default)]
    #[validate(length(min = 10, message = "message must be at least 10 characters"))]
    pub message: String,

    #[serde(default)]
    pub budget: Option<String>,
}

impl Record for Inquiry {
    const COLLECTION: CollectionName = CollectionName::Inquiry;
}
