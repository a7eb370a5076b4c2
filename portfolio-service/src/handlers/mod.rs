//! HTTP handlers for portfolio-service.

pub mod app;
pub mod artworks;
pub mod health;
pub mod inquiries;

pub use app::{hello, not_found, root, HELLO_MESSAGE, ROOT_MESSAGE};
pub use artworks::list_artworks;
pub use health::{diagnostics, health_check, metrics_endpoint, readiness_check};
pub use inquiries::create_inquiry;
