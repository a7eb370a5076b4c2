use crate::dtos::MessageResponse;
use axum::{http::Uri, Json};
use service_core::error::AppError;

pub const ROOT_MESSAGE: &str = "Illustration Portfolio Backend Running";
pub const HELLO_MESSAGE: &str = "Hello from the backend API!";

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(ROOT_MESSAGE))
}

/// GET /api/hello
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new(HELLO_MESSAGE))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
