use crate::dtos::{ArtworkListResponse, ArtworkQuery};
use crate::services::record_artworks_listed;
use crate::startup::AppState;
use crate::utils::ValidatedQuery;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// List artworks, optionally only those carrying `tag`.
///
/// GET /api/artworks?tag=&limit=
pub async fn list_artworks(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ArtworkQuery>,
) -> Result<Json<ArtworkListResponse>, AppError> {
    let repository = state.repository()?;
    let limit = query.limit()?;
    let tag = query.tag();

    let items = repository.list_artworks(tag, limit).await?;

    tracing::info!(
        tag = tag.unwrap_or("-"),
        limit = limit.get(),
        count = items.len(),
        "Artworks listed"
    );
    record_artworks_listed(tag.is_some(), items.len());

    Ok(Json(ArtworkListResponse { items }))
}
