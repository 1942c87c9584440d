//! Content handlers

use axum::{extract::State, Json};

use crate::app::{GeneratedPosts, PostRequest};
use crate::error::AppError;
use crate::AppState;

/// POST /content/posts
///
/// Generate industry posts without publishing them.
pub async fn create_posts(
    State(state): State<AppState>,
    Json(request): Json<PostRequest>,
) -> Result<Json<GeneratedPosts>, AppError> {
    let posts = state.content_service.create_industry_posts(&request).await?;
    Ok(Json(posts))
}
