//! Prospect handlers

use axum::{extract::State, Json};

use crate::app::ProspectSearch;
use crate::domain::entities::Prospect;
use crate::error::AppError;
use crate::AppState;

/// POST /prospects/search
pub async fn search_prospects(
    State(state): State<AppState>,
    Json(search): Json<ProspectSearch>,
) -> Result<Json<Vec<Prospect>>, AppError> {
    let prospects = state.prospect_service.targeted_companies(&search).await?;
    Ok(Json(prospects))
}
