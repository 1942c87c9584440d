//! Lead routing handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::domain::entities::{LeadRecord, QualificationCriteria, Response};
use crate::error::AppError;
use crate::AppState;

/// Responses collected elsewhere, to be scored and routed
#[derive(Debug, Deserialize)]
pub struct RouteLeadsRequest {
    pub responses: Vec<Response>,
    #[serde(default)]
    pub criteria: QualificationCriteria,
}

/// POST /leads/route
pub async fn route_leads(
    State(state): State<AppState>,
    Json(request): Json<RouteLeadsRequest>,
) -> Result<Json<Vec<LeadRecord>>, AppError> {
    let leads = state
        .lead_router
        .process_responses(&request.responses, &request.criteria)
        .await?;
    Ok(Json(leads))
}
