//! Nurture sequence handlers
//!
//! Operator endpoints for starting, inspecting and steering sequences.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::app::DueStep;
use crate::domain::entities::{DealId, IntentTier, LeadData, NurtureSequence};
use crate::error::AppError;
use crate::AppState;

/// Request to start a sequence for a lead
#[derive(Debug, Deserialize)]
pub struct StartSequenceRequest {
    pub lead: LeadData,
    /// e.g. "high_intent"; the configured default when omitted
    #[serde(default)]
    pub intent_tier: Option<String>,
}

/// A reply from the lead to a sequence step
#[derive(Debug, Deserialize)]
pub struct SequenceResponseRequest {
    /// "positive", "negative" or anything else
    pub response_type: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DueStepsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Defaults to now
    #[serde(default)]
    pub before: Option<DateTime<Utc>>,
}

fn default_limit() -> u64 {
    100
}

/// POST /sequences
pub async fn start_sequence(
    State(state): State<AppState>,
    Json(request): Json<StartSequenceRequest>,
) -> Result<(StatusCode, Json<NurtureSequence>), AppError> {
    let intent_tier = match request.intent_tier.as_deref() {
        Some(tier) => tier.parse::<IntentTier>()?,
        None => state.config.routing.default_intent_tier,
    };

    let sequence = state
        .nurture_service
        .initiate(&request.lead, intent_tier)
        .await?;
    Ok((StatusCode::CREATED, Json(sequence)))
}

/// GET /sequences/due
///
/// Polling surface for the external scheduler.
pub async fn list_due_steps(
    State(state): State<AppState>,
    Query(query): Query<DueStepsQuery>,
) -> Result<Json<Vec<DueStep>>, AppError> {
    let now = query.before.unwrap_or_else(Utc::now);
    let due = state.nurture_service.due_steps(now, query.limit).await?;
    Ok(Json(due))
}

/// GET /sequences/:id
pub async fn get_sequence(
    State(state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<Json<NurtureSequence>, AppError> {
    let sequence = state.nurture_service.get(DealId(deal_id)).await?;
    Ok(Json(sequence))
}

/// POST /sequences/:id/responses
pub async fn record_response(
    State(state): State<AppState>,
    Path(deal_id): Path<i64>,
    Json(request): Json<SequenceResponseRequest>,
) -> Result<Json<NurtureSequence>, AppError> {
    let sequence = state
        .nurture_service
        .handle_sequence_response(DealId(deal_id), &request.response_type, &request.content)
        .await?;
    Ok(Json(sequence))
}

/// POST /sequences/:id/pause
pub async fn pause_sequence(
    State(state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<Json<NurtureSequence>, AppError> {
    Ok(Json(state.nurture_service.pause(DealId(deal_id)).await?))
}

/// POST /sequences/:id/resume
pub async fn resume_sequence(
    State(state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<Json<NurtureSequence>, AppError> {
    Ok(Json(state.nurture_service.resume(DealId(deal_id)).await?))
}

/// POST /sequences/:id/complete
///
/// The deal reached a terminal state outside this service.
pub async fn complete_sequence(
    State(state): State<AppState>,
    Path(deal_id): Path<i64>,
) -> Result<Json<NurtureSequence>, AppError> {
    Ok(Json(state.nurture_service.complete(DealId(deal_id)).await?))
}
