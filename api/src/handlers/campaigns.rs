//! Campaign handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::CampaignRequest;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RunCampaignRequest {
    #[serde(flatten)]
    pub campaign: CampaignRequest,
    /// Hold the connection until monitoring ends and return the report
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
struct CampaignAccepted {
    run_id: Uuid,
    status: &'static str,
}

/// POST /campaigns/run
///
/// Runs in the background by default; monitoring can take hours.
/// On shutdown background runs stop monitoring, route what they collected
/// and are awaited before the process exits.
pub async fn run_campaign(
    State(state): State<AppState>,
    Json(request): Json<RunCampaignRequest>,
) -> Result<Response, AppError> {
    let run_id = Uuid::new_v4();
    let cancel = state.shutdown.subscribe();

    if request.wait {
        let report = state
            .campaign_service
            .run_campaign(run_id, &request.campaign, cancel)
            .await?;
        return Ok(Json(report).into_response());
    }

    let service = state.campaign_service.clone();
    state
        .campaign_runs
        .spawn(async move {
            if let Err(e) = service.run_campaign(run_id, &request.campaign, cancel).await {
                tracing::error!(%run_id, error = %e, "Campaign failed");
            }
        })
        .await;

    Ok((
        StatusCode::ACCEPTED,
        Json(CampaignAccepted {
            run_id,
            status: "started",
        }),
    )
        .into_response())
}
