//! Scheduler callback handler
//!
//! The external scheduler calls back when a step's execute time arrives.
//! Requests are authenticated with an HMAC-SHA256 signature over the body.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::app::StepOutcome;
use crate::domain::entities::DealId;
use crate::error::AppError;
use crate::AppState;

const SIGNATURE_HEADER: &str = "X-Scheduler-Signature";

/// Step trigger payload
#[derive(Debug, Deserialize)]
pub struct StepTrigger {
    pub deal_id: DealId,
    pub step_index: usize,
}

/// Verify a "sha256=<hex>" HMAC-SHA256 signature of `payload`
///
/// Without a configured secret nothing is accepted.
fn verify_signature(payload: &[u8], signature: Option<&str>, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        tracing::warn!("SCHEDULER_SECRET not configured, rejecting scheduler callback");
        return false;
    };

    let Some(sig_header) = signature else {
        tracing::warn!("No signature provided in scheduler request");
        return false;
    };

    let expected_hex = sig_header.strip_prefix("sha256=").unwrap_or(sig_header);

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => {
            tracing::error!("Invalid scheduler secret key");
            return false;
        }
    };

    mac.update(payload);

    let expected_bytes = match hex::decode(expected_hex) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid signature format");
            return false;
        }
    };

    mac.verify_slice(&expected_bytes).is_ok()
}

/// POST /scheduler/steps
///
/// Execute one nurture step. Triggers for steps that are paused, already
/// executed or not yet due come back as a skipped outcome.
pub async fn execute_step(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StepOutcome>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok());

    if !verify_signature(&body, signature, state.config.scheduler_secret.as_deref()) {
        tracing::warn!("Scheduler signature verification failed");
        return Err(AppError::Unauthorized);
    }

    let trigger: StepTrigger = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse scheduler payload");
        AppError::BadRequest(format!("Invalid JSON: {}", e))
    })?;

    tracing::info!(
        deal_id = %trigger.deal_id,
        step_index = trigger.step_index,
        "Received scheduler trigger"
    );

    let outcome = state
        .nurture_service
        .execute_step(trigger.deal_id, trigger.step_index)
        .await?;
    Ok(Json(outcome))
}
