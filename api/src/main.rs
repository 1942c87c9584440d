//! Leadflow API Server
//!
//! Lead qualification and nurture sequencing for B2B payment processing
//! outreach: generates and publishes social content, watches for engagement,
//! scores responders and hands qualified leads to sales or a nurture sequence.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    EnrichmentClient, OpenAiClient, PipedriveClient, PostgresSequenceRepository, SocialClient,
    WebhookNotifier,
};
use app::{
    CampaignRuns, CampaignService, ContentService, LeadRouter, NurtureService, ProspectService, SocialService,
};
use config::Config;

type Nurture = NurtureService<PipedriveClient, OpenAiClient, SocialClient, PostgresSequenceRepository>;
type Campaigns = CampaignService<
    OpenAiClient,
    SocialClient,
    EnrichmentClient,
    PipedriveClient,
    WebhookNotifier,
    Nurture,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub content_service: Arc<ContentService<OpenAiClient>>,
    pub prospect_service: Arc<ProspectService<EnrichmentClient>>,
    pub nurture_service: Arc<Nurture>,
    pub lead_router: Arc<LeadRouter<PipedriveClient, WebhookNotifier, Nurture>>,
    pub campaign_service: Arc<Campaigns>,
    pub campaign_runs: Arc<CampaignRuns>,
    /// Flips to true on shutdown; running campaigns stop monitoring
    pub shutdown: Arc<watch::Sender<bool>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn shutdown_signal(shutdown: Arc<watch::Sender<bool>>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
    shutdown.send_replace(true);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,leadflow_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Leadflow API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let sequence_repo = Arc::new(PostgresSequenceRepository::new(db));
    let crm = Arc::new(PipedriveClient::new(
        config.crm.base_url.clone(),
        config.crm.api_token.clone(),
    ));
    let completion = Arc::new(OpenAiClient::new(
        config.completion.base_url.clone(),
        config.completion.api_key.clone(),
        config.completion.model.clone(),
    ));
    let social = Arc::new(SocialClient::new(&config.social));
    let enrichment = Arc::new(EnrichmentClient::new(
        config.enrichment.base_url.clone(),
        config.enrichment.api_key.clone(),
        config.enrichment.requests_per_hour,
    ));
    let notifier = Arc::new(WebhookNotifier::new(config.notifier.webhook_url.clone()));

    // Create application services
    let content_service = Arc::new(ContentService::new(completion));

    let social_service = Arc::new(SocialService::new(social.clone(), enrichment.clone()));

    let prospect_service = Arc::new(ProspectService::new(enrichment));

    let nurture_service = Arc::new(NurtureService::new(
        crm.clone(),
        content_service.clone(),
        social,
        sequence_repo,
    ));

    let lead_router = Arc::new(LeadRouter::new(
        crm,
        notifier,
        nurture_service.clone(),
        config.routing.rules,
        config.routing.default_intent_tier,
        config.notifier.sdr_email.clone(),
    ));

    let campaign_service = Arc::new(CampaignService::new(
        content_service.clone(),
        social_service,
        lead_router.clone(),
        config.monitor,
    ));

    let (shutdown, _) = watch::channel(false);
    let shutdown = Arc::new(shutdown);
    let campaign_runs = Arc::new(CampaignRuns::new());

    // Create app state
    let state = AppState {
        content_service,
        prospect_service,
        nurture_service,
        lead_router,
        campaign_service,
        campaign_runs: campaign_runs.clone(),
        shutdown: shutdown.clone(),
        config: config.clone(),
    };

    // Operator routes (bearer token)
    let protected = Router::new()
        .route("/campaigns/run", post(handlers::run_campaign))
        .route("/content/posts", post(handlers::create_posts))
        .route("/leads/route", post(handlers::route_leads))
        .route("/prospects/search", post(handlers::search_prospects))
        .route("/sequences", post(handlers::start_sequence))
        .route("/sequences/due", get(handlers::list_due_steps))
        .route("/sequences/:id", get(handlers::get_sequence))
        .route("/sequences/:id/responses", post(handlers::record_response))
        .route("/sequences/:id/pause", post(handlers::pause_sequence))
        .route("/sequences/:id/resume", post(handlers::resume_sequence))
        .route("/sequences/:id/complete", post(handlers::complete_sequence))
        .layer(middleware::from_fn_with_state(
            auth::ApiKeyAuth::new(config.api_token.as_deref()),
            auth::auth_middleware,
        ));

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Scheduler callbacks (no auth, uses signature verification)
        .route("/scheduler/steps", post(handlers::execute_step))
        .merge(protected)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    campaign_runs.drain().await;
    tracing::info!("Shutdown complete");

    Ok(())
}
