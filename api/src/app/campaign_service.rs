//! Campaign service
//!
//! Runs one outreach campaign end to end: generate posts, publish them,
//! watch for engagement, then route the responses that qualify.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use uuid::Uuid;

use super::content_service::{ContentService, PostRequest};
use super::lead_router::{LeadRouter, SequenceStarter};
use super::social_service::SocialService;
use crate::config::MonitorConfig;
use crate::domain::entities::{LeadRecord, QualificationCriteria};
use crate::domain::ports::{
    CompletionClient, CrmClient, LeadNotifier, PostedContent, ProspectSource, SocialPoster,
};
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignRequest {
    #[serde(flatten)]
    pub posts: PostRequest,
    /// Explicit publish times; the next optimal slots are used when absent
    #[serde(default)]
    pub schedule_times: Option<Vec<DateTime<Utc>>>,
    #[serde(default)]
    pub criteria: QualificationCriteria,
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    #[serde(default)]
    pub max_polls: Option<u32>,
}

impl CampaignRequest {
    /// Monitoring settings with the request's overrides applied
    pub fn monitor_config(&self, defaults: MonitorConfig) -> MonitorConfig {
        MonitorConfig {
            poll_interval: self
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            max_polls: self.max_polls.unwrap_or(defaults.max_polls),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    pub run_id: Uuid,
    pub posts: Vec<PostedContent>,
    pub responses_seen: usize,
    pub leads: Vec<LeadRecord>,
}

/// Background campaign runs, drained on shutdown so routing finishes its
/// CRM writes before the runtime stops
#[derive(Default)]
pub struct CampaignRuns {
    tasks: Mutex<JoinSet<()>>,
}

impl CampaignRuns {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn spawn<F>(&self, run: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        // Reap finished runs so the set only holds live ones
        while let Some(result) = tasks.try_join_next() {
            log_join_error(result);
        }
        tasks.spawn(run);
    }

    /// Wait for every run still in flight
    pub async fn drain(&self) {
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            tracing::info!(runs = tasks.len(), "Waiting for campaign runs to finish");
        }
        while let Some(result) = tasks.join_next().await {
            log_join_error(result);
        }
    }
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Campaign run task failed");
    }
}

pub struct CampaignService<C, S, P, CRM, N, SS>
where
    C: CompletionClient,
    S: SocialPoster,
    P: ProspectSource,
    CRM: CrmClient,
    N: LeadNotifier,
    SS: SequenceStarter,
{
    content: Arc<ContentService<C>>,
    social: Arc<SocialService<S, P>>,
    router: Arc<LeadRouter<CRM, N, SS>>,
    monitor: MonitorConfig,
}

impl<C, S, P, CRM, N, SS> CampaignService<C, S, P, CRM, N, SS>
where
    C: CompletionClient,
    S: SocialPoster,
    P: ProspectSource,
    CRM: CrmClient,
    N: LeadNotifier,
    SS: SequenceStarter,
{
    pub fn new(
        content: Arc<ContentService<C>>,
        social: Arc<SocialService<S, P>>,
        router: Arc<LeadRouter<CRM, N, SS>>,
        monitor: MonitorConfig,
    ) -> Self {
        Self {
            content,
            social,
            router,
            monitor,
        }
    }

    pub async fn run_campaign(
        &self,
        run_id: Uuid,
        request: &CampaignRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<CampaignReport, AppError> {
        tracing::info!(%run_id, industry = %request.posts.industry, "Campaign started");

        let generated = self.content.create_industry_posts(&request.posts).await?;

        let posts = self
            .social
            .schedule_posts(
                &generated,
                &request.posts.platforms,
                request.schedule_times.as_deref(),
                Utc::now(),
            )
            .await?;

        let monitor = request.monitor_config(self.monitor);
        let responses = self
            .social
            .monitor_responses(&posts, monitor, cancel)
            .await?;

        let leads = self
            .router
            .process_responses(&responses, &request.criteria)
            .await?;

        tracing::info!(
            %run_id,
            posts = posts.len(),
            responses = responses.len(),
            leads = leads.len(),
            "Campaign finished"
        );

        Ok(CampaignReport {
            run_id,
            posts,
            responses_seen: responses.len(),
            leads,
        })
    }
}
