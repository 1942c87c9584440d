//! Social service
//!
//! Publishes generated content on a posting schedule and turns engagement on
//! those posts into scored-ready `Response`s.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::watch;

use super::content_service::GeneratedPosts;
use crate::config::MonitorConfig;
use crate::domain::entities::{classify_interest, is_decision_maker_title, Platform, Response};
use crate::domain::ports::{EngagementSignal, PostId, PostedContent, ProspectSource, SocialPoster};
use crate::error::AppError;

/// UTC hours that perform best per platform
pub fn posting_slots(platform: Platform) -> &'static [u32] {
    match platform {
        Platform::Linkedin => &[9, 12, 17],
        Platform::Twitter => &[8, 13, 18],
    }
}

/// The next `count` posting slots strictly after `now`
pub fn optimal_schedule(platform: Platform, count: usize, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let slots = posting_slots(platform);
    let mut times = Vec::with_capacity(count);
    let mut day = now.date_naive();

    while times.len() < count {
        for &hour in slots {
            let Some(naive) = day.and_hms_opt(hour, 0, 0) else {
                continue;
            };
            let slot = Utc.from_utc_datetime(&naive);
            if slot > now && times.len() < count {
                times.push(slot);
            }
        }
        day = day + Duration::days(1);
    }

    times
}

pub struct SocialService<S, P>
where
    S: SocialPoster,
    P: ProspectSource,
{
    social: Arc<S>,
    prospects: Arc<P>,
}

impl<S, P> SocialService<S, P>
where
    S: SocialPoster,
    P: ProspectSource,
{
    pub fn new(social: Arc<S>, prospects: Arc<P>) -> Self {
        Self { social, prospects }
    }

    /// Publish each platform's content at the given times, or at the next
    /// optimal slots when no times are given. Content beyond the number of
    /// times is not published.
    pub async fn schedule_posts(
        &self,
        content: &GeneratedPosts,
        platforms: &[Platform],
        schedule_times: Option<&[DateTime<Utc>]>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PostedContent>, AppError> {
        let mut posted = Vec::new();

        for &platform in platforms {
            let Some(pieces) = content.get(&platform).filter(|p| !p.is_empty()) else {
                continue;
            };

            let times = match schedule_times {
                Some(times) => times.to_vec(),
                None => optimal_schedule(platform, pieces.len(), now),
            };
            if times.len() < pieces.len() {
                tracing::warn!(
                    %platform,
                    pieces = pieces.len(),
                    slots = times.len(),
                    "Fewer schedule times than posts; extra posts are dropped"
                );
            }

            for (piece, scheduled_at) in pieces.iter().zip(times) {
                let post_id = self
                    .social
                    .publish(platform, piece, Some(scheduled_at))
                    .await
                    .map_err(|e| {
                        tracing::error!(%platform, error = %e, "Error scheduling post");
                        e
                    })?;

                posted.push(PostedContent {
                    platform,
                    post_id,
                    content: piece.clone(),
                    scheduled_at,
                });
            }
        }

        tracing::info!(count = posted.len(), "Scheduled posts");
        Ok(posted)
    }

    /// Poll the posts for engagement at most `config.max_polls` times,
    /// `config.poll_interval` apart, stopping early once `cancel` reads true.
    pub async fn monitor_responses(
        &self,
        posts: &[PostedContent],
        config: MonitorConfig,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<Vec<Response>, AppError> {
        let mut responses = Vec::new();
        // Newest engagement seen per post; each poll only asks for later ones
        let mut watermarks: HashMap<&PostId, DateTime<Utc>> = posts
            .iter()
            .map(|p| (&p.post_id, p.scheduled_at))
            .collect();

        for poll in 0..config.max_polls {
            if *cancel.borrow() {
                tracing::info!(poll, "Response monitoring cancelled");
                break;
            }

            for post in posts {
                let since = watermarks
                    .get(&post.post_id)
                    .copied()
                    .unwrap_or(post.scheduled_at);
                let signals = self.social.fetch_engagements(post, since).await?;

                for signal in signals {
                    if signal.occurred_at > since {
                        let entry = watermarks.entry(&post.post_id).or_insert(since);
                        *entry = (*entry).max(signal.occurred_at);
                    }
                    if let Some(response) = self.to_response(&signal, post.platform).await? {
                        responses.push(response);
                    }
                }
            }

            if poll + 1 == config.max_polls {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(config.poll_interval) => {}
                Ok(()) = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!(poll, "Response monitoring cancelled");
                        break;
                    }
                }
            }
        }

        tracing::info!(count = responses.len(), "Collected responses");
        Ok(responses)
    }

    /// Enrich the author's company; signals without a known company are skipped
    async fn to_response(
        &self,
        signal: &EngagementSignal,
        platform: Platform,
    ) -> Result<Option<Response>, AppError> {
        let Some(company) = signal.company_name.as_deref() else {
            tracing::debug!(author = %signal.author_name, "Skipping engagement without a company");
            return Ok(None);
        };
        let Some(prospect) = self.prospects.lookup_company(company).await? else {
            tracing::debug!(company, "Skipping engagement from unknown company");
            return Ok(None);
        };

        let is_decision_maker = signal
            .author_title
            .as_deref()
            .is_some_and(is_decision_maker_title)
            || prospect
                .decision_makers
                .iter()
                .any(|dm| dm.name.eq_ignore_ascii_case(&signal.author_name));

        Ok(Some(Response {
            prospect,
            platform,
            content: signal.text.clone(),
            interest_level: classify_interest(&signal.text),
            timestamp: signal.occurred_at,
            is_decision_maker,
        }))
    }
}
