//! Social platform port trait
//!
//! A single "publish text" call per platform, plus polling for engagement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Platform;
use crate::error::ExternalServiceError;

/// Platform-assigned identifier of a published post
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A piece of content handed to a platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostedContent {
    pub platform: Platform,
    pub post_id: PostId,
    pub content: String,
    pub scheduled_at: DateTime<Utc>,
}

/// A comment, reply or reaction on a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSignal {
    pub post_id: PostId,
    pub author_name: String,
    #[serde(default)]
    pub author_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    pub text: String,
    pub occurred_at: DateTime<Utc>,
}

#[async_trait]
pub trait SocialPoster: Send + Sync {
    /// Publish text now, or at `scheduled_at` when the platform supports it
    async fn publish(
        &self,
        platform: Platform,
        text: &str,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<PostId, ExternalServiceError>;

    /// Engagement on a post that happened after `since`
    async fn fetch_engagements(
        &self,
        post: &PostedContent,
        since: DateTime<Utc>,
    ) -> Result<Vec<EngagementSignal>, ExternalServiceError>;
}
