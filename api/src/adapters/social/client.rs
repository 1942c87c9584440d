//! LinkedIn and Twitter posting client
//!
//! One publish endpoint and one engagement listing per platform. Tokens are
//! static and come from configuration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::adapters::http::{handle_response, request_error};
use crate::config::SocialConfig;
use crate::domain::entities::Platform;
use crate::domain::ports::{EngagementSignal, PostId, PostedContent, SocialPoster};
use crate::error::{ExternalServiceError, Service};

pub struct SocialClient {
    http: Client,
    linkedin_base_url: String,
    linkedin_token: String,
    /// URN posts are authored as, e.g. "urn:li:organization:123"
    linkedin_author: String,
    twitter_base_url: String,
    twitter_token: String,
}

impl SocialClient {
    pub fn new(config: &SocialConfig) -> Self {
        Self {
            http: Client::new(),
            linkedin_base_url: config.linkedin_base_url.trim_end_matches('/').to_string(),
            linkedin_token: config.linkedin_token.clone(),
            linkedin_author: config.linkedin_author.clone(),
            twitter_base_url: config.twitter_base_url.trim_end_matches('/').to_string(),
            twitter_token: config.twitter_token.clone(),
        }
    }

    fn token(&self, platform: Platform) -> &str {
        match platform {
            Platform::Linkedin => &self.linkedin_token,
            Platform::Twitter => &self.twitter_token,
        }
    }
}

#[derive(Serialize)]
struct LinkedinPostRequest<'a> {
    author: &'a str,
    commentary: &'a str,
    visibility: &'static str,
    #[serde(rename = "lifecycleState")]
    lifecycle_state: &'static str,
    #[serde(rename = "scheduledPublishTime", skip_serializing_if = "Option::is_none")]
    scheduled_publish_time: Option<i64>,
}

#[derive(Deserialize)]
struct LinkedinPostResponse {
    id: String,
}

#[derive(Serialize)]
struct TweetRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

#[derive(Deserialize)]
struct EngagementList {
    #[serde(default)]
    elements: Vec<EngagementSignal>,
}

#[async_trait]
impl SocialPoster for SocialClient {
    async fn publish(
        &self,
        platform: Platform,
        text: &str,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<PostId, ExternalServiceError> {
        let post_id = match platform {
            Platform::Linkedin => {
                let request = LinkedinPostRequest {
                    author: &self.linkedin_author,
                    commentary: text,
                    visibility: "PUBLIC",
                    lifecycle_state: "PUBLISHED",
                    scheduled_publish_time: scheduled_at.map(|t| t.timestamp_millis()),
                };
                let response = self
                    .http
                    .post(format!("{}/rest/posts", self.linkedin_base_url))
                    .bearer_auth(self.token(platform))
                    .json(&request)
                    .send()
                    .await
                    .map_err(request_error(Service::Social))?;
                let body: LinkedinPostResponse = handle_response(Service::Social, response).await?;
                body.id
            }
            Platform::Twitter => {
                // No native scheduling; callers publish at the slot time.
                let response = self
                    .http
                    .post(format!("{}/2/tweets", self.twitter_base_url))
                    .bearer_auth(self.token(platform))
                    .json(&TweetRequest { text })
                    .send()
                    .await
                    .map_err(request_error(Service::Social))?;
                let body: TweetResponse = handle_response(Service::Social, response).await?;
                body.data.id
            }
        };

        tracing::debug!(%platform, post_id = %post_id, "Published post");
        Ok(PostId(post_id))
    }

    async fn fetch_engagements(
        &self,
        post: &PostedContent,
        since: DateTime<Utc>,
    ) -> Result<Vec<EngagementSignal>, ExternalServiceError> {
        let url = match post.platform {
            Platform::Linkedin => format!(
                "{}/rest/socialActions/{}/comments",
                self.linkedin_base_url,
                encode(&post.post_id.0)
            ),
            Platform::Twitter => format!(
                "{}/2/tweets/{}/replies",
                self.twitter_base_url,
                encode(&post.post_id.0)
            ),
        };

        let response = self
            .http
            .get(url)
            .bearer_auth(self.token(post.platform))
            .query(&[("since", since.to_rfc3339())])
            .send()
            .await
            .map_err(request_error(Service::Social))?;

        let list: EngagementList = handle_response(Service::Social, response).await?;
        Ok(list
            .elements
            .into_iter()
            .filter(|s| s.occurred_at > since)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn linkedin_schedule_is_epoch_millis() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let request = LinkedinPostRequest {
            author: "urn:li:organization:1",
            commentary: "hello",
            visibility: "PUBLIC",
            lifecycle_state: "PUBLISHED",
            scheduled_publish_time: Some(at.timestamp_millis()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["scheduledPublishTime"], 1_704_186_000_000i64);
        assert_eq!(json["lifecycleState"], "PUBLISHED");
    }

    #[test]
    fn engagement_list_defaults_to_empty() {
        let list: EngagementList = serde_json::from_str("{}").unwrap();
        assert!(list.elements.is_empty());
    }
}
