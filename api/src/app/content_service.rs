//! Content service
//!
//! Generates industry-specific social posts through the completion API and
//! normalizes them for each platform.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use regex::{Captures, Regex};
use serde::Deserialize;

use super::nurture_config::{DEFAULT_POST_COUNT, DEFAULT_VALUE_PROP};
use crate::domain::entities::{IndustryProfile, Platform};
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::error::{AppError, DomainError, ExternalServiceError, Service};

const SYSTEM_PROMPT: &str = "You are an expert B2B payment processing copywriter.";
const TEMPERATURE: f32 = 0.7;
const UTM_CAMPAIGN: &str = "payment_processing";

/// Posts keyed by platform
pub type GeneratedPosts = BTreeMap<Platform, Vec<String>>;

/// What to generate
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostRequest {
    pub industry: String,
    #[serde(default)]
    pub custom_pain_points: Vec<String>,
    #[serde(default = "default_value_prop")]
    pub value_prop: String,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<Platform>,
    #[serde(default = "default_post_count")]
    pub post_count: u32,
    /// Optional angle for the copy, e.g. a nurture step's template id
    #[serde(default)]
    pub theme: Option<String>,
}

fn default_value_prop() -> String {
    DEFAULT_VALUE_PROP.to_string()
}

fn default_platforms() -> Vec<Platform> {
    Platform::ALL.to_vec()
}

fn default_post_count() -> u32 {
    DEFAULT_POST_COUNT
}

impl PostRequest {
    pub fn new(industry: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            custom_pain_points: Vec::new(),
            value_prop: default_value_prop(),
            platforms: default_platforms(),
            post_count: default_post_count(),
            theme: None,
        }
    }
}

pub struct ContentService<C>
where
    C: CompletionClient,
{
    completion: Arc<C>,
}

impl<C> ContentService<C>
where
    C: CompletionClient,
{
    pub fn new(completion: Arc<C>) -> Self {
        Self { completion }
    }

    /// Generate `post_count` posts for every requested platform
    pub async fn create_industry_posts(
        &self,
        request: &PostRequest,
    ) -> Result<GeneratedPosts, AppError> {
        if request.post_count == 0 {
            return Err(DomainError::Validation("post_count must be at least 1".to_string()).into());
        }
        if request.platforms.is_empty() {
            return Err(
                DomainError::Validation("at least one platform is required".to_string()).into(),
            );
        }

        let profile = IndustryProfile::for_industry(&request.industry)?;
        let pain_points = profile.pain_points_with(&request.custom_pain_points);

        let mut generated = GeneratedPosts::new();
        for &platform in &request.platforms {
            if generated.contains_key(&platform) {
                continue;
            }

            let posts = self
                .generate_for_platform(profile, platform, &pain_points, request)
                .await
                .map_err(|e| {
                    tracing::error!(
                        industry = %request.industry,
                        %platform,
                        error = %e,
                        "Error generating content"
                    );
                    e
                })?;
            generated.insert(platform, posts);
        }

        Ok(generated)
    }

    async fn generate_for_platform(
        &self,
        profile: &IndustryProfile,
        platform: Platform,
        pain_points: &[String],
        request: &PostRequest,
    ) -> Result<Vec<String>, ExternalServiceError> {
        let max_length = profile.target_length(platform);
        let completion = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_prompt(
                profile,
                platform,
                pain_points,
                &request.value_prop,
                request.theme.as_deref(),
            ),
            n: request.post_count,
            max_tokens: max_length as u32,
            temperature: TEMPERATURE,
        };

        let choices = self.completion.complete(&completion).await?;
        let wanted = request.post_count as usize;
        if choices.len() < wanted {
            return Err(ExternalServiceError::Deserialization {
                service: Service::Completion,
                message: format!("expected {} choices, got {}", wanted, choices.len()),
            });
        }

        let posts: Vec<String> = choices
            .iter()
            .take(wanted)
            .map(|text| post_process(text, platform))
            .collect();

        tracing::info!(
            industry = profile.industry,
            %platform,
            count = posts.len(),
            "Generated posts"
        );
        Ok(posts)
    }
}

fn build_prompt(
    profile: &IndustryProfile,
    platform: Platform,
    pain_points: &[String],
    value_prop: &str,
    theme: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Create a {platform} post for {industry} businesses about payment processing solutions.\n\n\
         Key points to include:\n\
         - Main value proposition: {value_prop}\n\
         - Address these pain points: {pain_points}\n",
        platform = platform,
        industry = profile.industry,
        value_prop = value_prop,
        pain_points = pain_points.join(", "),
    );
    if let Some(theme) = theme {
        prompt.push_str(&format!("- Angle: {}\n", theme.replace('_', " ")));
    }
    prompt.push_str(&format!(
        "\nRequirements:\n\
         - Use a {tone} tone\n\
         - Maximum length: {max_length} characters\n\
         - Include relevant hashtags for {platform}\n\
         - Focus on ROI and cost savings\n\
         - Include a clear call to action\n",
        tone = profile.tone,
        max_length = profile.target_length(platform),
        platform = platform,
    ));
    prompt
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("static regex"))
}

/// Tag every http(s) URL with UTM parameters for `platform`
pub fn add_tracking_parameters(text: &str, platform: Platform) -> String {
    url_pattern()
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            // Sentence punctuation after a link is not part of it
            let url = matched.trim_end_matches(&['.', ',', '!', '?', ';', ':', ')'][..]);
            let trailing = &matched[url.len()..];
            let separator = if url.contains('?') { '&' } else { '?' };
            format!(
                "{url}{separator}utm_source={platform}&utm_medium=social&utm_campaign={UTM_CAMPAIGN}{trailing}"
            )
        })
        .into_owned()
}

/// Cut to at most `limit` characters, ending in "..." when shortened
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Collapse whitespace, tag links, then enforce the platform's hard limit
pub fn post_process(text: &str, platform: Platform) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let tagged = add_tracking_parameters(&collapsed, platform);
    truncate_chars(&tagged, platform.char_limit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockCompletionClient;

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            post_process("  Save   more\n\non fees  ", Platform::Linkedin),
            "Save more on fees"
        );
    }

    #[test]
    fn urls_get_utm_parameters() {
        let tagged = add_tracking_parameters(
            "See https://example.com/pricing. Or http://x.io/a?ref=1",
            Platform::Twitter,
        );
        assert_eq!(
            tagged,
            "See https://example.com/pricing?utm_source=twitter&utm_medium=social&utm_campaign=payment_processing. \
             Or http://x.io/a?ref=1&utm_source=twitter&utm_medium=social&utm_campaign=payment_processing"
        );
    }

    #[test]
    fn text_without_urls_is_unchanged() {
        assert_eq!(
            add_tracking_parameters("No links here", Platform::Linkedin),
            "No links here"
        );
    }

    #[test]
    fn truncation_counts_characters() {
        let text = "é".repeat(300);
        let cut = truncate_chars(&text, 280);
        assert_eq!(cut.chars().count(), 280);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_chars("short", 280), "short");
    }

    #[test]
    fn twitter_limit_holds_after_tagging() {
        let text = format!("{} https://example.com/offer", "word ".repeat(60));
        let post = post_process(&text, Platform::Twitter);
        assert!(post.chars().count() <= 280);
    }

    #[test]
    fn prompt_mentions_theme_and_pain_points() {
        let profile = IndustryProfile::for_industry("retail").unwrap();
        let pain_points = profile.pain_points_with(&["Chargeback disputes".to_string()]);
        let prompt = build_prompt(
            profile,
            Platform::Linkedin,
            &pain_points,
            "30% cost reduction",
            Some("industry_specific"),
        );

        assert!(prompt.contains("Create a linkedin post for retail businesses"));
        assert!(prompt.contains("Chargeback disputes"));
        assert!(prompt.contains("Angle: industry specific"));
        assert!(prompt.contains("Maximum length: 1200 characters"));
    }

    #[tokio::test]
    async fn one_completion_call_per_platform() {
        let completion = Arc::new(MockCompletionClient::new());
        let service = ContentService::new(completion.clone());

        let posts = service
            .create_industry_posts(&PostRequest::new("hospitality"))
            .await
            .unwrap();

        assert_eq!(posts.len(), 2);
        assert!(posts.values().all(|p| p.len() == 5));
        let requests = completion.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.n == 5));
    }

    #[tokio::test]
    async fn unknown_industry_is_rejected_before_any_call() {
        let completion = Arc::new(MockCompletionClient::new());
        let service = ContentService::new(completion.clone());

        let result = service
            .create_industry_posts(&PostRequest::new("aerospace"))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Configuration(_)))
        ));
        assert!(completion.requests().is_empty());
    }

    #[tokio::test]
    async fn too_few_choices_is_an_external_error() {
        let completion = Arc::new(MockCompletionClient::new().with_max_choices(2));
        let service = ContentService::new(completion);

        let result = service
            .create_industry_posts(&PostRequest::new("retail"))
            .await;

        assert!(matches!(result, Err(AppError::External(_))));
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        let service = ContentService::new(Arc::new(MockCompletionClient::failing()));

        let result = service
            .create_industry_posts(&PostRequest::new("hospitality"))
            .await;

        assert!(matches!(result, Err(AppError::External(_))));
    }

    #[tokio::test]
    async fn zero_posts_is_a_validation_error() {
        let service = ContentService::new(Arc::new(MockCompletionClient::new()));
        let request = PostRequest {
            post_count: 0,
            ..PostRequest::new("retail")
        };

        assert!(matches!(
            service.create_industry_posts(&request).await,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
    }

    #[test]
    fn request_defaults_from_json() {
        let request: PostRequest = serde_json::from_str(r#"{"industry": "retail"}"#).unwrap();
        assert_eq!(request, PostRequest::new("retail"));
    }
}
