use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::entities::{IntentTier, QualificationRules, ScoringWeights};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Bearer token for the protected routes; every protected request is
    /// rejected when unset
    pub api_token: Option<String>,
    /// Secret for verifying scheduler callbacks (HMAC-SHA256)
    pub scheduler_secret: Option<String>,
    pub crm: CrmConfig,
    pub completion: CompletionConfig,
    pub social: SocialConfig,
    pub enrichment: EnrichmentConfig,
    pub notifier: NotifierConfig,
    pub routing: RoutingConfig,
    pub monitor: MonitorConfig,
}

#[derive(Clone)]
pub struct CrmConfig {
    pub base_url: String,
    pub api_token: String,
}

#[derive(Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Clone)]
pub struct SocialConfig {
    pub linkedin_base_url: String,
    pub linkedin_token: String,
    pub linkedin_author: String,
    pub twitter_base_url: String,
    pub twitter_token: String,
}

#[derive(Clone)]
pub struct EnrichmentConfig {
    pub base_url: String,
    pub api_key: String,
    pub requests_per_hour: u32,
}

#[derive(Clone)]
pub struct NotifierConfig {
    pub webhook_url: String,
    pub sdr_email: String,
}

/// Router defaults applied to every lead routed by this process
#[derive(Clone, Debug, Default)]
pub struct RoutingConfig {
    pub rules: QualificationRules,
    pub default_intent_tier: IntentTier,
}

/// Bounds on engagement monitoring after a campaign posts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Default for MonitorConfig {
    /// Every 5 minutes for 48 hours
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            max_polls: 576,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional raw value, falling back to `default` when absent or malformed
fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "Ignoring unparseable configuration value");
            default
        }),
    }
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    parse_or(key, env::var(key).ok(), default)
}

/// Parse a scoring weight; anything outside [0, 1] (including NaN) falls back
fn weight_or(key: &str, raw: Option<String>, default: f64) -> f64 {
    let weight = parse_or(key, raw, default);
    if (0.0..=1.0).contains(&weight) {
        weight
    } else {
        tracing::warn!(key, weight, "Ignoring scoring weight outside [0, 1]");
        default
    }
}

fn weight_var(key: &str, default: f64) -> f64 {
    weight_or(key, env::var(key).ok(), default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let default_weights = ScoringWeights::default();
        let weights = ScoringWeights {
            interest_level: weight_var("LEAD_WEIGHT_INTEREST", default_weights.interest_level),
            company_size: weight_var("LEAD_WEIGHT_COMPANY_SIZE", default_weights.company_size),
            decision_maker: weight_var(
                "LEAD_WEIGHT_DECISION_MAKER",
                default_weights.decision_maker,
            ),
        };
        let default_monitor = MonitorConfig::default();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: parsed_var("PORT", 8080),
            api_token: env::var("API_TOKEN").ok(),
            scheduler_secret: env::var("SCHEDULER_SECRET").ok(),
            crm: CrmConfig {
                base_url: var_or("PIPEDRIVE_URL", "https://api.pipedrive.com/v1"),
                api_token: env::var("PIPEDRIVE_API_TOKEN").unwrap_or_default(),
            },
            completion: CompletionConfig {
                base_url: var_or("OPENAI_URL", "https://api.openai.com/v1"),
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                model: var_or("OPENAI_MODEL", "gpt-4"),
            },
            social: SocialConfig {
                linkedin_base_url: var_or("LINKEDIN_URL", "https://api.linkedin.com"),
                linkedin_token: env::var("LINKEDIN_TOKEN").unwrap_or_default(),
                linkedin_author: env::var("LINKEDIN_AUTHOR_URN").unwrap_or_default(),
                twitter_base_url: var_or("TWITTER_URL", "https://api.twitter.com"),
                twitter_token: env::var("TWITTER_TOKEN").unwrap_or_default(),
            },
            enrichment: EnrichmentConfig {
                base_url: var_or("ENRICHMENT_URL", "http://localhost:9000"),
                api_key: env::var("ENRICHMENT_API_KEY").unwrap_or_default(),
                requests_per_hour: parsed_var("ENRICHMENT_REQUESTS_PER_HOUR", 100),
            },
            notifier: NotifierConfig {
                webhook_url: var_or("SDR_WEBHOOK_URL", "http://localhost:9001/notify"),
                sdr_email: var_or("SDR_EMAIL", "sdr@example.com"),
            },
            routing: RoutingConfig {
                rules: QualificationRules {
                    weights,
                    ..Default::default()
                },
                default_intent_tier: parsed_var("DEFAULT_INTENT_TIER", IntentTier::default()),
            },
            monitor: MonitorConfig {
                poll_interval: Duration::from_secs(parsed_var(
                    "MONITOR_POLL_INTERVAL_SECS",
                    default_monitor.poll_interval.as_secs(),
                )),
                max_polls: parsed_var("MONITOR_MAX_POLLS", default_monitor.max_polls),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_uses_default_when_missing() {
        assert_eq!(parse_or("PORT", None, 8080u16), 8080);
    }

    #[test]
    fn parse_or_parses_present_values() {
        assert_eq!(parse_or("PORT", Some(" 9090 ".to_string()), 8080u16), 9090);
        assert_eq!(
            parse_or(
                "DEFAULT_INTENT_TIER",
                Some("low_intent".to_string()),
                IntentTier::default()
            ),
            IntentTier::LowIntent
        );
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("LEAD_WEIGHT_INTEREST", Some("lots".to_string()), 0.4), 0.4);
    }

    #[test]
    fn weight_or_rejects_values_outside_unit_range() {
        for raw in ["NaN", "inf", "-0.2", "1.5"] {
            assert_eq!(
                weight_or("LEAD_WEIGHT_INTEREST", Some(raw.to_string()), 0.4),
                0.4,
                "{}",
                raw
            );
        }
        assert_eq!(
            weight_or("LEAD_WEIGHT_INTEREST", Some("0.5".to_string()), 0.4),
            0.5
        );
        assert_eq!(weight_or("LEAD_WEIGHT_INTEREST", Some("0".to_string()), 0.4), 0.0);
    }

    #[test]
    fn monitor_default_spans_two_days() {
        let monitor = MonitorConfig::default();
        assert_eq!(
            monitor.poll_interval * monitor.max_polls,
            Duration::from_secs(48 * 60 * 60)
        );
    }
}
