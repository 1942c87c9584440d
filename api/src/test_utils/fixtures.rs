//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture returns a valid value that tests tweak as needed.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{
    DealId, DecisionMaker, IntentTier, InterestLevel, LeadData, NurtureSequence, Platform,
    Prospect, Response,
};
use crate::domain::ports::{EngagementSignal, PostId, PostedContent};

/// A retail prospect with no known decision makers
pub fn test_prospect(name: &str, employee_count: u32) -> Prospect {
    Prospect {
        company_name: name.to_string(),
        industry: "retail".to_string(),
        employee_count,
        decision_makers: Vec::new(),
        linkedin_url: format!(
            "https://linkedin.com/company/{}",
            name.to_lowercase().replace(' ', "-")
        ),
        estimated_revenue: Some(2_000_000.0),
    }
}

/// A response from "Corner Shop" with the given scoring inputs
pub fn test_response(
    interest_level: InterestLevel,
    employee_count: u32,
    is_decision_maker: bool,
) -> Response {
    let mut prospect = test_prospect("Corner Shop", employee_count);
    prospect.decision_makers = vec![DecisionMaker {
        name: "Dana Reyes".to_string(),
        title: "Owner".to_string(),
        profile_url: None,
    }];

    Response {
        prospect,
        platform: Platform::Linkedin,
        content: "How do your rates compare to what we pay now?".to_string(),
        interest_level,
        timestamp: Utc::now(),
        is_decision_maker,
    }
}

/// Lead data for a 40-person retail shop
pub fn test_lead() -> LeadData {
    LeadData {
        company: "Corner Shop".to_string(),
        industry: "retail".to_string(),
        employee_count: 40,
        estimated_revenue: Some(1_500_000.0),
        linkedin_url: "https://linkedin.com/company/corner-shop".to_string(),
        interest_level: "MEDIUM".to_string(),
        initial_response: "How do your rates compare?".to_string(),
        platform: Platform::Linkedin,
        response_time: Utc::now(),
        decision_maker: false,
        contact_name: Some("Dana Reyes".to_string()),
        contact_title: Some("Store Manager".to_string()),
    }
}

/// Active sequence for deal 1, started now
pub fn test_sequence(intent_tier: IntentTier) -> NurtureSequence {
    test_sequence_started_at(intent_tier, Utc::now())
}

pub fn test_sequence_started_at(intent_tier: IntentTier, started_at: DateTime<Utc>) -> NurtureSequence {
    NurtureSequence::start(DealId(1), intent_tier, &test_lead(), started_at)
}

/// A post published an hour ago
pub fn test_posted_content(platform: Platform, post_id: &str) -> PostedContent {
    PostedContent {
        platform,
        post_id: PostId(post_id.to_string()),
        content: "Cut your card processing costs by 30%".to_string(),
        scheduled_at: Utc::now() - Duration::hours(1),
    }
}

pub fn test_signal(
    post_id: &str,
    author_name: &str,
    author_title: Option<&str>,
    company_name: Option<&str>,
    text: &str,
    occurred_at: DateTime<Utc>,
) -> EngagementSignal {
    EngagementSignal {
        post_id: PostId(post_id.to_string()),
        author_name: author_name.to_string(),
        author_title: author_title.map(str::to_string),
        company_name: company_name.map(str::to_string),
        text: text.to_string(),
        occurred_at,
    }
}
