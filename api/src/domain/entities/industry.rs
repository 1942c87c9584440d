//! Industry content profiles
//!
//! Default pain points, tone and target post length per supported industry.

use super::Platform;
use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryProfile {
    pub industry: &'static str,
    pub pain_points: &'static [&'static str],
    pub tone: &'static str,
    pub linkedin_length: usize,
    pub twitter_length: usize,
}

static PROFILES: [IndustryProfile; 2] = [
    IndustryProfile {
        industry: "retail",
        pain_points: &[
            "High transaction fees eating into margins",
            "Complex pricing structures",
            "Long settlement times",
            "Integration difficulties with POS systems",
        ],
        tone: "professional yet approachable",
        linkedin_length: 1200,
        twitter_length: 280,
    },
    IndustryProfile {
        industry: "hospitality",
        pain_points: &[
            "Customer card decline rates",
            "International payment processing fees",
            "Integration with booking systems",
            "Seasonal cash flow management",
        ],
        tone: "friendly and solution-focused",
        linkedin_length: 1000,
        twitter_length: 280,
    },
];

impl IndustryProfile {
    /// Look up a profile by industry name (case-insensitive)
    pub fn for_industry(industry: &str) -> Result<&'static IndustryProfile, DomainError> {
        let wanted = industry.trim().to_lowercase();
        PROFILES
            .iter()
            .find(|p| p.industry == wanted)
            .ok_or_else(|| {
                DomainError::Configuration(format!(
                    "No content profile for industry: {}. Supported: {}",
                    industry,
                    supported_industries().join(", ")
                ))
            })
    }

    /// Length the prompt asks the model to stay within
    pub fn target_length(&self, platform: Platform) -> usize {
        match platform {
            Platform::Linkedin => self.linkedin_length,
            Platform::Twitter => self.twitter_length,
        }
    }

    /// Defaults followed by the extra pain points, without touching the profile
    pub fn pain_points_with(&self, extra: &[String]) -> Vec<String> {
        self.pain_points
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().cloned())
            .collect()
    }
}

pub fn supported_industries() -> Vec<&'static str> {
    PROFILES.iter().map(|p| p.industry).collect()
}
