//! Prospect domain entity
//!
//! A target company built from external enrichment data.
//! Prospects are never mutated after construction.

use serde::{Deserialize, Serialize};

/// A person inside a prospect company who can sign off on a purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMaker {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub profile_url: Option<String>,
}

/// A target company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub company_name: String,
    pub industry: String,
    pub employee_count: u32,
    #[serde(default)]
    pub decision_makers: Vec<DecisionMaker>,
    pub linkedin_url: String,
    #[serde(default)]
    pub estimated_revenue: Option<f64>,
}

impl Prospect {
    /// First known decision maker, used as the CRM person for the lead
    pub fn primary_contact(&self) -> Option<&DecisionMaker> {
        self.decision_makers.first()
    }
}

/// Title keywords that mark someone as able to make a purchasing decision
const DECISION_MAKER_TITLES: &[&str] = &[
    "ceo",
    "cfo",
    "coo",
    "cto",
    "chief",
    "founder",
    "owner",
    "president",
    "partner",
    "vp",
    "vice president",
    "director",
    "head of",
];

/// Whether a job title (e.g. a social profile headline) belongs to a decision maker
pub fn is_decision_maker_title(title: &str) -> bool {
    let title = title.to_lowercase();
    DECISION_MAKER_TITLES
        .iter()
        .any(|keyword| contains_word(&title, keyword))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
