//! Lead domain entities
//!
//! `LeadData` is the snapshot of a response handed to the CRM and the
//! nurture sequencer. `LeadRecord` is what routing reports back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LeadGrade, Platform, Response};
use crate::error::DomainError;

/// Lead data prepared from a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadData {
    pub company: String,
    pub industry: String,
    pub employee_count: u32,
    pub estimated_revenue: Option<f64>,
    pub linkedin_url: String,
    /// Upper-case interest level name, e.g. "HIGH"
    pub interest_level: String,
    pub initial_response: String,
    pub platform: Platform,
    pub response_time: DateTime<Utc>,
    pub decision_maker: bool,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
}

impl LeadData {
    /// Prepare lead data from a response. Pure: same input, same output.
    pub fn from_response(response: &Response) -> Self {
        let contact = response.prospect.primary_contact();
        Self {
            company: response.prospect.company_name.clone(),
            industry: response.prospect.industry.clone(),
            employee_count: response.prospect.employee_count,
            estimated_revenue: response.prospect.estimated_revenue,
            linkedin_url: response.prospect.linkedin_url.clone(),
            interest_level: response.interest_level.name().to_string(),
            initial_response: response.content.clone(),
            platform: response.platform,
            response_time: response.timestamp,
            decision_maker: response.is_decision_maker,
            contact_name: contact.map(|c| c.name.clone()),
            contact_title: contact.map(|c| c.title.clone()),
        }
    }

    /// Check the fields the CRM records are built from
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.company.trim().is_empty() {
            return Err(DomainError::Validation(
                "lead is missing a company name".to_string(),
            ));
        }
        if self.industry.trim().is_empty() {
            return Err(DomainError::Validation(format!(
                "lead '{}' is missing an industry",
                self.company
            )));
        }
        Ok(())
    }
}

/// Path a qualified lead was sent down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadRoute {
    /// Decision maker: CRM contact + SDR notification
    FastTrack,
    /// Everyone else: nurture sequence
    Nurture,
}

impl std::fmt::Display for LeadRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadRoute::FastTrack => write!(f, "fast_track"),
            LeadRoute::Nurture => write!(f, "nurture"),
        }
    }
}

/// A qualified lead after hand-off
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRecord {
    pub lead: LeadData,
    pub score: f64,
    pub grade: LeadGrade,
    pub route: LeadRoute,
    /// CRM person id on the fast track, deal id (= sequence id) on nurture
    pub crm_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{InterestLevel, Prospect};

    fn response() -> Response {
        Response {
            prospect: Prospect {
                company_name: "Corner Shop".to_string(),
                industry: "retail".to_string(),
                employee_count: 40,
                decision_makers: vec![],
                linkedin_url: "https://linkedin.com/company/corner-shop".to_string(),
                estimated_revenue: Some(1_500_000.0),
            },
            platform: Platform::Linkedin,
            content: "How do your fees compare?".to_string(),
            interest_level: InterestLevel::Medium,
            timestamp: Utc::now(),
            is_decision_maker: false,
        }
    }

    #[test]
    fn prepare_copies_fields() {
        let response = response();
        let lead = LeadData::from_response(&response);

        assert_eq!(lead.company, "Corner Shop");
        assert_eq!(lead.interest_level, "MEDIUM");
        assert_eq!(lead.response_time, response.timestamp);
        assert_eq!(lead.contact_name, None);
    }

    #[test]
    fn prepare_is_idempotent() {
        let response = response();
        assert_eq!(
            LeadData::from_response(&response),
            LeadData::from_response(&response)
        );
    }

    #[test]
    fn validate_rejects_missing_company() {
        let mut lead = LeadData::from_response(&response());
        lead.company = "  ".to_string();
        assert!(matches!(lead.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_missing_industry() {
        let mut lead = LeadData::from_response(&response());
        lead.industry = String::new();
        let err = lead.validate().unwrap_err().to_string();
        assert!(err.contains("missing an industry"));
    }
}
