//! CRM client port trait
//!
//! Defines the records this service writes to the CRM. The CRM is
//! write-only from here: every call creates a record and returns its id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{expected_deal_value, DealId, LeadData, Platform};
use crate::error::ExternalServiceError;

/// Organization record for a lead's company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrganization {
    pub name: String,
    pub industry: String,
    pub employee_count: u32,
    pub estimated_revenue: Option<f64>,
    pub linkedin_url: String,
}

impl NewOrganization {
    pub fn from_lead(lead: &LeadData) -> Self {
        Self {
            name: lead.company.clone(),
            industry: lead.industry.clone(),
            employee_count: lead.employee_count,
            estimated_revenue: lead.estimated_revenue,
            linkedin_url: lead.linkedin_url.clone(),
        }
    }
}

/// Person record; linked to an organization when one was created first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPerson {
    pub name: String,
    pub org_id: Option<i64>,
    pub company: String,
    pub title: Option<String>,
    pub linkedin_url: String,
    pub interest_level: String,
    pub source_platform: Platform,
}

impl NewPerson {
    pub fn from_lead(lead: &LeadData, org_id: Option<i64>) -> Self {
        Self {
            name: lead
                .contact_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            org_id,
            company: lead.company.clone(),
            title: lead.contact_title.clone(),
            linkedin_url: lead.linkedin_url.clone(),
            interest_level: lead.interest_level.clone(),
            source_platform: lead.platform,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDeal {
    pub title: String,
    pub person_id: i64,
    pub org_id: i64,
    pub expected_value: f64,
    pub lead_source: Platform,
    pub initial_interest: String,
    pub response_content: String,
}

impl NewDeal {
    pub fn for_lead(lead: &LeadData, person_id: i64, org_id: i64) -> Self {
        Self {
            title: format!("Payment Processing Solution - {}", lead.company),
            person_id,
            org_id,
            expected_value: expected_deal_value(lead.employee_count, &lead.industry),
            lead_source: lead.platform,
            initial_interest: lead.interest_level.clone(),
            response_content: lead.initial_response.clone(),
        }
    }
}

/// A task on a deal, due at a specific time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewActivity {
    pub deal_id: DealId,
    pub activity_type: String,
    pub subject: String,
    pub due_at: DateTime<Utc>,
}

#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Create an organization, returning its id
    async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> Result<i64, ExternalServiceError>;

    /// Create a person, returning its id
    async fn create_person(&self, person: &NewPerson) -> Result<i64, ExternalServiceError>;

    /// Create a deal linked to a person and organization
    async fn create_deal(&self, deal: &NewDeal) -> Result<DealId, ExternalServiceError>;

    /// Pin a note to a deal, returning the note id
    async fn add_note(&self, deal_id: DealId, content: &str) -> Result<i64, ExternalServiceError>;

    /// Create an activity, returning its id
    async fn create_activity(&self, activity: &NewActivity) -> Result<i64, ExternalServiceError>;
}
