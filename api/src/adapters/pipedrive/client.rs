//! Pipedrive CRM client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{handle_response, request_error};
use crate::domain::entities::DealId;
use crate::domain::ports::{CrmClient, NewActivity, NewDeal, NewOrganization, NewPerson};
use crate::error::{ExternalServiceError, Service};

/// Records are visible to the entire company
const VISIBLE_TO_COMPANY: u8 = 3;
/// Pipeline stage new deals start in
const INITIAL_STAGE_ID: i64 = 1;
const ACTIVITY_DURATION: &str = "00:30";

/// Implementation of the CRM client against the Pipedrive REST API
pub struct PipedriveClient {
    http: Client,
    base_url: String,
    api_token: String,
}

impl PipedriveClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// POST a record and return the id from the `{success, data: {id}}` envelope
    async fn create<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<i64, ExternalServiceError> {
        let response = self
            .http
            .post(self.api_url(endpoint))
            .query(&[("api_token", self.api_token.as_str())])
            .json(body)
            .send()
            .await
            .map_err(request_error(Service::Crm))?;

        let envelope: Envelope = handle_response(Service::Crm, response).await?;
        match envelope {
            Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data.id),
            Envelope { error, .. } => Err(ExternalServiceError::Api {
                service: Service::Crm,
                status: 200,
                message: error.unwrap_or_else(|| format!("{} returned no record", endpoint)),
            }),
        }
    }
}

/// Response envelope shared by every Pipedrive endpoint
#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<CreatedRecord>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct CreatedRecord {
    id: i64,
}

/// Request types for the Pipedrive API
#[derive(Serialize)]
struct CreateOrganizationRequest<'a> {
    name: &'a str,
    visible_to: u8,
    custom_fields: OrganizationFields<'a>,
}

#[derive(Serialize)]
struct OrganizationFields<'a> {
    industry: &'a str,
    employee_count: u32,
    estimated_revenue: f64,
    linkedin_company_url: &'a str,
}

#[derive(Serialize)]
struct CreatePersonRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    org_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_title: Option<&'a str>,
    visible_to: u8,
    custom_fields: PersonFields<'a>,
}

#[derive(Serialize)]
struct PersonFields<'a> {
    linkedin_url: &'a str,
    interest_level: &'a str,
    source_platform: String,
}

#[derive(Serialize)]
struct CreateDealRequest<'a> {
    title: &'a str,
    person_id: i64,
    org_id: i64,
    stage_id: i64,
    visible_to: u8,
    expected_value: f64,
    custom_fields: DealFields<'a>,
}

#[derive(Serialize)]
struct DealFields<'a> {
    lead_source: String,
    initial_interest: &'a str,
    response_content: &'a str,
}

#[derive(Serialize)]
struct CreateNoteRequest<'a> {
    deal_id: i64,
    content: &'a str,
    pinned_to_deal_flag: u8,
}

#[derive(Serialize)]
struct CreateActivityRequest<'a> {
    deal_id: i64,
    subject: &'a str,
    #[serde(rename = "type")]
    activity_type: &'a str,
    due_date: String,
    due_time: String,
    duration: &'a str,
}

impl<'a> From<&'a NewActivity> for CreateActivityRequest<'a> {
    fn from(activity: &'a NewActivity) -> Self {
        Self {
            deal_id: activity.deal_id.0,
            subject: &activity.subject,
            activity_type: &activity.activity_type,
            due_date: activity.due_at.format("%Y-%m-%d").to_string(),
            due_time: activity.due_at.format("%H:%M").to_string(),
            duration: ACTIVITY_DURATION,
        }
    }
}

#[async_trait]
impl CrmClient for PipedriveClient {
    async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> Result<i64, ExternalServiceError> {
        let request = CreateOrganizationRequest {
            name: &organization.name,
            visible_to: VISIBLE_TO_COMPANY,
            custom_fields: OrganizationFields {
                industry: &organization.industry,
                employee_count: organization.employee_count,
                estimated_revenue: organization.estimated_revenue.unwrap_or(0.0),
                linkedin_company_url: &organization.linkedin_url,
            },
        };
        self.create("organizations", &request).await
    }

    async fn create_person(&self, person: &NewPerson) -> Result<i64, ExternalServiceError> {
        let request = CreatePersonRequest {
            name: &person.name,
            org_id: person.org_id,
            job_title: person.title.as_deref(),
            visible_to: VISIBLE_TO_COMPANY,
            custom_fields: PersonFields {
                linkedin_url: &person.linkedin_url,
                interest_level: &person.interest_level,
                source_platform: person.source_platform.to_string(),
            },
        };
        self.create("persons", &request).await
    }

    async fn create_deal(&self, deal: &NewDeal) -> Result<DealId, ExternalServiceError> {
        let request = CreateDealRequest {
            title: &deal.title,
            person_id: deal.person_id,
            org_id: deal.org_id,
            stage_id: INITIAL_STAGE_ID,
            visible_to: VISIBLE_TO_COMPANY,
            expected_value: deal.expected_value,
            custom_fields: DealFields {
                lead_source: deal.lead_source.to_string(),
                initial_interest: &deal.initial_interest,
                response_content: &deal.response_content,
            },
        };
        self.create("deals", &request).await.map(DealId)
    }

    async fn add_note(&self, deal_id: DealId, content: &str) -> Result<i64, ExternalServiceError> {
        let request = CreateNoteRequest {
            deal_id: deal_id.0,
            content,
            pinned_to_deal_flag: 1,
        };
        self.create("notes", &request).await
    }

    async fn create_activity(&self, activity: &NewActivity) -> Result<i64, ExternalServiceError> {
        self.create("activities", &CreateActivityRequest::from(activity))
            .await
    }
}
