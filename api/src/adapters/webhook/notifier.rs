//! SDR notification over a JSON webhook (e.g. a chat or email relay)

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::adapters::http::{handle_empty_response, request_error};
use crate::domain::ports::{LeadNotifier, SdrNotification};
use crate::error::{ExternalServiceError, Service};

pub struct WebhookNotifier {
    http: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }
}

#[derive(Serialize)]
struct NotificationPayload<'a> {
    to: &'a str,
    subject: String,
    text: String,
    #[serde(flatten)]
    notification: &'a SdrNotification,
}

impl<'a> From<&'a SdrNotification> for NotificationPayload<'a> {
    fn from(notification: &'a SdrNotification) -> Self {
        let lead = &notification.lead;
        Self {
            to: &notification.sdr_email,
            subject: format!("New qualified lead: {}", lead.company),
            text: format!(
                "{} ({}, {} employees) responded on {} with {} interest (score {:.2}). CRM person #{}.",
                lead.contact_name.as_deref().unwrap_or(&lead.company),
                lead.industry,
                lead.employee_count,
                lead.platform,
                lead.interest_level,
                notification.score,
                notification.crm_person_id
            ),
            notification,
        }
    }
}

#[async_trait]
impl LeadNotifier for WebhookNotifier {
    async fn notify(&self, notification: &SdrNotification) -> Result<(), ExternalServiceError> {
        let response = self
            .http
            .post(&self.url)
            .json(&NotificationPayload::from(notification))
            .send()
            .await
            .map_err(request_error(Service::Notifier))?;

        handle_empty_response(Service::Notifier, response).await
    }
}
