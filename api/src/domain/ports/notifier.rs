//! Sales notification port trait

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::LeadData;
use crate::error::ExternalServiceError;

/// Message telling the SDR team a lead was fast-tracked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdrNotification {
    pub sdr_email: String,
    pub crm_person_id: i64,
    pub score: f64,
    pub lead: LeadData,
}

#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, notification: &SdrNotification) -> Result<(), ExternalServiceError>;
}
