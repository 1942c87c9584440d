//! Company enrichment client
//!
//! Search and lookup against a JSON enrichment API, spending from an hourly
//! request budget. An exhausted budget surfaces as `RateLimited` rather than
//! blocking the caller until the window resets.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;

use crate::adapters::http::{handle_response, request_error};
use crate::domain::entities::Prospect;
use crate::domain::ports::{ProspectFilters, ProspectPage, ProspectSource};
use crate::error::{ExternalServiceError, Service};

const BUDGET_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Fixed-window request counter
#[derive(Debug)]
pub struct RequestBudget {
    limit: u32,
    used: u32,
    window_start: Instant,
}

impl RequestBudget {
    pub fn new(limit: u32, now: Instant) -> Self {
        Self {
            limit,
            used: 0,
            window_start: now,
        }
    }

    /// Spend one request; false when the current window is exhausted
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if now.duration_since(self.window_start) >= BUDGET_WINDOW {
            self.window_start = now;
            self.used = 0;
        }
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }
}

pub struct EnrichmentClient {
    http: Client,
    base_url: String,
    api_key: String,
    budget: Mutex<RequestBudget>,
}

impl EnrichmentClient {
    pub fn new(base_url: String, api_key: String, requests_per_hour: u32) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            budget: Mutex::new(RequestBudget::new(requests_per_hour, Instant::now())),
        }
    }

    async fn acquire(&self) -> Result<(), ExternalServiceError> {
        if self.budget.lock().await.try_acquire(Instant::now()) {
            Ok(())
        } else {
            tracing::warn!("Enrichment request budget exhausted for this hour");
            Err(ExternalServiceError::RateLimited {
                service: Service::ProspectSource,
            })
        }
    }
}

fn search_query(filters: &ProspectFilters, cursor: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("keywords", filters.keywords.clone())];
    if !filters.industries.is_empty() {
        query.push(("industries", filters.industries.join(",")));
    }
    if !filters.locations.is_empty() {
        query.push(("locations", filters.locations.join(",")));
    }
    if let Some(size) = &filters.company_size {
        query.push(("company_size", size.clone()));
    }
    if let Some(cursor) = cursor {
        query.push(("cursor", cursor.to_string()));
    }
    query
}

#[async_trait]
impl ProspectSource for EnrichmentClient {
    async fn search_page(
        &self,
        filters: &ProspectFilters,
        cursor: Option<&str>,
    ) -> Result<ProspectPage, ExternalServiceError> {
        self.acquire().await?;

        let response = self
            .http
            .get(format!("{}/companies/search", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&search_query(filters, cursor))
            .send()
            .await
            .map_err(request_error(Service::ProspectSource))?;

        handle_response(Service::ProspectSource, response).await
    }

    async fn lookup_company(&self, name: &str) -> Result<Option<Prospect>, ExternalServiceError> {
        self.acquire().await?;

        let response = self
            .http
            .get(format!("{}/companies/lookup", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(request_error(Service::ProspectSource))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        handle_response(Service::ProspectSource, response)
            .await
            .map(Some)
    }
}
