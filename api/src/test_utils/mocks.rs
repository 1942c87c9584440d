//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They record every call so tests can verify side effects.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::app::SequenceStarter;
use crate::domain::entities::{
    DealId, IntentTier, LeadData, NurtureSequence, Platform, Prospect,
};
use crate::domain::ports::{
    CompletionClient, CompletionRequest, CrmClient, EngagementSignal, LeadNotifier, NewActivity,
    NewDeal, NewOrganization, NewPerson, PostId, PostedContent, ProspectFilters, ProspectPage,
    ProspectSource, SdrNotification, SequenceRepository, SocialPoster,
};
use crate::error::{AppError, DomainError, ExternalServiceError, Service};

fn mock_failure(service: Service) -> ExternalServiceError {
    ExternalServiceError::Api {
        service,
        status: 500,
        message: "Mock failure".to_string(),
    }
}

// ============================================================================
// In-Memory Sequence Repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySequenceRepository {
    sequences: Arc<RwLock<HashMap<DealId, NurtureSequence>>>,
}

impl InMemorySequenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a sequence for testing
    pub fn with_sequence(self, sequence: NurtureSequence) -> Self {
        self.sequences
            .write()
            .unwrap()
            .insert(sequence.id, sequence);
        self
    }

    pub fn count(&self) -> usize {
        self.sequences.read().unwrap().len()
    }
}

#[async_trait]
impl SequenceRepository for InMemorySequenceRepository {
    async fn find_by_id(&self, id: &DealId) -> Result<Option<NurtureSequence>, DomainError> {
        Ok(self.sequences.read().unwrap().get(id).cloned())
    }

    async fn save(&self, sequence: &NurtureSequence) -> Result<(), DomainError> {
        self.sequences
            .write()
            .unwrap()
            .insert(sequence.id, sequence.clone());
        Ok(())
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<NurtureSequence>, DomainError> {
        let sequences = self.sequences.read().unwrap();
        let mut due: Vec<NurtureSequence> = sequences
            .values()
            .filter(|s| s.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|s| s.next_run_at());
        due.truncate(limit as usize);
        Ok(due)
    }
}

// ============================================================================
// Mock CRM Client
// ============================================================================

/// Records every CRM write and hands out sequential ids
#[derive(Default)]
pub struct MockCrmClient {
    organizations: Arc<RwLock<Vec<NewOrganization>>>,
    persons: Arc<RwLock<Vec<NewPerson>>>,
    deals: Arc<RwLock<Vec<NewDeal>>>,
    notes: Arc<RwLock<Vec<(DealId, String)>>>,
    activities: Arc<RwLock<Vec<NewActivity>>>,
    calls: Arc<RwLock<usize>>,
    /// Calls succeed until this many have been made
    fail_after: Option<usize>,
}

impl MockCrmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self::new().fail_after(0)
    }

    /// Let `n` calls succeed, then fail every later one
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn organizations(&self) -> Vec<NewOrganization> {
        self.organizations.read().unwrap().clone()
    }

    pub fn persons(&self) -> Vec<NewPerson> {
        self.persons.read().unwrap().clone()
    }

    pub fn deals(&self) -> Vec<NewDeal> {
        self.deals.read().unwrap().clone()
    }

    pub fn notes(&self) -> Vec<(DealId, String)> {
        self.notes.read().unwrap().clone()
    }

    pub fn activities(&self) -> Vec<NewActivity> {
        self.activities.read().unwrap().clone()
    }

    /// Number of successful calls
    pub fn call_count(&self) -> usize {
        *self.calls.read().unwrap()
    }

    /// Count the call and return its id, or fail past the limit
    fn next_id(&self) -> Result<i64, ExternalServiceError> {
        let mut calls = self.calls.write().unwrap();
        if self.fail_after.is_some_and(|limit| *calls >= limit) {
            return Err(mock_failure(Service::Crm));
        }
        *calls += 1;
        Ok(100 + *calls as i64)
    }
}

#[async_trait]
impl CrmClient for MockCrmClient {
    async fn create_organization(
        &self,
        organization: &NewOrganization,
    ) -> Result<i64, ExternalServiceError> {
        let id = self.next_id()?;
        self.organizations
            .write()
            .unwrap()
            .push(organization.clone());
        Ok(id)
    }

    async fn create_person(&self, person: &NewPerson) -> Result<i64, ExternalServiceError> {
        let id = self.next_id()?;
        self.persons.write().unwrap().push(person.clone());
        Ok(id)
    }

    async fn create_deal(&self, deal: &NewDeal) -> Result<DealId, ExternalServiceError> {
        let id = self.next_id()?;
        self.deals.write().unwrap().push(deal.clone());
        Ok(DealId(id))
    }

    async fn add_note(&self, deal_id: DealId, content: &str) -> Result<i64, ExternalServiceError> {
        let id = self.next_id()?;
        self.notes
            .write()
            .unwrap()
            .push((deal_id, content.to_string()));
        Ok(id)
    }

    async fn create_activity(&self, activity: &NewActivity) -> Result<i64, ExternalServiceError> {
        let id = self.next_id()?;
        self.activities.write().unwrap().push(activity.clone());
        Ok(id)
    }
}

// ============================================================================
// Mock Completion Client
// ============================================================================

/// Returns `n` canned choices per request, capped by `max_choices`
#[derive(Default)]
pub struct MockCompletionClient {
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
    max_choices: Option<usize>,
    should_fail: bool,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_max_choices(mut self, max: usize) -> Self {
        self.max_choices = Some(max);
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<String>, ExternalServiceError> {
        self.requests.write().unwrap().push(request.clone());
        if self.should_fail {
            return Err(mock_failure(Service::Completion));
        }

        let count = match self.max_choices {
            Some(max) => (request.n as usize).min(max),
            None => request.n as usize,
        };
        Ok((1..=count)
            .map(|i| {
                format!(
                    "Post {}:  Card fees eating your margin?\n\nSee how much you could save: https://example.com/rates #payments",
                    i
                )
            })
            .collect())
    }
}

// ============================================================================
// Mock Social Poster
// ============================================================================

/// Publishes into memory and serves preset engagement signals
#[derive(Default)]
pub struct MockSocialPoster {
    published: Arc<RwLock<Vec<(Platform, String, Option<DateTime<Utc>>)>>>,
    signals: Vec<EngagementSignal>,
    fetches: Arc<RwLock<usize>>,
    should_fail: bool,
}

impl MockSocialPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_signals(mut self, signals: Vec<EngagementSignal>) -> Self {
        self.signals = signals;
        self
    }

    pub fn published(&self) -> Vec<(Platform, String, Option<DateTime<Utc>>)> {
        self.published.read().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.read().unwrap()
    }
}

#[async_trait]
impl SocialPoster for MockSocialPoster {
    /// Post ids are "<platform>-<n>", numbered across platforms from 1
    async fn publish(
        &self,
        platform: Platform,
        text: &str,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<PostId, ExternalServiceError> {
        if self.should_fail {
            return Err(mock_failure(Service::Social));
        }
        let mut published = self.published.write().unwrap();
        published.push((platform, text.to_string(), scheduled_at));
        Ok(PostId(format!("{}-{}", platform, published.len())))
    }

    async fn fetch_engagements(
        &self,
        post: &PostedContent,
        since: DateTime<Utc>,
    ) -> Result<Vec<EngagementSignal>, ExternalServiceError> {
        *self.fetches.write().unwrap() += 1;
        if self.should_fail {
            return Err(mock_failure(Service::Social));
        }
        Ok(self
            .signals
            .iter()
            .filter(|s| s.post_id == post.post_id && s.occurred_at > since)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Mock Prospect Source
// ============================================================================

/// Serves preset pages in order and looks companies up by name
#[derive(Default)]
pub struct MockProspectSource {
    companies: HashMap<String, Prospect>,
    pages: Vec<ProspectPage>,
    pages_requested: Arc<RwLock<usize>>,
    should_fail: bool,
}

impl MockProspectSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_company(mut self, prospect: Prospect) -> Self {
        self.companies
            .insert(prospect.company_name.to_lowercase(), prospect);
        self
    }

    pub fn with_pages(mut self, pages: Vec<ProspectPage>) -> Self {
        self.pages = pages;
        self
    }

    pub fn pages_requested(&self) -> usize {
        *self.pages_requested.read().unwrap()
    }
}

#[async_trait]
impl ProspectSource for MockProspectSource {
    async fn search_page(
        &self,
        _filters: &ProspectFilters,
        _cursor: Option<&str>,
    ) -> Result<ProspectPage, ExternalServiceError> {
        if self.should_fail {
            return Err(mock_failure(Service::ProspectSource));
        }
        let mut requested = self.pages_requested.write().unwrap();
        let page = self.pages.get(*requested).cloned().unwrap_or_default();
        *requested += 1;
        Ok(page)
    }

    async fn lookup_company(&self, name: &str) -> Result<Option<Prospect>, ExternalServiceError> {
        if self.should_fail {
            return Err(mock_failure(Service::ProspectSource));
        }
        Ok(self.companies.get(&name.to_lowercase()).cloned())
    }
}

// ============================================================================
// Mock Lead Notifier
// ============================================================================

#[derive(Default)]
pub struct MockLeadNotifier {
    sent: Arc<RwLock<Vec<SdrNotification>>>,
    should_fail: bool,
}

impl MockLeadNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SdrNotification> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl LeadNotifier for MockLeadNotifier {
    async fn notify(&self, notification: &SdrNotification) -> Result<(), ExternalServiceError> {
        if self.should_fail {
            return Err(mock_failure(Service::Notifier));
        }
        self.sent.write().unwrap().push(notification.clone());
        Ok(())
    }
}

// ============================================================================
// Mock Sequence Starter
// ============================================================================

/// Records started sequences; deal ids count up from 1
#[derive(Default)]
pub struct MockSequenceStarter {
    started: Arc<RwLock<Vec<(LeadData, IntentTier)>>>,
    should_fail: bool,
}

impl MockSequenceStarter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn started(&self) -> Vec<(LeadData, IntentTier)> {
        self.started.read().unwrap().clone()
    }
}

#[async_trait]
impl SequenceStarter for MockSequenceStarter {
    async fn start_sequence(
        &self,
        lead: &LeadData,
        intent_tier: IntentTier,
    ) -> Result<DealId, AppError> {
        if self.should_fail {
            return Err(mock_failure(Service::Crm).into());
        }
        let mut started = self.started.write().unwrap();
        started.push((lead.clone(), intent_tier));
        Ok(DealId(started.len() as i64))
    }
}
