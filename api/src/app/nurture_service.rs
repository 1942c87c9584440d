//! Nurture service
//!
//! Owns per-lead nurture sequences: creates the CRM records and schedule,
//! performs due steps when the external scheduler calls back, and reacts to
//! replies from the lead.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::content_service::{ContentService, PostRequest};
use super::lead_router::SequenceStarter;
use super::nurture_config::{
    DEFAULT_VALUE_PROP, FOLLOW_UP_ACTIVITY, FOLLOW_UP_HOURS, FOLLOW_UP_SUBJECT, MAX_DUE_STEPS,
    REVIEW_ACTIVITY, REVIEW_HOURS, REVIEW_SUBJECT, STEP_POST_COUNT,
};
use crate::domain::entities::{
    DealId, IndustryProfile, IntentTier, LeadData, NurtureSequence, Platform, ResponseSentiment, SequenceStatus,
    StepReadiness, StepType,
};
use crate::domain::ports::{
    CompletionClient, CrmClient, NewActivity, NewDeal, NewOrganization, NewPerson, PostId,
    SequenceRepository, SocialPoster,
};
use crate::error::{AppError, DomainError, ExternalServiceError, Service};

/// Why a step trigger did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyExecuted,
    Paused,
    Completed,
    NotDue { execute_at: DateTime<Utc> },
}

/// Result of a scheduler trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Executed {
        step_type: StepType,
        post_id: Option<PostId>,
        sequence_completed: bool,
    },
    Skipped(SkipReason),
}

/// A step the scheduler should trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueStep {
    pub deal_id: DealId,
    pub step_index: usize,
    pub execute_at: DateTime<Utc>,
}

pub struct NurtureService<CRM, C, S, R>
where
    CRM: CrmClient,
    C: CompletionClient,
    S: SocialPoster,
    R: SequenceRepository,
{
    crm: Arc<CRM>,
    content: Arc<ContentService<C>>,
    social: Arc<S>,
    sequences: Arc<R>,
}

impl<CRM, C, S, R> NurtureService<CRM, C, S, R>
where
    CRM: CrmClient,
    C: CompletionClient,
    S: SocialPoster,
    R: SequenceRepository,
{
    pub fn new(
        crm: Arc<CRM>,
        content: Arc<ContentService<C>>,
        social: Arc<S>,
        sequences: Arc<R>,
    ) -> Self {
        Self {
            crm,
            content,
            social,
            sequences,
        }
    }

    /// Create the CRM organization, person and deal for a lead, then persist
    /// an active sequence whose steps are scheduled from now.
    ///
    /// The CRM may hand back a deal that already has a sequence; that
    /// sequence is returned untouched.
    pub async fn initiate(
        &self,
        lead: &LeadData,
        intent_tier: IntentTier,
    ) -> Result<NurtureSequence, AppError> {
        lead.validate()?;
        // Every step generates content, so the industry needs a profile
        IndustryProfile::for_industry(&lead.industry)?;

        let records = async {
            let org_id = self
                .crm
                .create_organization(&NewOrganization::from_lead(lead))
                .await?;
            let person_id = self
                .crm
                .create_person(&NewPerson::from_lead(lead, Some(org_id)))
                .await?;
            self.crm
                .create_deal(&NewDeal::for_lead(lead, person_id, org_id))
                .await
        };
        let deal_id = records.await.map_err(|e: ExternalServiceError| {
            tracing::error!(company = %lead.company, error = %e, "Error initiating nurture sequence");
            e
        })?;

        if let Some(existing) = self.sequences.find_by_id(&deal_id).await? {
            tracing::info!(
                deal_id = %deal_id,
                company = %lead.company,
                status = %existing.status,
                current_step = existing.current_step,
                "Deal already has a nurture sequence"
            );
            return Ok(existing);
        }

        let sequence = NurtureSequence::start(deal_id, intent_tier, lead, Utc::now());
        self.sequences.save(&sequence).await?;

        tracing::info!(
            deal_id = %deal_id,
            company = %lead.company,
            %intent_tier,
            steps = sequence.steps.len(),
            "Nurture sequence started"
        );
        Ok(sequence)
    }

    /// Perform step `step_index` if the sequence is active and the step is
    /// the next one and due. Side effects run in order and stop at the first
    /// failure, leaving the step unexecuted.
    pub async fn execute_step(
        &self,
        deal_id: DealId,
        step_index: usize,
    ) -> Result<StepOutcome, AppError> {
        let mut sequence = self.find(deal_id).await?;
        let now = Utc::now();

        let skip = match sequence.check_step(step_index, now)? {
            StepReadiness::Ready => None,
            StepReadiness::AlreadyExecuted => Some(SkipReason::AlreadyExecuted),
            StepReadiness::Paused => Some(SkipReason::Paused),
            StepReadiness::Completed => Some(SkipReason::Completed),
            StepReadiness::NotDue { execute_at } => Some(SkipReason::NotDue { execute_at }),
        };
        if let Some(reason) = skip {
            tracing::info!(deal_id = %deal_id, step_index, ?reason, "Skipping nurture step");
            return Ok(StepOutcome::Skipped(reason));
        }

        let step = sequence.steps[step_index].clone();

        self.crm
            .create_activity(&NewActivity {
                deal_id,
                activity_type: step.step_type.to_string(),
                subject: format!("Nurture Step: {}", step.step_type),
                due_at: step.execute_at,
            })
            .await?;

        let text = self
            .step_content(&sequence.industry, &step.template)
            .await?;

        let post_id = if step.step_type.delivers_content() {
            Some(self.social.publish(Platform::Linkedin, &text, None).await?)
        } else {
            None
        };

        self.crm
            .add_note(
                deal_id,
                &format!(
                    "Scheduled {} step {}/{} ({}) for {}, executed at {}",
                    step.step_type,
                    step_index + 1,
                    sequence.steps.len(),
                    step.template,
                    step.execute_at.format("%Y-%m-%d %H:%M UTC"),
                    now.format("%Y-%m-%d %H:%M UTC")
                ),
            )
            .await?;

        sequence.mark_executed(step_index, now)?;
        self.sequences.save(&sequence).await?;

        let sequence_completed = sequence.status == SequenceStatus::Completed;
        tracing::info!(
            deal_id = %deal_id,
            step_index,
            step_type = %step.step_type,
            sequence_completed,
            "Nurture step executed"
        );

        Ok(StepOutcome::Executed {
            step_type: step.step_type,
            post_id,
            sequence_completed,
        })
    }

    /// One LinkedIn post for the lead's industry, angled by the step template
    async fn step_content(&self, industry: &str, template: &str) -> Result<String, AppError> {
        let request = PostRequest {
            industry: industry.to_string(),
            custom_pain_points: Vec::new(),
            value_prop: DEFAULT_VALUE_PROP.to_string(),
            platforms: vec![Platform::Linkedin],
            post_count: STEP_POST_COUNT,
            theme: Some(template.to_string()),
        };

        let mut posts = self.content.create_industry_posts(&request).await?;
        posts
            .remove(&Platform::Linkedin)
            .and_then(|p| p.into_iter().next())
            .ok_or_else(|| {
                ExternalServiceError::Deserialization {
                    service: Service::Completion,
                    message: "no content generated for nurture step".to_string(),
                }
                .into()
            })
    }

    /// Record a reply on the deal and adjust the sequence:
    /// positive schedules a follow-up, negative schedules a review and pauses.
    pub async fn handle_sequence_response(
        &self,
        deal_id: DealId,
        response_type: &str,
        content: &str,
    ) -> Result<NurtureSequence, AppError> {
        let mut sequence = self.find(deal_id).await?;
        let now = Utc::now();
        let sentiment = ResponseSentiment::from(response_type);

        let result = async {
            self.crm
                .add_note(
                    deal_id,
                    &format!("Sequence Response ({}): {}", response_type, content),
                )
                .await?;

            match sentiment {
                ResponseSentiment::Positive => {
                    self.crm
                        .create_activity(&NewActivity {
                            deal_id,
                            activity_type: FOLLOW_UP_ACTIVITY.to_string(),
                            subject: FOLLOW_UP_SUBJECT.to_string(),
                            due_at: now + Duration::hours(FOLLOW_UP_HOURS),
                        })
                        .await?;
                }
                ResponseSentiment::Negative => {
                    self.crm
                        .create_activity(&NewActivity {
                            deal_id,
                            activity_type: REVIEW_ACTIVITY.to_string(),
                            subject: REVIEW_SUBJECT.to_string(),
                            due_at: now + Duration::hours(REVIEW_HOURS),
                        })
                        .await?;
                }
                ResponseSentiment::Other => {}
            }
            Ok::<_, ExternalServiceError>(())
        };
        result.await.map_err(|e| {
            tracing::error!(deal_id = %deal_id, error = %e, "Error handling sequence response");
            e
        })?;

        if sentiment == ResponseSentiment::Negative && sequence.status == SequenceStatus::Active {
            sequence.pause(now)?;
            self.sequences.save(&sequence).await?;
            tracing::info!(deal_id = %deal_id, "Nurture sequence paused after negative response");
        }

        Ok(sequence)
    }

    pub async fn pause(&self, deal_id: DealId) -> Result<NurtureSequence, AppError> {
        let mut sequence = self.find(deal_id).await?;
        if sequence.pause(Utc::now())? {
            self.sequences.save(&sequence).await?;
            tracing::info!(deal_id = %deal_id, "Nurture sequence paused");
        }
        Ok(sequence)
    }

    /// Re-activate a paused sequence; overdue steps become due immediately
    pub async fn resume(&self, deal_id: DealId) -> Result<NurtureSequence, AppError> {
        let mut sequence = self.find(deal_id).await?;
        if sequence.resume(Utc::now())? {
            self.sequences.save(&sequence).await?;
            tracing::info!(deal_id = %deal_id, "Nurture sequence resumed");
        }
        Ok(sequence)
    }

    /// Terminal external event, e.g. the deal was won, lost or handed to sales
    pub async fn complete(&self, deal_id: DealId) -> Result<NurtureSequence, AppError> {
        let mut sequence = self.find(deal_id).await?;
        if sequence.complete(Utc::now()) {
            self.sequences.save(&sequence).await?;
            tracing::info!(deal_id = %deal_id, "Nurture sequence completed externally");
        }
        Ok(sequence)
    }

    pub async fn get(&self, deal_id: DealId) -> Result<NurtureSequence, AppError> {
        self.find(deal_id).await
    }

    /// Next step of every active sequence that is due at `now`
    pub async fn due_steps(&self, now: DateTime<Utc>, limit: u64) -> Result<Vec<DueStep>, AppError> {
        let sequences = self
            .sequences
            .find_due(now, limit.min(MAX_DUE_STEPS))
            .await?;

        Ok(sequences
            .iter()
            .filter_map(|s| {
                s.next_step().map(|step| DueStep {
                    deal_id: s.id,
                    step_index: step.index,
                    execute_at: step.execute_at,
                })
            })
            .collect())
    }

    async fn find(&self, deal_id: DealId) -> Result<NurtureSequence, AppError> {
        self.sequences
            .find_by_id(&deal_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Nurture sequence for deal {} not found", deal_id))
                    .into()
            })
    }
}

#[async_trait]
impl<CRM, C, S, R> SequenceStarter for NurtureService<CRM, C, S, R>
where
    CRM: CrmClient,
    C: CompletionClient,
    S: SocialPoster,
    R: SequenceRepository,
{
    async fn start_sequence(
        &self,
        lead: &LeadData,
        intent_tier: IntentTier,
    ) -> Result<DealId, AppError> {
        self.initiate(lead, intent_tier).await.map(|s| s.id)
    }
}
