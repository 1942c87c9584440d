//! Lead router
//!
//! Scores responses, drops the ones that don't qualify and hands the rest to
//! the SDR team (decision makers) or to a nurture sequence (everyone else).

use std::sync::Arc;

use async_trait::async_trait;

use super::scoring;
use crate::domain::entities::{
    DealId, IntentTier, LeadData, LeadRecord, LeadRoute, QualificationCriteria,
    QualificationRules, Response,
};
use crate::domain::ports::{CrmClient, LeadNotifier, NewPerson, SdrNotification};
use crate::error::AppError;

/// Starts a nurture sequence for a lead and returns its deal id
#[async_trait]
pub trait SequenceStarter: Send + Sync {
    async fn start_sequence(
        &self,
        lead: &LeadData,
        intent_tier: IntentTier,
    ) -> Result<DealId, AppError>;
}

pub struct LeadRouter<CRM, N, SS>
where
    CRM: CrmClient,
    N: LeadNotifier,
    SS: SequenceStarter,
{
    crm: Arc<CRM>,
    notifier: Arc<N>,
    sequences: Arc<SS>,
    rules: QualificationRules,
    default_intent_tier: IntentTier,
    sdr_email: String,
}

impl<CRM, N, SS> LeadRouter<CRM, N, SS>
where
    CRM: CrmClient,
    N: LeadNotifier,
    SS: SequenceStarter,
{
    pub fn new(
        crm: Arc<CRM>,
        notifier: Arc<N>,
        sequences: Arc<SS>,
        rules: QualificationRules,
        default_intent_tier: IntentTier,
        sdr_email: impl Into<String>,
    ) -> Self {
        if rules.weights.sum() > 1.0 + f64::EPSILON {
            tracing::warn!(
                sum = rules.weights.sum(),
                "Scoring weights sum above 1, scores will be clamped"
            );
        }
        Self {
            crm,
            notifier,
            sequences,
            rules,
            default_intent_tier,
            sdr_email: sdr_email.into(),
        }
    }

    /// Route every qualifying response, in input order.
    ///
    /// The first failing hand-off aborts the batch. Leads routed before it
    /// keep their CRM records and are only visible in the logs.
    pub async fn process_responses(
        &self,
        responses: &[Response],
        criteria: &QualificationCriteria,
    ) -> Result<Vec<LeadRecord>, AppError> {
        let mut leads = Vec::new();

        for response in responses {
            let score = scoring::score(response, &self.rules);
            if !scoring::qualifies(response, score, criteria) {
                tracing::debug!(
                    company = %response.prospect.company_name,
                    score,
                    "Response did not qualify"
                );
                continue;
            }

            let lead = LeadData::from_response(response);
            let record = if response.is_decision_maker {
                self.fast_track(lead, score).await?
            } else {
                self.nurture(lead, score).await?
            };

            tracing::info!(
                company = %record.lead.company,
                score = record.score,
                grade = %record.grade,
                route = %record.route,
                crm_id = record.crm_id,
                "Lead routed"
            );
            leads.push(record);
        }

        Ok(leads)
    }

    /// Exactly one CRM contact and one SDR notification
    async fn fast_track(&self, lead: LeadData, score: f64) -> Result<LeadRecord, AppError> {
        lead.validate()?;

        let person_id = self
            .crm
            .create_person(&NewPerson::from_lead(&lead, None))
            .await
            .map_err(|e| {
                tracing::error!(company = %lead.company, error = %e, "Error creating CRM contact");
                e
            })?;

        let notification = SdrNotification {
            sdr_email: self.sdr_email.clone(),
            crm_person_id: person_id,
            score,
            lead,
        };
        self.notifier.notify(&notification).await.map_err(|e| {
            tracing::error!(
                company = %notification.lead.company,
                crm_person_id = person_id,
                error = %e,
                "Error notifying SDR"
            );
            e
        })?;

        Ok(LeadRecord {
            lead: notification.lead,
            score,
            grade: self.rules.thresholds.grade(score),
            route: LeadRoute::FastTrack,
            crm_id: person_id,
        })
    }

    async fn nurture(&self, lead: LeadData, score: f64) -> Result<LeadRecord, AppError> {
        let deal_id = self
            .sequences
            .start_sequence(&lead, self.default_intent_tier)
            .await?;

        Ok(LeadRecord {
            lead,
            score,
            grade: self.rules.thresholds.grade(score),
            route: LeadRoute::Nurture,
            crm_id: deal_id.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{InterestLevel, LeadGrade};
    use crate::test_utils::{
        test_response, MockCrmClient, MockLeadNotifier, MockSequenceStarter,
    };

    type TestRouter = LeadRouter<MockCrmClient, MockLeadNotifier, MockSequenceStarter>;

    struct Harness {
        crm: Arc<MockCrmClient>,
        notifier: Arc<MockLeadNotifier>,
        starter: Arc<MockSequenceStarter>,
        router: TestRouter,
    }

    fn harness_with(crm: MockCrmClient, starter: MockSequenceStarter) -> Harness {
        let crm = Arc::new(crm);
        let notifier = Arc::new(MockLeadNotifier::new());
        let starter = Arc::new(starter);
        let router = LeadRouter::new(
            crm.clone(),
            notifier.clone(),
            starter.clone(),
            QualificationRules::default(),
            IntentTier::MediumIntent,
            "sdr@example.com",
        );
        Harness {
            crm,
            notifier,
            starter,
            router,
        }
    }

    fn harness() -> Harness {
        harness_with(MockCrmClient::new(), MockSequenceStarter::new())
    }

    #[tokio::test]
    async fn decision_maker_is_fast_tracked() {
        let h = harness();
        let response = test_response(InterestLevel::High, 600, true);

        let leads = h
            .router
            .process_responses(&[response], &QualificationCriteria::default())
            .await
            .unwrap();

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].route, LeadRoute::FastTrack);
        assert_eq!(leads[0].grade, LeadGrade::FastTrack);
        assert_eq!(h.crm.persons().len(), 1);
        assert_eq!(h.crm.persons()[0].org_id, None);
        assert!(h.crm.organizations().is_empty());

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].sdr_email, "sdr@example.com");
        assert_eq!(sent[0].crm_person_id, leads[0].crm_id);
        assert!(h.starter.started().is_empty());
    }

    #[tokio::test]
    async fn other_qualified_leads_are_nurtured_with_default_tier() {
        let h = harness();
        // 0.4 + 0.3 x 1.0 = 0.7
        let response = test_response(InterestLevel::High, 600, false);

        let leads = h
            .router
            .process_responses(&[response], &QualificationCriteria::default())
            .await
            .unwrap();

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].route, LeadRoute::Nurture);
        let started = h.starter.started();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].1, IntentTier::MediumIntent);
        assert_eq!(leads[0].crm_id, 1);
        assert!(h.crm.persons().is_empty());
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn below_threshold_produces_no_side_effects() {
        let h = harness();
        let responses = vec![
            test_response(InterestLevel::None, 10, false),
            test_response(InterestLevel::Low, 150, false),
        ];

        let leads = h
            .router
            .process_responses(&responses, &QualificationCriteria::default())
            .await
            .unwrap();

        assert!(leads.is_empty());
        assert_eq!(h.crm.call_count(), 0);
        assert!(h.notifier.sent().is_empty());
        assert!(h.starter.started().is_empty());
    }

    #[tokio::test]
    async fn every_returned_lead_meets_the_minimum() {
        let h = harness();
        let responses = vec![
            test_response(InterestLevel::High, 600, true),
            test_response(InterestLevel::Medium, 150, false),
            test_response(InterestLevel::High, 150, true),
            test_response(InterestLevel::Low, 50, true),
        ];
        let criteria = QualificationCriteria {
            minimum_score: 0.6,
            ..Default::default()
        };

        let leads = h.router.process_responses(&responses, &criteria).await.unwrap();

        assert!(!leads.is_empty());
        assert!(leads.iter().all(|l| l.score >= 0.6));
        assert_eq!(h.notifier.sent().len(), h.crm.persons().len());
    }

    #[tokio::test]
    async fn failure_aborts_the_batch() {
        let h = harness_with(MockCrmClient::new().fail_after(1), MockSequenceStarter::new());
        let responses = vec![
            test_response(InterestLevel::High, 600, true),
            test_response(InterestLevel::High, 700, true),
        ];

        let result = h
            .router
            .process_responses(&responses, &QualificationCriteria::default())
            .await;

        assert!(matches!(result, Err(AppError::External(_))));
        // The first lead's records stay behind
        assert_eq!(h.crm.persons().len(), 1);
        assert_eq!(h.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn notifier_failure_leaves_the_contact_behind() {
        let crm = Arc::new(MockCrmClient::new());
        let router = LeadRouter::new(
            crm.clone(),
            Arc::new(MockLeadNotifier::failing()),
            Arc::new(MockSequenceStarter::new()),
            QualificationRules::default(),
            IntentTier::default(),
            "sdr@example.com",
        );

        let result = router
            .process_responses(
                &[test_response(InterestLevel::High, 600, true)],
                &QualificationCriteria::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::External(_))));
        assert_eq!(crm.persons().len(), 1);
    }

    #[tokio::test]
    async fn sequencer_failure_propagates() {
        let h = harness_with(MockCrmClient::new(), MockSequenceStarter::failing());
        let response = test_response(InterestLevel::High, 600, false);

        let result = h
            .router
            .process_responses(&[response], &QualificationCriteria::default())
            .await;

        assert!(result.is_err());
    }
}
