use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::catalog::ReferenceCatalog;
use super::domain::{AssessmentId, ExperienceLevelDetails, ReassessmentSubmission};
use super::evaluation::{RecommendationResult, TitrationEngine};
use super::sink::{SinkError, SubmissionPayload, SubmissionSink};
use super::validation::{SubmissionValidator, ValidationFailure};

/// Service composing the submission validator, titration engine, and submission sink.
pub struct ReassessmentService<S> {
    validator: Arc<SubmissionValidator>,
    engine: Arc<TitrationEngine>,
    sink: Arc<S>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("rsa-{id:06}"))
}

/// Completed assessment returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub assessment_id: AssessmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub recommendation: RecommendationResult,
}

impl<S> ReassessmentService<S>
where
    S: SubmissionSink + 'static,
{
    pub fn new(catalog: Arc<ReferenceCatalog>, sink: Arc<S>) -> Self {
        Self {
            validator: Arc::new(SubmissionValidator::new(catalog.clone())),
            engine: Arc::new(TitrationEngine::new(catalog)),
            sink,
        }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        self.engine.catalog()
    }

    /// Experience classification for the dose/time pair, before the rest of the form exists.
    pub fn preview_experience(
        &self,
        current_dose: &str,
        time_on_current_medication: &str,
    ) -> Option<ExperienceLevelDetails> {
        self.catalog()
            .experience_for(current_dose, time_on_current_medication)
    }

    /// Validate, evaluate, and record a single reassessment.
    pub fn assess(
        &self,
        submission: ReassessmentSubmission,
    ) -> Result<AssessmentOutcome, ReassessmentServiceError> {
        let validated = self.validator.validate(submission)?;
        let recommendation = self
            .engine
            .recommend(&validated.answers, &validated.experience);
        let assessment_id = next_assessment_id();

        if recommendation.critical_alert.is_some() {
            warn!(
                assessment_id = %assessment_id.0,
                critical_flags = recommendation.critical_flags.len(),
                "emergency protocol triggered"
            );
        }
        info!(
            assessment_id = %assessment_id.0,
            experience = validated.experience.level.label(),
            trs = recommendation.scores.trs,
            review = recommendation.requires_physician_review,
            recommendation = %recommendation.primary_recommendation,
            "reassessment evaluated"
        );

        let payload = SubmissionPayload::build(
            assessment_id.clone(),
            validated.patient_id.clone(),
            Utc::now(),
            &validated.answers,
            &recommendation,
            self.catalog(),
        );
        self.sink.record(payload)?;

        Ok(AssessmentOutcome {
            assessment_id,
            patient_id: validated.patient_id,
            recommendation,
        })
    }
}

/// Error raised by the reassessment service.
#[derive(Debug, thiserror::Error)]
pub enum ReassessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
